//! # Movie Aggregate
//!
//! The composed result of one aggregation request.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::domain::entities::{Movie, MovieInfo};
//!
//! let absent = Movie::default();
//! assert!(absent.is_absent());
//!
//! let movie = Movie::new(MovieInfo::default(), vec![]);
//! assert!(!movie.is_absent());
//! assert!(movie.review_list().is_empty());
//! ```

use crate::domain::entities::{MovieInfo, Review};
use serde::{Deserialize, Serialize};

/// Movie info composed with its reviews.
///
/// # Invariants
///
/// - Either `movie_info` is fully present or the whole aggregate is the
///   default sentinel (`movie_info: None`, empty reviews).
/// - `review_list` is empty when the review upstream has no matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Primary entity, `None` for the absent sentinel.
    movie_info: Option<MovieInfo>,
    /// Reviews of the movie.
    #[serde(default)]
    review_list: Vec<Review>,
}

impl Movie {
    /// Composes a movie from its info and reviews.
    #[must_use]
    pub fn new(movie_info: MovieInfo, review_list: Vec<Review>) -> Self {
        Self {
            movie_info: Some(movie_info),
            review_list,
        }
    }

    /// Returns the movie info, if present.
    #[must_use]
    pub fn movie_info(&self) -> Option<&MovieInfo> {
        self.movie_info.as_ref()
    }

    /// Returns the reviews.
    #[must_use]
    pub fn review_list(&self) -> &[Review] {
        &self.review_list
    }

    /// Returns true if this is the sentinel for a movie that does not exist.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.movie_info.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_serializes_as_empty_aggregate() {
        let value = serde_json::to_value(Movie::default()).unwrap();
        assert_eq!(value, json!({ "movieInfo": null, "reviewList": [] }));
    }

    #[test]
    fn composed_movie_serializes_camel_case() {
        let info = MovieInfo {
            name: Some("Batman Begins".to_string()),
            ..Default::default()
        };
        let movie = Movie::new(info, vec![Review::default(), Review::default()]);
        let value = serde_json::to_value(&movie).unwrap();

        assert_eq!(value["movieInfo"]["name"], "Batman Begins");
        assert_eq!(value["reviewList"].as_array().unwrap().len(), 2);
    }
}
