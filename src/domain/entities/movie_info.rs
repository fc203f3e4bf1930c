//! # Movie Info Entity
//!
//! Metadata record served by the movies-info upstream.

use crate::domain::value_objects::MovieInfoId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Movie metadata as served by the movies-info upstream.
///
/// Field names are camelCase on the wire. Every field is optional except
/// `cast`, which defaults to empty, so partial upstream payloads still decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInfo {
    /// Identifier used to look up reviews.
    #[serde(default)]
    pub movie_info_id: Option<MovieInfoId>,
    /// Movie title.
    #[serde(default)]
    pub name: Option<String>,
    /// Release year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Cast members.
    #[serde(default)]
    pub cast: Vec<String>,
    /// Release date (`YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

impl MovieInfo {
    /// Returns the join key for the review lookup, ignoring blank ids.
    #[must_use]
    pub fn lookup_id(&self) -> Option<&MovieInfoId> {
        self.movie_info_id.as_ref().filter(|id| !id.is_blank())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_upstream_payload() {
        let info: MovieInfo = serde_json::from_value(json!({
            "movieInfoId": "abc",
            "name": "Batman Begins",
            "year": 2005,
            "cast": ["Christian Bale", "Michael Cane"],
            "releaseDate": "2005-06-15"
        }))
        .unwrap();

        assert_eq!(info.name.as_deref(), Some("Batman Begins"));
        assert_eq!(info.year, Some(2005));
        assert_eq!(info.cast.len(), 2);
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2005, 6, 15));
        assert_eq!(info.lookup_id(), Some(&MovieInfoId::new("abc")));
    }

    #[test]
    fn missing_fields_default() {
        let info: MovieInfo = serde_json::from_value(json!({ "name": "Dark Knight" })).unwrap();
        assert!(info.movie_info_id.is_none());
        assert!(info.cast.is_empty());
        assert!(info.lookup_id().is_none());
    }

    #[test]
    fn blank_id_is_not_a_lookup_id() {
        let info = MovieInfo {
            movie_info_id: Some(MovieInfoId::new("")),
            ..Default::default()
        };
        assert!(info.lookup_id().is_none());
    }
}
