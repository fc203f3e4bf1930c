//! # Review Entity

use crate::domain::value_objects::MovieInfoId;
use serde::{Deserialize, Serialize};

/// A review as served by the movies-review upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Review identifier.
    #[serde(default)]
    pub review_id: Option<String>,
    /// Movie info the review belongs to.
    #[serde(default)]
    pub movie_info_id: Option<MovieInfoId>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Rating given by the reviewer.
    #[serde(default)]
    pub rating: Option<f64>,
}
