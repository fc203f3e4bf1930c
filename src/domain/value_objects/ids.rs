//! # Identifier Types
//!
//! The join key shared by the movies-info and movies-review upstreams.
//!
//! # Examples
//!
//! ```
//! use movies_aggregator::domain::value_objects::MovieInfoId;
//!
//! let id = MovieInfoId::new("abc");
//! assert_eq!(id.as_str(), "abc");
//! assert_eq!(id.to_string(), "abc");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier of a movie info record.
///
/// The movies-info upstream serves it as a string while the movies-review
/// upstream stores it as a long, so deserialization accepts either a JSON
/// string or a JSON integer. Serialization always produces a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MovieInfoId(String);

impl MovieInfoId {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MovieInfoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MovieInfoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MovieInfoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for MovieInfoId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for MovieInfoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string() {
        let id: MovieInfoId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, MovieInfoId::new("abc"));
    }

    #[test]
    fn deserializes_from_integer() {
        let id: MovieInfoId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&MovieInfoId::from(7_i64)).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn rejects_non_scalar() {
        let result: Result<MovieInfoId, _> = serde_json::from_str("{\"id\":1}");
        assert!(result.is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(MovieInfoId::new("  ").is_blank());
        assert!(!MovieInfoId::new("abc").is_blank());
    }
}
