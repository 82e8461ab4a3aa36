//! Hashtag model
//!
//! Hashtags categorize recipes and articles for discovery. Names are
//! globally unique; tagging with an unseen name creates the hashtag
//! lazily through [`Upserted`]-returning store operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hashtag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hashtag {
    /// Unique identifier
    pub id: i64,
    /// Globally unique hashtag name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Hashtag with an aggregate count attached
///
/// The meaning of `usage_count` depends on the query that produced it:
/// distinct favorited recipes carrying the tag, recipes carrying the tag,
/// or times the tag was searched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagWithCount {
    /// The hashtag itself
    #[serde(flatten)]
    pub hashtag: Hashtag,
    /// Aggregate count backing the ranking
    pub usage_count: i64,
}

/// Outcome of a get-or-create store operation
///
/// Names whether the row was freshly inserted or already present, instead
/// of the ambiguous tuple-with-a-flag shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<T> {
    /// A new row was inserted
    Created(T),
    /// A matching row already existed
    Existing(T),
}

impl<T> Upserted<T> {
    /// Unwrap the inner value regardless of outcome
    pub fn into_inner(self) -> T {
        match self {
            Upserted::Created(v) | Upserted::Existing(v) => v,
        }
    }

    /// Whether this operation inserted a new row
    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upserted_into_inner() {
        assert_eq!(Upserted::Created(7).into_inner(), 7);
        assert_eq!(Upserted::Existing(7).into_inner(), 7);
    }

    #[test]
    fn test_upserted_is_created() {
        assert!(Upserted::Created(()).is_created());
        assert!(!Upserted::Existing(()).is_created());
    }
}
