//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's explicit interest signal for a recipe
///
/// The (user, recipe) pair is unique. Favorites are the primary input to
/// personalized recommendations and are never mutated by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    /// Unique identifier
    pub id: i64,
    /// User who favorited
    pub user_id: i64,
    /// Favorited recipe
    pub recipe_id: i64,
    /// When the favorite was added
    pub added_at: DateTime<Utc>,
}
