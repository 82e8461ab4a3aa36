//! Recipe model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Database representation of the difficulty level
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(anyhow::anyhow!("Unknown difficulty level: '{other}'")),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipe entity
///
/// Owned by its author; hashtag associations live in the
/// `recipe_hashtags` join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Recipe title
    pub title: String,
    /// Short description shown in feeds
    pub description: String,
    /// Author user id
    pub author_id: i64,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Number of servings
    pub servings: i64,
    /// Calories per 100 grams
    pub calories_per_100g: i64,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Recipe together with its favorite count, for popularity rankings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeWithFavorites {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Number of users who favorited this recipe
    pub favorite_count: i64,
}

/// Recipe together with its comment count, for discussion rankings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeWithComments {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Number of comments on this recipe
    pub comment_count: i64,
}
