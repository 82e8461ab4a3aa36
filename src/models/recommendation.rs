//! Recommendation result types
//!
//! The computed recommendation result is ephemeral: it lives in the cache
//! and is rebuilt from store state on expiry. It is distinct from any
//! editorially curated recommendation list the hosting application may
//! keep.

use serde::{Deserialize, Serialize};

use super::Recipe;

/// Which strategy produced a recommendation group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Driven by hashtags from the user's own favorites
    Hashtag,
    /// Driven by site-wide favorite counts
    Popular,
    /// Driven by aggregate hashtag search activity
    Trending,
}

impl RecommendationKind {
    /// Display title for this group
    pub fn title(&self) -> &'static str {
        match self {
            RecommendationKind::Hashtag => "Based on your favorites",
            RecommendationKind::Popular => "Popular recipes",
            RecommendationKind::Trending => "Trending now",
        }
    }

    /// Display description for this group
    pub fn description(&self) -> &'static str {
        match self {
            RecommendationKind::Hashtag => {
                "Recipes sharing hashtags with the recipes you favorited"
            }
            RecommendationKind::Popular => "Most favorited recipes across the whole site",
            RecommendationKind::Trending => "Recipes tagged with what everyone is searching for",
        }
    }
}

/// One ordered, titled group of recommended recipes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationGroup {
    /// Strategy that produced this group
    pub kind: RecommendationKind,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Recommended recipes, in display order
    pub recipes: Vec<Recipe>,
}

impl RecommendationGroup {
    /// Build a group with the standard title and description for its kind
    pub fn new(kind: RecommendationKind, recipes: Vec<Recipe>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            recipes,
        }
    }
}

/// Counts explaining an empty recommendation result
///
/// Shown to the user alongside the "not enough data" message so they can
/// see why nothing was recommended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationDiagnostics {
    /// Number of recipes the user has favorited
    pub favorite_count: i64,
    /// Number of distinct hashtags across those favorites
    pub hashtag_count: i64,
}
