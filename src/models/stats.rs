//! Computed statistics shapes
//!
//! `SiteStats` backs the public statistics page and the site-overview
//! snapshot; `DetailedStats` backs the administrative view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HashtagWithCount, Recipe, RecipeWithComments, RecipeWithFavorites};

/// Author ranked by favorites received across their recipes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorRanking {
    /// Author user id
    pub user_id: i64,
    /// Author username
    pub username: String,
    /// Number of recipes the author published
    pub recipe_count: i64,
    /// Total favorites across the author's recipes
    pub favorites_received: i64,
}

/// User ranked by activity (recipes authored, favorites added)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserActivity {
    /// User id
    pub user_id: i64,
    /// Username
    pub username: String,
    /// Number of recipes the user authored
    pub recipe_count: i64,
    /// Number of favorites the user added
    pub favorite_count: i64,
}

/// Recipe count for a single creation month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRecipeCount {
    /// Month in `YYYY-MM` form
    pub month: String,
    /// Recipes created in that month
    pub recipe_count: i64,
}

/// Site-wide statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStats {
    /// Top recipes by favorite count (at least one favorite)
    pub top_recipes: Vec<RecipeWithFavorites>,
    /// Most recently created recipes
    pub recent_recipes: Vec<Recipe>,
    /// Top hashtags by recipe usage (at least one recipe)
    pub top_hashtags: Vec<HashtagWithCount>,
    /// Top authors by favorites received, then recipe count
    pub top_authors: Vec<AuthorRanking>,
    /// Total recipe count
    pub total_recipes: i64,
    /// Total user count
    pub total_users: i64,
    /// Total favorite count
    pub total_favorites: i64,
    /// Recipes created in the trailing seven days
    pub recipes_last_week: i64,
    /// Users who joined in the trailing seven days
    pub users_joined_last_week: i64,
    /// When this result was computed
    pub generated_at: DateTime<Utc>,
}

/// Detailed administrative statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedStats {
    /// Recipe counts per creation month, most recent first
    pub recipes_by_month: Vec<MonthlyRecipeCount>,
    /// Most active users (at least one recipe or favorite)
    pub top_users: Vec<UserActivity>,
    /// Most commented recipes; empty when the comment subsystem is absent
    pub most_commented: Vec<RecipeWithComments>,
    /// When this result was computed
    pub generated_at: DateTime<Utc>,
}
