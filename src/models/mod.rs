//! Domain models
//!
//! Plain serde-derived data types shared between the store layer, the
//! services and cached payloads.

pub mod favorite;
pub mod hashtag;
pub mod recipe;
pub mod recommendation;
pub mod statistic;
pub mod stats;

pub use favorite::Favorite;
pub use hashtag::{Hashtag, HashtagWithCount, Upserted};
pub use recipe::{Difficulty, Recipe, RecipeWithComments, RecipeWithFavorites};
pub use recommendation::{RecommendationDiagnostics, RecommendationGroup, RecommendationKind};
pub use statistic::{StatisticKind, StatisticSnapshot};
pub use stats::{AuthorRanking, DetailedStats, MonthlyRecipeCount, SiteStats, UserActivity};
