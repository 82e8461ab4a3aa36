//! Recommendation service
//!
//! Builds the personalized recommendation feed from three strategies,
//! always in the same order:
//! - Affinity: recipes sharing hashtags with the user's favorites
//! - Popularity: recipes ranked by favorite count
//! - Trending: recipes carrying the most-searched hashtags, seeded from
//!   the most-used hashtags when nothing has been searched yet
//!
//! Results are cached per user. A failing cache backend degrades to
//! direct computation and never surfaces as an error to the caller.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::{
    FavoriteStore, HashtagStore, RecipeOrder, RecipeStore, SearchQueryStore,
};
use crate::models::{RecommendationDiagnostics, RecommendationGroup, RecommendationKind};
use std::sync::Arc;
use std::time::Duration;

/// Cache TTL for per-user recommendation feeds (1 hour)
const RECOMMENDATION_CACHE_TTL_SECS: u64 = 3600;

/// Cache key prefix for per-user feeds
const CACHE_KEY_RECOMMENDATIONS: &str = "recommendations:user:";

/// How many of the user's favorite hashtags seed the affinity strategy
const AFFINITY_HASHTAG_LIMIT: usize = 5;

/// Maximum recipes per recommendation group
const GROUP_RECIPE_LIMIT: usize = 8;

/// How many trending hashtags seed the trending strategy
const TRENDING_HASHTAG_LIMIT: usize = 3;

/// Minimum favorites for a recipe to count as popular
const POPULARITY_MIN_FAVORITES: i64 = 1;

/// Error types for recommendation service operations
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    /// Underlying store failure
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Recommendation service
///
/// Generic over the cache implementation so tests can inject a failing
/// backend; production wiring uses the default `Cache`.
pub struct RecommendationService<C: CacheLayer = Cache> {
    recipes: Arc<dyn RecipeStore>,
    favorites: Arc<dyn FavoriteStore>,
    hashtags: Arc<dyn HashtagStore>,
    searches: Arc<dyn SearchQueryStore>,
    cache: Arc<C>,
}

impl<C: CacheLayer> RecommendationService<C> {
    /// Create a new recommendation service
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        favorites: Arc<dyn FavoriteStore>,
        hashtags: Arc<dyn HashtagStore>,
        searches: Arc<dyn SearchQueryStore>,
        cache: Arc<C>,
    ) -> Self {
        Self {
            recipes,
            favorites,
            hashtags,
            searches,
            cache,
        }
    }

    /// Cache key for a user's recommendation feed
    fn cache_key(user_id: i64) -> String {
        format!("{CACHE_KEY_RECOMMENDATIONS}{user_id}")
    }

    /// Get the recommendation feed for a user, cached
    ///
    /// Serves the cached feed when present; otherwise computes it and
    /// caches the result for an hour. Cache failures are logged and the
    /// feed is computed directly.
    pub async fn get_recommendations(
        &self,
        user_id: i64,
    ) -> Result<Vec<RecommendationGroup>, RecommendationError> {
        let key = Self::cache_key(user_id);

        match self.cache.get::<Vec<RecommendationGroup>>(&key).await {
            Ok(Some(groups)) => return Ok(groups),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id, "Recommendation cache read failed: {e:#}");
            }
        }

        let groups = self.compute_recommendations(user_id).await?;

        let ttl = Duration::from_secs(RECOMMENDATION_CACHE_TTL_SECS);
        if let Err(e) = self.cache.set(&key, &groups, ttl).await {
            tracing::warn!(user_id, "Recommendation cache write failed: {e:#}");
        }

        Ok(groups)
    }

    /// Compute the feed without touching the cache
    ///
    /// Strategies that produce no recipes contribute no group, so the
    /// result holds between zero and three groups in fixed order.
    pub async fn compute_recommendations(
        &self,
        user_id: i64,
    ) -> Result<Vec<RecommendationGroup>, RecommendationError> {
        let mut groups = Vec::with_capacity(3);

        if let Some(group) = self.affinity_group(user_id).await? {
            groups.push(group);
        }
        if let Some(group) = self.popularity_group().await? {
            groups.push(group);
        }
        if let Some(group) = self.trending_group().await? {
            groups.push(group);
        }

        Ok(groups)
    }

    /// Drop a user's cached feed
    ///
    /// Called when the user's favorites change and by the scheduled
    /// cache-clear job.
    pub async fn invalidate_for_user(&self, user_id: i64) -> Result<(), RecommendationError> {
        self.cache
            .delete(&Self::cache_key(user_id))
            .await
            .map_err(RecommendationError::Storage)
    }

    /// Input sizes feeding the affinity strategy for a user
    ///
    /// `hashtag_count` is the full distinct count across the user's
    /// favorites, not the capped seed list the strategy uses.
    pub async fn diagnostics(
        &self,
        user_id: i64,
    ) -> Result<RecommendationDiagnostics, RecommendationError> {
        let favorite_ids = self.favorited_recipe_ids(user_id).await?;
        let hashtag_count = self
            .hashtags
            .count_distinct_for_recipes(&favorite_ids)
            .await?;

        Ok(RecommendationDiagnostics {
            favorite_count: favorite_ids.len() as i64,
            hashtag_count,
        })
    }

    /// Ids of the recipes the user has favorited
    async fn favorited_recipe_ids(&self, user_id: i64) -> Result<Vec<i64>, RecommendationError> {
        let favorites = self.favorites.for_user(user_id).await?;
        Ok(favorites.iter().map(|f| f.recipe_id).collect())
    }

    /// Recipes sharing hashtags with the user's favorites, favorites
    /// themselves excluded
    async fn affinity_group(
        &self,
        user_id: i64,
    ) -> Result<Option<RecommendationGroup>, RecommendationError> {
        let favorite_ids = self.favorited_recipe_ids(user_id).await?;
        if favorite_ids.is_empty() {
            return Ok(None);
        }

        let hashtags = self
            .hashtags
            .ranked_for_recipes(&favorite_ids, AFFINITY_HASHTAG_LIMIT)
            .await?;
        if hashtags.is_empty() {
            return Ok(None);
        }

        let hashtag_ids: Vec<i64> = hashtags.iter().map(|h| h.hashtag.id).collect();
        let recipes = self
            .recipes
            .with_any_hashtag(
                &hashtag_ids,
                &favorite_ids,
                GROUP_RECIPE_LIMIT,
                RecipeOrder::CreatedDesc,
            )
            .await?;
        if recipes.is_empty() {
            return Ok(None);
        }

        Ok(Some(RecommendationGroup::new(
            RecommendationKind::Hashtag,
            recipes,
        )))
    }

    /// Recipes with the most favorites site-wide
    async fn popularity_group(&self) -> Result<Option<RecommendationGroup>, RecommendationError> {
        let ranked = self
            .recipes
            .ranked_by_favorite_count(GROUP_RECIPE_LIMIT, POPULARITY_MIN_FAVORITES)
            .await?;
        if ranked.is_empty() {
            return Ok(None);
        }

        let recipes = ranked.into_iter().map(|r| r.recipe).collect();
        Ok(Some(RecommendationGroup::new(
            RecommendationKind::Popular,
            recipes,
        )))
    }

    /// Recipes carrying the most-searched hashtags
    ///
    /// When nothing has been searched yet the seed hashtags come from
    /// recipe usage instead. Searched hashtags that no recipe carries
    /// produce no group rather than a substitute.
    async fn trending_group(&self) -> Result<Option<RecommendationGroup>, RecommendationError> {
        let mut seeds = self.searches.trending_hashtags(TRENDING_HASHTAG_LIMIT).await?;
        if seeds.is_empty() {
            seeds = self
                .hashtags
                .ranked_by_recipe_count(TRENDING_HASHTAG_LIMIT)
                .await?;
        }
        if seeds.is_empty() {
            return Ok(None);
        }

        let hashtag_ids: Vec<i64> = seeds.iter().map(|h| h.hashtag.id).collect();
        let recipes = self
            .recipes
            .with_any_hashtag(&hashtag_ids, &[], GROUP_RECIPE_LIMIT, RecipeOrder::CreatedDesc)
            .await?;
        if recipes.is_empty() {
            return Ok(None);
        }

        Ok(Some(RecommendationGroup::new(
            RecommendationKind::Trending,
            recipes,
        )))
    }
}
