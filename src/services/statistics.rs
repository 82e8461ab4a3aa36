//! Statistics service
//!
//! Aggregates site-wide and administrative statistics from the stores
//! and persists periodic snapshots for history. The comment store is an
//! optional collaborator: deployments without a comment subsystem get an
//! empty most-commented list instead of an error.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::{
    CommentStore, FavoriteStore, HashtagStore, RecipeStore, StatisticStore, UserStore,
};
use crate::models::{DetailedStats, SiteStats, StatisticKind, StatisticSnapshot};
use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Cache TTL for computed statistics (5 minutes)
const STATISTICS_CACHE_TTL_SECS: u64 = 300;

/// Cache key for the site-wide statistics result
const CACHE_KEY_SITE_STATS: &str = "statistics:site";

/// Cache key for the detailed statistics result
const CACHE_KEY_DETAILED_STATS: &str = "statistics:detailed";

/// Length of the recipe and hashtag top-N lists
const RANKING_LIMIT: usize = 10;

/// Length of the top-author list, shorter than the other rankings
const AUTHOR_RANKING_LIMIT: usize = 3;

/// How many months of recipe history the detailed view covers
const MONTHS_LIMIT: usize = 12;

/// Days covered by a persisted snapshot period
const SNAPSHOT_PERIOD_DAYS: i64 = 7;

/// Error types for statistics service operations
#[derive(Debug, thiserror::Error)]
pub enum StatisticsError {
    /// Underlying store failure
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Statistics service
///
/// Generic over the cache implementation so tests can inject a failing
/// backend; production wiring uses the default `Cache`.
pub struct StatisticsService<C: CacheLayer = Cache> {
    recipes: Arc<dyn RecipeStore>,
    users: Arc<dyn UserStore>,
    favorites: Arc<dyn FavoriteStore>,
    hashtags: Arc<dyn HashtagStore>,
    snapshots: Arc<dyn StatisticStore>,
    comments: Option<Arc<dyn CommentStore>>,
    cache: Arc<C>,
}

impl<C: CacheLayer> StatisticsService<C> {
    /// Create a new statistics service
    ///
    /// Pass `None` for `comments` when the deployment has no comment
    /// subsystem; the most-commented list then stays empty.
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        users: Arc<dyn UserStore>,
        favorites: Arc<dyn FavoriteStore>,
        hashtags: Arc<dyn HashtagStore>,
        snapshots: Arc<dyn StatisticStore>,
        comments: Option<Arc<dyn CommentStore>>,
        cache: Arc<C>,
    ) -> Self {
        Self {
            recipes,
            users,
            favorites,
            hashtags,
            snapshots,
            comments,
            cache,
        }
    }

    /// Get site-wide statistics, cached
    ///
    /// Serves the cached result when present; otherwise computes it and
    /// caches it for five minutes. Cache failures are logged and the
    /// result is computed directly.
    pub async fn get_site_stats(&self) -> Result<SiteStats, StatisticsError> {
        match self.cache.get::<SiteStats>(CACHE_KEY_SITE_STATS).await {
            Ok(Some(stats)) => return Ok(stats),
            Ok(None) => {}
            Err(e) => tracing::warn!("Site statistics cache read failed: {e:#}"),
        }

        let stats = self.compute_site_stats().await?;

        let ttl = Duration::from_secs(STATISTICS_CACHE_TTL_SECS);
        if let Err(e) = self.cache.set(CACHE_KEY_SITE_STATS, &stats, ttl).await {
            tracing::warn!("Site statistics cache write failed: {e:#}");
        }

        Ok(stats)
    }

    /// Get detailed administrative statistics, cached
    pub async fn get_detailed_stats(&self) -> Result<DetailedStats, StatisticsError> {
        match self
            .cache
            .get::<DetailedStats>(CACHE_KEY_DETAILED_STATS)
            .await
        {
            Ok(Some(stats)) => return Ok(stats),
            Ok(None) => {}
            Err(e) => tracing::warn!("Detailed statistics cache read failed: {e:#}"),
        }

        let stats = self.compute_detailed_stats().await?;

        let ttl = Duration::from_secs(STATISTICS_CACHE_TTL_SECS);
        if let Err(e) = self.cache.set(CACHE_KEY_DETAILED_STATS, &stats, ttl).await {
            tracing::warn!("Detailed statistics cache write failed: {e:#}");
        }

        Ok(stats)
    }

    /// Compute site-wide statistics without touching the cache
    pub async fn compute_site_stats(&self) -> Result<SiteStats, StatisticsError> {
        let week_ago = Utc::now() - ChronoDuration::days(SNAPSHOT_PERIOD_DAYS);

        let top_recipes = self.recipes.ranked_by_favorite_count(RANKING_LIMIT, 1).await?;
        let recent_recipes = self.recipes.recent(RANKING_LIMIT).await?;
        let top_hashtags = self.hashtags.ranked_by_recipe_count(RANKING_LIMIT).await?;
        let top_authors = self.users.top_authors(AUTHOR_RANKING_LIMIT).await?;

        Ok(SiteStats {
            top_recipes,
            recent_recipes,
            top_hashtags,
            top_authors,
            total_recipes: self.recipes.count_all().await?,
            total_users: self.users.count_all().await?,
            total_favorites: self.favorites.count_all().await?,
            recipes_last_week: self.recipes.count_created_since(week_ago).await?,
            users_joined_last_week: self.users.count_joined_since(week_ago).await?,
            generated_at: Utc::now(),
        })
    }

    /// Compute detailed statistics without touching the cache
    pub async fn compute_detailed_stats(&self) -> Result<DetailedStats, StatisticsError> {
        let most_commented = match &self.comments {
            Some(comments) => comments.most_commented_recipes(RANKING_LIMIT).await?,
            None => Vec::new(),
        };

        Ok(DetailedStats {
            recipes_by_month: self.recipes.count_by_month(MONTHS_LIMIT).await?,
            top_users: self.users.top_by_activity(RANKING_LIMIT).await?,
            most_commented,
            generated_at: Utc::now(),
        })
    }

    /// Compute fresh site statistics and persist them as the
    /// site-overview snapshot for the trailing week
    pub async fn persist_site_overview(&self) -> Result<StatisticSnapshot, StatisticsError> {
        let stats = self.compute_site_stats().await?;
        let data = serde_json::to_value(&stats).context("Failed to serialize site statistics")?;

        let today = Utc::now().date_naive();
        let start = today - ChronoDuration::days(SNAPSHOT_PERIOD_DAYS);

        let snapshot = self
            .snapshots
            .upsert(StatisticKind::SiteOverview, &data, start, today)
            .await?;
        Ok(snapshot)
    }

    /// Compute fresh detailed statistics and persist them as the
    /// user-activity snapshot for the trailing week
    pub async fn persist_user_activity(&self) -> Result<StatisticSnapshot, StatisticsError> {
        let stats = self.compute_detailed_stats().await?;
        let data =
            serde_json::to_value(&stats).context("Failed to serialize detailed statistics")?;

        let today = Utc::now().date_naive();
        let start = today - ChronoDuration::days(SNAPSHOT_PERIOD_DAYS);

        let snapshot = self
            .snapshots
            .upsert(StatisticKind::UserActivity, &data, start, today)
            .await?;
        Ok(snapshot)
    }

    /// Drop the cached statistics results
    pub async fn invalidate(&self) -> Result<(), StatisticsError> {
        self.cache.delete(CACHE_KEY_SITE_STATS).await?;
        self.cache.delete(CACHE_KEY_DETAILED_STATS).await?;
        Ok(())
    }
}
