//! Scheduled jobs
//!
//! Entry points for the two operational tasks the engine runs outside
//! request handling: persisting statistics snapshots and clearing cached
//! recommendation feeds. Both isolate per-target failures: one failing
//! target is recorded in the report and the rest still run.

use crate::cache::CacheLayer;
use crate::services::{RecommendationService, StatisticsService};

/// Outcome of a job run
///
/// Counts successes and failures across the job's targets and keeps a
/// human-readable line per target for the job's log output.
#[derive(Debug, Default)]
pub struct JobReport {
    /// Targets that completed
    pub succeeded: usize,
    /// Targets that failed
    pub failed: usize,
    lines: Vec<String>,
}

impl JobReport {
    fn record_success(&mut self, line: String) {
        self.succeeded += 1;
        self.lines.push(line);
    }

    fn record_failure(&mut self, line: String) {
        self.failed += 1;
        self.lines.push(line);
    }

    /// Whether every target completed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Multi-line human-readable report
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} succeeded, {} failed",
            self.succeeded, self.failed
        );
        for line in &self.lines {
            out.push('\n');
            out.push_str("  ");
            out.push_str(line);
        }
        out
    }
}

/// Persist the periodic statistics snapshots
///
/// Runs each snapshot target independently. Re-running within the same
/// period overwrites the existing rows, so the job is safe to retry.
pub async fn refresh_statistics<C: CacheLayer>(service: &StatisticsService<C>) -> JobReport {
    let mut report = JobReport::default();

    match service.persist_site_overview().await {
        Ok(snapshot) => {
            tracing::info!(snapshot_id = snapshot.id, "Persisted site overview snapshot");
            report.record_success(format!(
                "site overview: snapshot {} for {}..{}",
                snapshot.id, snapshot.period_start, snapshot.period_end
            ));
        }
        Err(e) => {
            tracing::error!("Site overview snapshot failed: {e:#}");
            report.record_failure(format!("site overview: {e}"));
        }
    }

    match service.persist_user_activity().await {
        Ok(snapshot) => {
            tracing::info!(snapshot_id = snapshot.id, "Persisted user activity snapshot");
            report.record_success(format!(
                "user activity: snapshot {} for {}..{}",
                snapshot.id, snapshot.period_start, snapshot.period_end
            ));
        }
        Err(e) => {
            tracing::error!("User activity snapshot failed: {e:#}");
            report.record_failure(format!("user activity: {e}"));
        }
    }

    // Freshly persisted numbers should be served on the next read
    if let Err(e) = service.invalidate().await {
        tracing::warn!("Statistics cache invalidation failed: {e:#}");
    }

    report
}

/// Clear the cached recommendation feed of every given user
///
/// One user's cache failure never prevents clearing the others.
pub async fn clear_recommendation_caches<C: CacheLayer>(
    service: &RecommendationService<C>,
    user_ids: &[i64],
) -> JobReport {
    let mut report = JobReport::default();

    for &user_id in user_ids {
        match service.invalidate_for_user(user_id).await {
            Ok(()) => {
                report.record_success(format!("user {user_id}: cache cleared"));
            }
            Err(e) => {
                tracing::error!(user_id, "Recommendation cache clear failed: {e:#}");
                report.record_failure(format!("user {user_id}: {e}"));
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Recommendation cache clear finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheLayer, MemoryCache};
    use crate::db::repositories::test_support::*;
    use crate::db::repositories::{
        SqlxFavoriteStore, SqlxHashtagStore, SqlxRecipeStore, SqlxSearchQueryStore,
        SqlxStatisticStore, SqlxUserStore,
    };
    use crate::db::{create_test_pool, migrations, DbPool};
    use crate::models::StatisticKind;
    use std::sync::Arc;
    use std::time::Duration;

    async fn test_pool() -> DbPool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    fn statistics_service(pool: &DbPool) -> (StatisticsService<MemoryCache>, Arc<dyn crate::db::repositories::StatisticStore>) {
        let snapshots = SqlxStatisticStore::boxed(pool.clone());
        let service = StatisticsService::new(
            SqlxRecipeStore::boxed(pool.clone()),
            SqlxUserStore::boxed(pool.clone()),
            SqlxFavoriteStore::boxed(pool.clone()),
            SqlxHashtagStore::boxed(pool.clone()),
            snapshots.clone(),
            None,
            Arc::new(MemoryCache::new()),
        );
        (service, snapshots)
    }

    fn recommendation_service<C: CacheLayer>(
        pool: &DbPool,
        cache: Arc<C>,
    ) -> RecommendationService<C> {
        RecommendationService::new(
            SqlxRecipeStore::boxed(pool.clone()),
            SqlxFavoriteStore::boxed(pool.clone()),
            SqlxHashtagStore::boxed(pool.clone()),
            SqlxSearchQueryStore::boxed(pool.clone()),
            cache,
        )
    }

    /// Cache backend that fails deletes for one poisoned key
    struct PoisonedCache {
        inner: MemoryCache,
        poisoned_key: String,
    }

    #[async_trait::async_trait]
    impl CacheLayer for PoisonedCache {
        async fn get<T: serde::de::DeserializeOwned + Send>(
            &self,
            key: &str,
        ) -> anyhow::Result<Option<T>> {
            self.inner.get(key).await
        }

        async fn set<T: serde::Serialize + Send + Sync>(
            &self,
            key: &str,
            value: &T,
            ttl: Duration,
        ) -> anyhow::Result<()> {
            self.inner.set(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> anyhow::Result<()> {
            if key == self.poisoned_key {
                anyhow::bail!("poisoned key")
            }
            self.inner.delete(key).await
        }
    }

    #[tokio::test]
    async fn test_refresh_statistics_persists_both_snapshots() {
        let pool = test_pool().await;
        let db = pool.pool();
        let alice = create_user(db, "alice").await;
        create_recipe(db, alice, "R1").await;

        let (service, snapshots) = statistics_service(&pool);
        let report = refresh_statistics(&service).await;

        assert!(report.is_success());
        assert_eq!(report.succeeded, 2);
        assert!(snapshots
            .latest(StatisticKind::SiteOverview)
            .await
            .unwrap()
            .is_some());
        assert!(snapshots
            .latest(StatisticKind::UserActivity)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_refresh_statistics_rerun_overwrites() {
        let pool = test_pool().await;
        create_user(pool.pool(), "alice").await;

        let (service, snapshots) = statistics_service(&pool);
        refresh_statistics(&service).await;
        let first = snapshots
            .latest(StatisticKind::SiteOverview)
            .await
            .unwrap()
            .unwrap();

        let report = refresh_statistics(&service).await;
        assert!(report.is_success());

        let second = snapshots
            .latest(StatisticKind::SiteOverview)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.id, first.id);

        let history = snapshots
            .history(StatisticKind::SiteOverview, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_recommendation_caches_clears_every_user() {
        let pool = test_pool().await;
        let db = pool.pool();

        let author = create_user(db, "cook").await;
        let alice = create_user(db, "alice").await;
        let bob = create_user(db, "bob").await;
        let r1 = create_recipe(db, author, "R1").await;
        add_favorite(db, author, r1).await;

        let service = recommendation_service(&pool, Arc::new(MemoryCache::new()));

        // Warm both users' caches
        service.get_recommendations(alice).await.unwrap();
        service.get_recommendations(bob).await.unwrap();

        let report = clear_recommendation_caches(&service, &[alice, bob]).await;
        assert!(report.is_success());
        assert_eq!(report.succeeded, 2);
        assert!(report.summary().contains("2 succeeded, 0 failed"));
    }

    #[tokio::test]
    async fn test_clear_continues_past_failing_user() {
        let pool = test_pool().await;
        let db = pool.pool();

        let alice = create_user(db, "alice").await;
        let bob = create_user(db, "bob").await;
        let carol = create_user(db, "carol").await;

        let cache = Arc::new(PoisonedCache {
            inner: MemoryCache::new(),
            poisoned_key: format!("recommendations:user:{bob}"),
        });
        let service = recommendation_service(&pool, cache);

        let report = clear_recommendation_caches(&service, &[alice, bob, carol]).await;

        // bob failed but alice and carol were still cleared
        assert!(!report.is_success());
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(report.summary().contains(&format!("user {bob}:")));
    }
}
