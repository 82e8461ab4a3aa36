//! Search log store
//!
//! Tracks per-hashtag search counters for the trending ranking and keeps
//! a raw log of free-text queries for the search-queries snapshot.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::hashtag_from_row;
use crate::db::DbPool;
use crate::models::HashtagWithCount;

/// Search log store trait
#[async_trait]
pub trait SearchQueryStore: Send + Sync {
    /// Bump the search counter for a hashtag and stamp the search time
    async fn record_hashtag_search(&self, hashtag_id: i64) -> Result<()>;

    /// Hashtags ranked by search count descending, ties broken by most
    /// recent search; hashtags never searched excluded
    async fn trending_hashtags(&self, limit: usize) -> Result<Vec<HashtagWithCount>>;

    /// Append a free-text query to the search log
    async fn log_query(&self, query: &str, user_id: Option<i64>, result_count: i64) -> Result<()>;
}

/// SQLx-based search log store implementation
pub struct SqlxSearchQueryStore {
    pool: DbPool,
}

impl SqlxSearchQueryStore {
    /// Create a new SQLx search log store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn SearchQueryStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SearchQueryStore for SqlxSearchQueryStore {
    async fn record_hashtag_search(&self, hashtag_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO hashtag_searches (hashtag_id, search_count, last_searched)
            VALUES (?, 1, CURRENT_TIMESTAMP)
            ON CONFLICT (hashtag_id) DO UPDATE SET
                search_count = search_count + 1,
                last_searched = excluded.last_searched
            "#,
        )
        .bind(hashtag_id)
        .execute(self.pool.pool())
        .await
        .context("Failed to record hashtag search")?;
        Ok(())
    }

    async fn trending_hashtags(&self, limit: usize) -> Result<Vec<HashtagWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT h.id, h.name, h.created_at, hs.search_count AS usage_count
            FROM hashtags h
            INNER JOIN hashtag_searches hs ON hs.hashtag_id = h.id
            WHERE hs.search_count > 0
            ORDER BY hs.search_count DESC, hs.last_searched DESC, h.name ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to rank trending hashtags")?;

        rows.iter()
            .map(|row| {
                Ok(HashtagWithCount {
                    hashtag: hashtag_from_row(row)?,
                    usage_count: row.get("usage_count"),
                })
            })
            .collect()
    }

    async fn log_query(&self, query: &str, user_id: Option<i64>, result_count: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO search_queries (query, user_id, result_count) VALUES (?, ?, ?)",
        )
        .bind(query)
        .bind(user_id)
        .bind(result_count)
        .execute(self.pool.pool())
        .await
        .context("Failed to log search query")?;
        Ok(())
    }
}
