//! Hashtag store
//!
//! Lazy get-or-create plus the two rankings the engine consumes: tags on
//! a user's favorited recipes (affinity) and tags ranked by recipe usage
//! (site statistics).

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::{hashtag_from_row, placeholders};
use crate::db::DbPool;
use crate::models::{Hashtag, HashtagWithCount, Upserted};

/// Hashtag store trait
#[async_trait]
pub trait HashtagStore: Send + Sync {
    /// Fetch a hashtag by name, creating it if absent
    async fn get_or_create(&self, name: &str) -> Result<Upserted<Hashtag>>;

    /// Hashtags attached to any of the given recipes, ranked by how many
    /// of those recipes carry the tag, ties broken by name ascending
    async fn ranked_for_recipes(
        &self,
        recipe_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<HashtagWithCount>>;

    /// Hashtags ranked by the number of recipes carrying them, tags with
    /// no recipes excluded
    async fn ranked_by_recipe_count(&self, limit: usize) -> Result<Vec<HashtagWithCount>>;

    /// Number of distinct hashtags across the given recipes
    async fn count_distinct_for_recipes(&self, recipe_ids: &[i64]) -> Result<i64>;
}

/// SQLx-based hashtag store implementation
pub struct SqlxHashtagStore {
    pool: DbPool,
}

impl SqlxHashtagStore {
    /// Create a new SQLx hashtag store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn HashtagStore> {
        Arc::new(Self::new(pool))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Hashtag>> {
        let row = sqlx::query("SELECT id, name, created_at FROM hashtags WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool.pool())
            .await
            .context("Failed to fetch hashtag by name")?;
        row.as_ref().map(hashtag_from_row).transpose()
    }
}

#[async_trait]
impl HashtagStore for SqlxHashtagStore {
    async fn get_or_create(&self, name: &str) -> Result<Upserted<Hashtag>> {
        let result = sqlx::query("INSERT OR IGNORE INTO hashtags (name) VALUES (?)")
            .bind(name)
            .execute(self.pool.pool())
            .await
            .context("Failed to insert hashtag")?;
        let created = result.rows_affected() == 1;

        let hashtag = self
            .get_by_name(name)
            .await?
            .context("Hashtag missing after insert")?;

        Ok(if created {
            Upserted::Created(hashtag)
        } else {
            Upserted::Existing(hashtag)
        })
    }

    async fn ranked_for_recipes(
        &self,
        recipe_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<HashtagWithCount>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT h.id, h.name, h.created_at,
                   COUNT(DISTINCT rh.recipe_id) AS usage_count
            FROM hashtags h
            INNER JOIN recipe_hashtags rh ON rh.hashtag_id = h.id
            WHERE rh.recipe_id IN ({})
            GROUP BY h.id
            ORDER BY usage_count DESC, h.name ASC
            LIMIT ?
            "#,
            placeholders(recipe_ids.len()),
        );

        let mut query = sqlx::query(&sql);
        for id in recipe_ids {
            query = query.bind(id);
        }
        let rows = query
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to rank hashtags for recipes")?;

        rows.iter()
            .map(|row| {
                Ok(HashtagWithCount {
                    hashtag: hashtag_from_row(row)?,
                    usage_count: row.get("usage_count"),
                })
            })
            .collect()
    }

    async fn ranked_by_recipe_count(&self, limit: usize) -> Result<Vec<HashtagWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT h.id, h.name, h.created_at,
                   COUNT(rh.recipe_id) AS usage_count
            FROM hashtags h
            INNER JOIN recipe_hashtags rh ON rh.hashtag_id = h.id
            GROUP BY h.id
            HAVING COUNT(rh.recipe_id) > 0
            ORDER BY usage_count DESC, h.name ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to rank hashtags by recipe count")?;

        rows.iter()
            .map(|row| {
                Ok(HashtagWithCount {
                    hashtag: hashtag_from_row(row)?,
                    usage_count: row.get("usage_count"),
                })
            })
            .collect()
    }

    async fn count_distinct_for_recipes(&self, recipe_ids: &[i64]) -> Result<i64> {
        if recipe_ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "SELECT COUNT(DISTINCT hashtag_id) AS n FROM recipe_hashtags WHERE recipe_id IN ({})",
            placeholders(recipe_ids.len()),
        );

        let mut query = sqlx::query(&sql);
        for id in recipe_ids {
            query = query.bind(id);
        }
        let row = query
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count hashtags for recipes")?;
        Ok(row.get("n"))
    }
}
