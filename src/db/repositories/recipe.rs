//! Recipe store
//!
//! Ranked and filtered recipe queries consumed by the recommendation
//! engine and the statistics aggregator. All ranking queries take their
//! ordering as an explicit parameter rather than relying on an ambient
//! default sort.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

use super::{placeholders, recipe_from_row, RECIPE_COLUMNS};
use crate::db::DbPool;
use crate::models::{MonthlyRecipeCount, Recipe, RecipeWithFavorites};

/// Explicit ordering for recipe-returning queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrder {
    /// Newest first, ties broken by id descending
    CreatedDesc,
    /// Oldest first
    CreatedAsc,
}

impl RecipeOrder {
    fn sql(&self) -> &'static str {
        match self {
            RecipeOrder::CreatedDesc => "r.created_at DESC, r.id DESC",
            RecipeOrder::CreatedAsc => "r.created_at ASC, r.id ASC",
        }
    }
}

/// Recipe store trait
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Recipes carrying any of the given hashtags, deduplicated,
    /// excluding the given recipe ids
    async fn with_any_hashtag(
        &self,
        hashtag_ids: &[i64],
        exclude_ids: &[i64],
        limit: usize,
        order: RecipeOrder,
    ) -> Result<Vec<Recipe>>;

    /// Recipes ranked by favorite count descending, restricted to at
    /// least `min_favorites`, ties broken by creation time descending
    async fn ranked_by_favorite_count(
        &self,
        limit: usize,
        min_favorites: i64,
    ) -> Result<Vec<RecipeWithFavorites>>;

    /// Most recently created recipes
    async fn recent(&self, limit: usize) -> Result<Vec<Recipe>>;

    /// Total recipe count
    async fn count_all(&self) -> Result<i64>;

    /// Recipes created at or after the given instant
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64>;

    /// Recipe counts grouped by creation month, most recent first
    async fn count_by_month(&self, months: usize) -> Result<Vec<MonthlyRecipeCount>>;
}

/// SQLx-based recipe store implementation
pub struct SqlxRecipeStore {
    pool: DbPool,
}

impl SqlxRecipeStore {
    /// Create a new SQLx recipe store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn RecipeStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl RecipeStore for SqlxRecipeStore {
    async fn with_any_hashtag(
        &self,
        hashtag_ids: &[i64],
        exclude_ids: &[i64],
        limit: usize,
        order: RecipeOrder,
    ) -> Result<Vec<Recipe>> {
        if hashtag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let exclude_clause = if exclude_ids.is_empty() {
            String::new()
        } else {
            format!("AND r.id NOT IN ({})", placeholders(exclude_ids.len()))
        };

        let sql = format!(
            r#"
            SELECT DISTINCT {RECIPE_COLUMNS}
            FROM recipes r
            INNER JOIN recipe_hashtags rh ON r.id = rh.recipe_id
            WHERE rh.hashtag_id IN ({}) {}
            ORDER BY {}
            LIMIT ?
            "#,
            placeholders(hashtag_ids.len()),
            exclude_clause,
            order.sql(),
        );

        let mut query = sqlx::query(&sql);
        for id in hashtag_ids {
            query = query.bind(id);
        }
        for id in exclude_ids {
            query = query.bind(id);
        }
        let rows = query
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to query recipes by hashtag")?;

        rows.iter().map(recipe_from_row).collect()
    }

    async fn ranked_by_favorite_count(
        &self,
        limit: usize,
        min_favorites: i64,
    ) -> Result<Vec<RecipeWithFavorites>> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}, COUNT(f.id) AS favorite_count
            FROM recipes r
            INNER JOIN favorites f ON f.recipe_id = r.id
            GROUP BY r.id
            HAVING COUNT(f.id) >= ?
            ORDER BY favorite_count DESC, r.created_at DESC, r.id DESC
            LIMIT ?
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(min_favorites)
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to rank recipes by favorite count")?;

        rows.iter()
            .map(|row| {
                Ok(RecipeWithFavorites {
                    recipe: recipe_from_row(row)?,
                    favorite_count: row.get("favorite_count"),
                })
            })
            .collect()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Recipe>> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes r
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to query recent recipes")?;

        rows.iter().map(recipe_from_row).collect()
    }

    async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM recipes")
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count recipes")?;
        Ok(row.get("n"))
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM recipes WHERE created_at >= ?")
            .bind(since)
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count recent recipes")?;
        Ok(row.get("n"))
    }

    async fn count_by_month(&self, months: usize) -> Result<Vec<MonthlyRecipeCount>> {
        let rows = sqlx::query(
            r#"
            SELECT strftime('%Y-%m', created_at) AS month, COUNT(*) AS recipe_count
            FROM recipes
            GROUP BY month
            ORDER BY month DESC
            LIMIT ?
            "#,
        )
        .bind(months as i64)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to count recipes by month")?;

        Ok(rows
            .iter()
            .map(|row| MonthlyRecipeCount {
                month: row.get("month"),
                recipe_count: row.get("recipe_count"),
            })
            .collect())
    }
}
