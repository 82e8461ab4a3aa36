//! Comment store
//!
//! Optional collaborator. Deployments without the comment subsystem wire
//! the statistics service with no comment store at all, so nothing here
//! is assumed to exist at runtime.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::{recipe_from_row, RECIPE_COLUMNS};
use crate::db::DbPool;
use crate::models::RecipeWithComments;

/// Comment store trait
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Recipes ranked by comment count descending, recipes with no
    /// comments excluded
    async fn most_commented_recipes(&self, limit: usize) -> Result<Vec<RecipeWithComments>>;
}

/// SQLx-based comment store implementation
pub struct SqlxCommentStore {
    pool: DbPool,
}

impl SqlxCommentStore {
    /// Create a new SQLx comment store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn CommentStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentStore for SqlxCommentStore {
    async fn most_commented_recipes(&self, limit: usize) -> Result<Vec<RecipeWithComments>> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}, COUNT(c.id) AS comment_count
            FROM recipes r
            INNER JOIN comments c ON c.recipe_id = r.id
            GROUP BY r.id
            HAVING COUNT(c.id) > 0
            ORDER BY comment_count DESC, r.created_at DESC, r.id DESC
            LIMIT ?
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to rank recipes by comment count")?;

        rows.iter()
            .map(|row| {
                Ok(RecipeWithComments {
                    recipe: recipe_from_row(row)?,
                    comment_count: row.get("comment_count"),
                })
            })
            .collect()
    }
}
