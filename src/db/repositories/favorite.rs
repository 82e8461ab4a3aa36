//! Favorite store
//!
//! The affinity strategy reads a user's favorites once and reuses the
//! recipe ids for both seeding and exclusion.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::Favorite;

/// Favorite store trait
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Every favorite of the user, newest first
    async fn for_user(&self, user_id: i64) -> Result<Vec<Favorite>>;

    /// Total favorite count across all users
    async fn count_all(&self) -> Result<i64>;
}

/// SQLx-based favorite store implementation
pub struct SqlxFavoriteStore {
    pool: DbPool,
}

impl SqlxFavoriteStore {
    /// Create a new SQLx favorite store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn FavoriteStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl FavoriteStore for SqlxFavoriteStore {
    async fn for_user(&self, user_id: i64) -> Result<Vec<Favorite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, recipe_id, added_at
            FROM favorites
            WHERE user_id = ?
            ORDER BY added_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to fetch favorites for user")?;

        Ok(rows
            .iter()
            .map(|row| Favorite {
                id: row.get("id"),
                user_id: row.get("user_id"),
                recipe_id: row.get("recipe_id"),
                added_at: row.get("added_at"),
            })
            .collect())
    }

    async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM favorites")
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count favorites")?;
        Ok(row.get("n"))
    }
}
