//! User store
//!
//! Aggregate counts plus the two user rankings the statistics service
//! renders: top authors by favorites received and most active users.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{AuthorRanking, UserActivity};

/// User store trait
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Ids of every user, ascending
    async fn all_ids(&self) -> Result<Vec<i64>>;

    /// Total user count
    async fn count_all(&self) -> Result<i64>;

    /// Users who joined at or after the given instant
    async fn count_joined_since(&self, since: DateTime<Utc>) -> Result<i64>;

    /// Authors ranked by favorites received across their recipes, then by
    /// recipe count; users with no recipes excluded
    async fn top_authors(&self, limit: usize) -> Result<Vec<AuthorRanking>>;

    /// Users ranked by recipes authored then favorites added; users with
    /// neither excluded
    async fn top_by_activity(&self, limit: usize) -> Result<Vec<UserActivity>>;
}

/// SQLx-based user store implementation
pub struct SqlxUserStore {
    pool: DbPool,
}

impl SqlxUserStore {
    /// Create a new SQLx user store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn UserStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for SqlxUserStore {
    async fn all_ids(&self) -> Result<Vec<i64>> {
        let rows = sqlx::query("SELECT id FROM users ORDER BY id")
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to fetch user ids")?;
        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count users")?;
        Ok(row.get("n"))
    }

    async fn count_joined_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE created_at >= ?")
            .bind(since)
            .fetch_one(self.pool.pool())
            .await
            .context("Failed to count recent users")?;
        Ok(row.get("n"))
    }

    async fn top_authors(&self, limit: usize) -> Result<Vec<AuthorRanking>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username,
                   (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipe_count,
                   (SELECT COUNT(*)
                    FROM favorites f
                    INNER JOIN recipes r ON r.id = f.recipe_id
                    WHERE r.author_id = u.id) AS favorites_received
            FROM users u
            WHERE EXISTS (SELECT 1 FROM recipes r WHERE r.author_id = u.id)
            ORDER BY favorites_received DESC, recipe_count DESC, u.id ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to rank top authors")?;

        Ok(rows
            .iter()
            .map(|row| AuthorRanking {
                user_id: row.get("id"),
                username: row.get("username"),
                recipe_count: row.get("recipe_count"),
                favorites_received: row.get("favorites_received"),
            })
            .collect())
    }

    async fn top_by_activity(&self, limit: usize) -> Result<Vec<UserActivity>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, recipe_count, favorite_count FROM (
                SELECT u.id AS id, u.username AS username,
                       (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipe_count,
                       (SELECT COUNT(*) FROM favorites f WHERE f.user_id = u.id) AS favorite_count
                FROM users u
            )
            WHERE recipe_count > 0 OR favorite_count > 0
            ORDER BY recipe_count DESC, favorite_count DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.pool.pool())
        .await
        .context("Failed to rank users by activity")?;

        Ok(rows
            .iter()
            .map(|row| UserActivity {
                user_id: row.get("id"),
                username: row.get("username"),
                recipe_count: row.get("recipe_count"),
                favorite_count: row.get("favorite_count"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (DbPool, SqlxUserStore) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let store = SqlxUserStore::new(pool.clone());
        (pool, store)
    }

    #[tokio::test]
    async fn test_all_ids_ascending() {
        let (pool, store) = setup().await;
        let db = pool.pool();

        let a = create_user(db, "a").await;
        let b = create_user(db, "b").await;

        let ids = store.all_ids().await.expect("Failed to fetch ids");
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_counts() {
        let (pool, store) = setup().await;
        let db = pool.pool();

        create_user_at(db, "early", "2020-01-01 10:00:00").await;
        create_user_at(db, "late", "2025-06-01 10:00:00").await;

        assert_eq!(store.count_all().await.unwrap(), 2);

        let since = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(store.count_joined_since(since).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_top_authors_ranks_by_favorites_received() {
        let (pool, store) = setup().await;
        let db = pool.pool();

        let alice = create_user(db, "alice").await;
        let bob = create_user(db, "bob").await;
        // carol has no recipes and must not appear
        let carol = create_user(db, "carol").await;

        let a1 = create_recipe(db, alice, "A1").await;
        let b1 = create_recipe(db, bob, "B1").await;
        let b2 = create_recipe(db, bob, "B2").await;

        add_favorite(db, carol, b1).await;
        add_favorite(db, carol, b2).await;
        add_favorite(db, alice, b1).await;
        add_favorite(db, bob, a1).await;

        let authors = store.top_authors(10).await.expect("Failed to rank authors");
        let names: Vec<&str> = authors.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(authors[0].favorites_received, 3);
        assert_eq!(authors[0].recipe_count, 2);
        assert_eq!(authors[1].favorites_received, 1);
    }

    #[tokio::test]
    async fn test_top_by_activity_excludes_inactive() {
        let (pool, store) = setup().await;
        let db = pool.pool();

        let writer = create_user(db, "writer").await;
        let fan = create_user(db, "fan").await;
        create_user(db, "ghost").await;

        let r1 = create_recipe(db, writer, "R1").await;
        let r2 = create_recipe(db, writer, "R2").await;
        add_favorite(db, fan, r1).await;
        add_favorite(db, fan, r2).await;

        let users = store.top_by_activity(10).await.expect("Failed to rank users");
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["writer", "fan"]);
        assert_eq!(users[0].recipe_count, 2);
        assert_eq!(users[1].favorite_count, 2);
    }
}
