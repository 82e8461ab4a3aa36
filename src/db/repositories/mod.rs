//! Repositories - data access layer
//!
//! One trait per store the engine consumes, each with a SQLx-backed
//! implementation and a `boxed()` constructor for dependency injection.
//! The recommendation and statistics services only ever see the traits.

pub mod comment;
pub mod favorite;
pub mod hashtag;
pub mod recipe;
pub mod search_query;
pub mod statistic;
pub mod user;

pub use comment::{CommentStore, SqlxCommentStore};
pub use favorite::{FavoriteStore, SqlxFavoriteStore};
pub use hashtag::{HashtagStore, SqlxHashtagStore};
pub use recipe::{RecipeOrder, RecipeStore, SqlxRecipeStore};
pub use search_query::{SearchQueryStore, SqlxSearchQueryStore};
pub use statistic::{SqlxStatisticStore, StatisticStore};
pub use user::{SqlxUserStore, UserStore};

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::models::{Hashtag, Recipe};

/// Build a `?, ?, ...` placeholder list for a dynamic IN clause
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Map a row with the full recipe column list into a `Recipe`
pub(crate) fn recipe_from_row(row: &SqliteRow) -> Result<Recipe> {
    let difficulty: String = row.get("difficulty");
    Ok(Recipe {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        author_id: row.get("author_id"),
        cooking_time: row.get("cooking_time"),
        servings: row.get("servings"),
        calories_per_100g: row.get("calories_per_100g"),
        difficulty: difficulty.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Map a row with the hashtag column list into a `Hashtag`
pub(crate) fn hashtag_from_row(row: &SqliteRow) -> Result<Hashtag> {
    Ok(Hashtag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

/// Column list selected whenever a full `Recipe` is mapped
pub(crate) const RECIPE_COLUMNS: &str = "r.id, r.title, r.description, r.author_id, \
     r.cooking_time, r.servings, r.calories_per_100g, r.difficulty, r.created_at, r.updated_at";

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixture helpers for repository and service tests.
    //!
    //! Timestamps are passed explicitly so ordering assertions do not
    //! depend on sub-second insert timing.

    use sqlx::SqlitePool;

    pub(crate) async fn create_user(db: &SqlitePool, username: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind("hash123")
        .execute(db)
        .await
        .expect("Failed to create test user");
        result.last_insert_rowid()
    }

    pub(crate) async fn create_user_at(db: &SqlitePool, username: &str, created_at: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind("hash123")
        .bind(created_at)
        .execute(db)
        .await
        .expect("Failed to create test user");
        result.last_insert_rowid()
    }

    pub(crate) async fn create_recipe(db: &SqlitePool, author_id: i64, title: &str) -> i64 {
        create_recipe_at(db, author_id, title, "2025-06-01 12:00:00").await
    }

    pub(crate) async fn create_recipe_at(
        db: &SqlitePool,
        author_id: i64,
        title: &str,
        created_at: &str,
    ) -> i64 {
        let result = sqlx::query(
            r#"INSERT INTO recipes
               (title, description, author_id, cooking_time, servings, calories_per_100g, difficulty, created_at, updated_at)
               VALUES (?, ?, ?, 30, 2, 180, 'easy', ?, ?)"#,
        )
        .bind(title)
        .bind(format!("Description for {title}"))
        .bind(author_id)
        .bind(created_at)
        .bind(created_at)
        .execute(db)
        .await
        .expect("Failed to create test recipe");
        result.last_insert_rowid()
    }

    pub(crate) async fn create_hashtag(db: &SqlitePool, name: &str) -> i64 {
        let result = sqlx::query("INSERT INTO hashtags (name) VALUES (?)")
            .bind(name)
            .execute(db)
            .await
            .expect("Failed to create test hashtag");
        result.last_insert_rowid()
    }

    pub(crate) async fn tag_recipe(db: &SqlitePool, recipe_id: i64, hashtag_id: i64) {
        sqlx::query("INSERT INTO recipe_hashtags (recipe_id, hashtag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(hashtag_id)
            .execute(db)
            .await
            .expect("Failed to tag test recipe");
    }

    pub(crate) async fn add_favorite(db: &SqlitePool, user_id: i64, recipe_id: i64) {
        sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(recipe_id)
            .execute(db)
            .await
            .expect("Failed to add test favorite");
    }

    pub(crate) async fn add_comment(db: &SqlitePool, recipe_id: i64, author_id: i64) {
        sqlx::query("INSERT INTO comments (recipe_id, author_id, content) VALUES (?, ?, 'Tasty!')")
            .bind(recipe_id)
            .bind(author_id)
            .execute(db)
            .await
            .expect("Failed to add test comment");
    }

    pub(crate) async fn record_hashtag_search(db: &SqlitePool, hashtag_id: i64, count: i64, last: &str) {
        sqlx::query(
            "INSERT INTO hashtag_searches (hashtag_id, search_count, last_searched) VALUES (?, ?, ?)",
        )
        .bind(hashtag_id)
        .bind(count)
        .bind(last)
        .execute(db)
        .await
        .expect("Failed to record test hashtag search");
    }
}
