//! Database layer
//!
//! SQLite-backed persistence behind repository traits. The engine assumes a
//! single-node relational store; the pool and migration machinery are kept
//! behind small seams so a second driver could be added without touching
//! the services.
//!
//! # Usage
//!
//! ```ignore
//! use almanah::config::DatabaseConfig;
//! use almanah::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool, SqliteDatabase};
