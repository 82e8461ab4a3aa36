//! Scheduled statistics refresh
//!
//! Computes fresh site and user-activity statistics and persists them as
//! snapshots for the trailing week. Intended to run from cron or a
//! systemd timer. Exits non-zero when any snapshot target failed.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use almanah::{
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCommentStore, SqlxFavoriteStore, SqlxHashtagStore, SqlxRecipeStore,
            SqlxStatisticStore, SqlxUserStore,
        },
    },
    jobs,
    services::StatisticsService,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almanah=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let cache = create_cache(&config.cache).await?;

    let service = StatisticsService::new(
        SqlxRecipeStore::boxed(pool.clone()),
        SqlxUserStore::boxed(pool.clone()),
        SqlxFavoriteStore::boxed(pool.clone()),
        SqlxHashtagStore::boxed(pool.clone()),
        SqlxStatisticStore::boxed(pool.clone()),
        Some(SqlxCommentStore::boxed(pool.clone())),
        Arc::clone(&cache),
    );

    let report = jobs::refresh_statistics(&service).await;
    println!("{}", report.summary());

    pool.close().await;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
