//! Scheduled recommendation cache clear
//!
//! Drops every user's cached recommendation feed so the next request
//! recomputes it from current data. Intended to run from cron or a
//! systemd timer. Exits non-zero when any user's cache entry could not
//! be cleared.

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
            SqlxFavoriteStore, SqlxHashtagStore, SqlxRecipeStore, SqlxSearchQueryStore,
            SqlxUserStore, UserStore,
        },
    },
    jobs,
    services::RecommendationService,
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

    let users = SqlxUserStore::boxed(pool.clone());
    let service = RecommendationService::new(
        SqlxRecipeStore::boxed(pool.clone()),
        SqlxFavoriteStore::boxed(pool.clone()),
        SqlxHashtagStore::boxed(pool.clone()),
        SqlxSearchQueryStore::boxed(pool.clone()),
        Arc::clone(&cache),
    );

    let user_ids = users.all_ids().await?;
    let report = jobs::clear_recommendation_caches(&service, &user_ids).await;
    println!("{}", report.summary());

    pool.close().await;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
