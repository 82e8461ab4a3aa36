//! Statistics snapshot store
//!
//! Snapshots are keyed by (kind, period); re-persisting the same period
//! overwrites the payload in place so scheduled refreshes stay idempotent.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::{StatisticKind, StatisticSnapshot};

/// Statistics snapshot store trait
#[async_trait]
pub trait StatisticStore: Send + Sync {
    /// Insert a snapshot, or overwrite the payload when one already
    /// exists for the same kind and period
    async fn upsert(
        &self,
        kind: StatisticKind,
        data: &serde_json::Value,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<StatisticSnapshot>;

    /// Most recently updated snapshot of the given kind
    async fn latest(&self, kind: StatisticKind) -> Result<Option<StatisticSnapshot>>;

    /// Snapshots of the given kind, most recent period first
    async fn history(&self, kind: StatisticKind, limit: usize) -> Result<Vec<StatisticSnapshot>>;
}

fn snapshot_from_row(row: &SqliteRow) -> Result<StatisticSnapshot> {
    let kind: String = row.get("statistic_type");
    let data: String = row.get("data");
    Ok(StatisticSnapshot {
        id: row.get("id"),
        kind: kind.parse()?,
        data: serde_json::from_str(&data).context("Malformed snapshot payload")?,
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const SNAPSHOT_COLUMNS: &str =
    "id, statistic_type, data, period_start, period_end, created_at, updated_at";

/// SQLx-based statistics snapshot store implementation
pub struct SqlxStatisticStore {
    pool: DbPool,
}

impl SqlxStatisticStore {
    /// Create a new SQLx statistics store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed store for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn StatisticStore> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl StatisticStore for SqlxStatisticStore {
    async fn upsert(
        &self,
        kind: StatisticKind,
        data: &serde_json::Value,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<StatisticSnapshot> {
        let payload = serde_json::to_string(data).context("Failed to serialize snapshot")?;

        sqlx::query(
            r#"
            INSERT INTO statistics (statistic_type, data, period_start, period_end)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (statistic_type, period_start, period_end) DO UPDATE SET
                data = excluded.data,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(kind.as_str())
        .bind(&payload)
        .bind(period_start)
        .bind(period_end)
        .execute(self.pool.pool())
        .await
        .context("Failed to upsert statistics snapshot")?;

        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM statistics \
             WHERE statistic_type = ? AND period_start = ? AND period_end = ?"
        );
        let row = sqlx::query(&sql)
            .bind(kind.as_str())
            .bind(period_start)
            .bind(period_end)
            .fetch_one(self.pool.pool())
            .await
            .context("Snapshot missing after upsert")?;

        snapshot_from_row(&row)
    }

    async fn latest(&self, kind: StatisticKind) -> Result<Option<StatisticSnapshot>> {
        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM statistics \
             WHERE statistic_type = ? ORDER BY updated_at DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(kind.as_str())
            .fetch_optional(self.pool.pool())
            .await
            .context("Failed to fetch latest snapshot")?;

        row.as_ref().map(snapshot_from_row).transpose()
    }

    async fn history(&self, kind: StatisticKind, limit: usize) -> Result<Vec<StatisticSnapshot>> {
        let sql = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM statistics \
             WHERE statistic_type = ? ORDER BY period_end DESC, id DESC LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(kind.as_str())
            .bind(limit as i64)
            .fetch_all(self.pool.pool())
            .await
            .context("Failed to fetch snapshot history")?;

        rows.iter().map(snapshot_from_row).collect()
    }
}
