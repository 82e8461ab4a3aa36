//! Persisted statistics snapshots
//!
//! A snapshot is a durable, timestamped copy of a computed statistics
//! result, written by the scheduled refresh job. Multiple rows may exist
//! per kind (history); re-running the same period overwrites via
//! upsert-by-(kind, period).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of persisted statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    DailyVisitors,
    PopularRecipes,
    UserActivity,
    SearchQueries,
    SiteOverview,
}

impl StatisticKind {
    /// Database representation of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticKind::DailyVisitors => "daily_visitors",
            StatisticKind::PopularRecipes => "popular_recipes",
            StatisticKind::UserActivity => "user_activity",
            StatisticKind::SearchQueries => "search_queries",
            StatisticKind::SiteOverview => "site_overview",
        }
    }
}

impl std::str::FromStr for StatisticKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily_visitors" => Ok(StatisticKind::DailyVisitors),
            "popular_recipes" => Ok(StatisticKind::PopularRecipes),
            "user_activity" => Ok(StatisticKind::UserActivity),
            "search_queries" => Ok(StatisticKind::SearchQueries),
            "site_overview" => Ok(StatisticKind::SiteOverview),
            other => Err(anyhow::anyhow!("Unknown statistic kind: '{other}'")),
        }
    }
}

impl std::fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted statistics row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatisticSnapshot {
    /// Unique identifier
    pub id: i64,
    /// Kind of statistic
    pub kind: StatisticKind,
    /// Schema-free aggregated payload
    pub data: serde_json::Value,
    /// First day of the covered period
    pub period_start: NaiveDate,
    /// Last day of the covered period
    pub period_end: NaiveDate,
    /// When the row was first written
    pub created_at: DateTime<Utc>,
    /// When the row was last overwritten
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_kind_roundtrip() {
        for kind in [
            StatisticKind::DailyVisitors,
            StatisticKind::PopularRecipes,
            StatisticKind::UserActivity,
            StatisticKind::SearchQueries,
            StatisticKind::SiteOverview,
        ] {
            let parsed: StatisticKind = kind.as_str().parse().expect("Failed to parse kind");
            assert_eq!(parsed, kind);
        }
    }
}
