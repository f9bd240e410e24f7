//! Dashboard pipeline: retrieve, parse, aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use gambit_client::{GameQuery, GameSource};
use gambit_types::{
    config::QueryConfig,
    metrics::{MetricsSummary, PerfCounts},
    time_control::TimeControlCategory,
    GambitError, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Lifetime counters for one rating category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfSnapshot {
    pub category: TimeControlCategory,
    /// `None` when the source has no statistics or the request failed.
    pub counts: Option<PerfCounts>,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub username: String,
    pub generated_at: DateTime<Utc>,
    pub games_parsed: usize,
    /// First and last game date, when any parsed game is dated.
    pub period: Option<(NaiveDate, NaiveDate)>,
    pub summary: MetricsSummary,
    pub lifetime: Vec<PerfSnapshot>,
    /// Set when the game history could not be retrieved; the summary is
    /// then empty.
    pub fetch_error: Option<String>,
}

pub struct Dashboard<S>
where
    S: GameSource,
{
    source: S,
    query: QueryConfig,
    top_n: usize,
}

impl<S> Dashboard<S>
where
    S: GameSource,
{
    pub fn new(source: S, query: QueryConfig, top_n: usize) -> Self {
        Self {
            source,
            query,
            top_n,
        }
    }

    pub async fn load(&self, username: &str) -> Result<DashboardReport> {
        let username = username.trim();
        if username.is_empty() {
            return Err(dashboard_error("please enter a Lichess username"));
        }

        let query = GameQuery {
            username: username.to_string(),
            max_games: self.query.max_games,
            since: self.query.since,
            categories: self.query.categories.clone(),
        };
        let lifetime = join_all(
            TimeControlCategory::RATED
                .into_iter()
                .map(|category| self.lifetime_counts(username, category)),
        );
        let (games, lifetime) = futures::join!(self.source.fetch_games(&query), lifetime);

        let (records, fetch_error) = match games {
            Ok(text) => (gambit_pgn::parse_games(&text), None),
            Err(err) => {
                warn!("Failed to retrieve games for '{}': {}", username, err);
                (Vec::new(), Some(err.to_string()))
            }
        };

        let summary = gambit_stats::aggregate(&records, username, self.top_n);
        info!(
            "Aggregated {} games for '{}' ({} played by them)",
            records.len(),
            username,
            summary.totals().played
        );

        Ok(DashboardReport {
            username: username.to_string(),
            generated_at: Utc::now(),
            games_parsed: records.len(),
            period: gambit_stats::date_range(&records),
            summary,
            lifetime,
            fetch_error,
        })
    }

    async fn lifetime_counts(&self, username: &str, category: TimeControlCategory) -> PerfSnapshot {
        let counts = match self.source.fetch_perf(username, category).await {
            Ok(counts) => counts,
            Err(err) => {
                warn!("Failed to retrieve {} stats for '{}': {}", category, username, err);
                None
            }
        };
        PerfSnapshot { category, counts }
    }
}

pub fn dashboard_error(message: impl Into<String>) -> GambitError {
    GambitError::Configuration(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gambit_types::game::PlayerColor;
    use std::sync::Mutex;

    const EXPORT: &str = r#"[White "alice"]
[Black "bob"]
[Result "1-0"]
[UTCDate "2024.02.10"]
[TimeControl "180+0"]
[Opening "Sicilian Defense"]

1. e4 c5 1-0


[White "bob"]
[Black "alice"]
[Result "*"]
[UTCDate "2024.01.28"]
[TimeControl "600+5"]
[Opening "French Defense"]

1. e4 e6 *


"#;

    struct StubSource {
        games: Option<&'static str>,
        seen_query: Mutex<Option<GameQuery>>,
    }

    impl StubSource {
        fn new(games: Option<&'static str>) -> Self {
            Self {
                games,
                seen_query: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl GameSource for StubSource {
        async fn fetch_games(&self, query: &GameQuery) -> Result<String> {
            *self.seen_query.lock().unwrap() = Some(query.clone());
            self.games
                .map(str::to_string)
                .ok_or_else(|| GambitError::PlayerNotFound(query.username.clone()))
        }

        async fn fetch_perf(
            &self,
            _username: &str,
            category: TimeControlCategory,
        ) -> Result<Option<PerfCounts>> {
            match category {
                TimeControlCategory::Blitz => Ok(Some(PerfCounts {
                    all: 10,
                    win: 6,
                    draw: 1,
                    loss: 3,
                })),
                TimeControlCategory::Classical => Err(GambitError::RateLimited),
                _ => Ok(None),
            }
        }
    }

    fn query_config() -> QueryConfig {
        QueryConfig {
            max_games: Some(100),
            since: None,
            categories: vec![TimeControlCategory::Blitz, TimeControlCategory::Rapid],
        }
    }

    #[tokio::test]
    async fn load_aggregates_fetched_games() {
        let dashboard = Dashboard::new(StubSource::new(Some(EXPORT)), query_config(), 5);
        let report = dashboard.load(" alice ").await.expect("load report");

        assert_eq!(report.username, "alice");
        assert_eq!(report.games_parsed, 2);
        assert!(report.fetch_error.is_none());
        assert_eq!(
            report.period,
            NaiveDate::from_ymd_opt(2024, 1, 28).zip(NaiveDate::from_ymd_opt(2024, 2, 10))
        );

        let blitz = report
            .summary
            .partition(TimeControlCategory::Blitz, PlayerColor::White);
        assert_eq!((blitz.played, blitz.wins), (1, 1));
        let rapid = report
            .summary
            .partition(TimeControlCategory::Rapid, PlayerColor::Black);
        assert_eq!((rapid.played, rapid.decided()), (1, 0));
        assert_eq!(rapid.openings[0].name, "French Defense");

        let seen = dashboard.source.seen_query.lock().unwrap().clone();
        let seen = seen.expect("games requested");
        assert_eq!(seen.username, "alice");
        assert_eq!(seen.max_games, Some(100));
    }

    #[tokio::test]
    async fn lifetime_failures_are_recorded_as_missing() {
        let dashboard = Dashboard::new(StubSource::new(Some(EXPORT)), query_config(), 5);
        let report = dashboard.load("alice").await.expect("load report");

        assert_eq!(report.lifetime.len(), TimeControlCategory::RATED.len());
        let blitz = report
            .lifetime
            .iter()
            .find(|s| s.category == TimeControlCategory::Blitz)
            .expect("blitz snapshot");
        assert_eq!(blitz.counts.map(|c| c.all), Some(10));
        let classical = report
            .lifetime
            .iter()
            .find(|s| s.category == TimeControlCategory::Classical)
            .expect("classical snapshot");
        assert!(classical.counts.is_none());
    }

    #[tokio::test]
    async fn fetch_failure_yields_empty_summary() {
        let dashboard = Dashboard::new(StubSource::new(None), query_config(), 5);
        let report = dashboard.load("ghost").await.expect("load report");

        assert_eq!(report.games_parsed, 0);
        assert_eq!(report.period, None);
        assert_eq!(report.summary, MetricsSummary::empty(5));
        assert!(report
            .fetch_error
            .as_deref()
            .is_some_and(|msg| msg.contains("ghost")));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let dashboard = Dashboard::new(StubSource::new(Some(EXPORT)), query_config(), 5);
        assert!(matches!(
            dashboard.load("   ").await,
            Err(GambitError::Configuration(_))
        ));
    }
}
