use std::path::PathBuf;

use async_trait::async_trait;
use gambit_types::{metrics::PerfCounts, time_control::TimeControlCategory, Result};
use tracing::info;

use crate::{network_error, GameQuery, GameSource};

/// Offline source reading a previously exported PGN file.
///
/// The whole file is returned regardless of the query limits; games not
/// played by the queried user are filtered out during aggregation.
pub struct PgnFileSource {
    path: PathBuf,
}

impl PgnFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl GameSource for PgnFileSource {
    async fn fetch_games(&self, query: &GameQuery) -> Result<String> {
        info!(
            "Reading games for '{}' from {}",
            query.username,
            self.path.display()
        );
        tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            network_error(format!("unable to read {}: {err}", self.path.display()))
        })
    }

    async fn fetch_perf(
        &self,
        _username: &str,
        _category: TimeControlCategory,
    ) -> Result<Option<PerfCounts>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn reads_file_contents() {
        let temp_path = std::env::temp_dir().join("gambit-file-source-test.pgn");
        fs::write(&temp_path, "[White \"alice\"]\n\n1. e4 *\n").expect("write temp pgn");

        let source = PgnFileSource::new(&temp_path);
        let text = source
            .fetch_games(&GameQuery::new("alice"))
            .await
            .expect("read pgn");
        assert!(text.contains("alice"));
        assert!(source
            .fetch_perf("alice", TimeControlCategory::Blitz)
            .await
            .expect("perf")
            .is_none());

        fs::remove_file(&temp_path).expect("cleanup temp pgn");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = PgnFileSource::new("/nonexistent/games.pgn");
        assert!(source.fetch_games(&GameQuery::new("alice")).await.is_err());
    }
}
