//! Retrieval facade: where raw PGN and lifetime counters come from.

mod file;
mod lichess;

use async_trait::async_trait;
use chrono::NaiveDate;
use gambit_types::{
    metrics::PerfCounts, time_control::TimeControlCategory, GambitError, Result,
};

pub use file::PgnFileSource;
pub use lichess::LichessClient;

/// Parameters of one game-history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameQuery {
    pub username: String,
    pub max_games: Option<u32>,
    /// Only games played on or after this UTC date.
    pub since: Option<NaiveDate>,
    /// Empty means every category.
    pub categories: Vec<TimeControlCategory>,
}

impl GameQuery {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            max_games: None,
            since: None,
            categories: Vec::new(),
        }
    }
}

#[async_trait]
pub trait GameSource: Send + Sync {
    /// Raw PGN text of the player's games.
    async fn fetch_games(&self, query: &GameQuery) -> Result<String>;
    /// Lifetime counters for one category, `None` when the source has none.
    async fn fetch_perf(
        &self,
        username: &str,
        category: TimeControlCategory,
    ) -> Result<Option<PerfCounts>>;
}

/// Lichess handles are 2-30 characters of ASCII letters, digits, `_` and `-`.
pub fn validate_username(username: &str) -> Result<&str> {
    let username = username.trim();
    let valid_len = (2..=30).contains(&username.len());
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid_len && valid_chars {
        Ok(username)
    } else {
        Err(GambitError::Configuration(format!(
            "'{username}' is not a valid Lichess username"
        )))
    }
}

pub fn network_error(message: impl Into<String>) -> GambitError {
    GambitError::Network(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert_eq!(validate_username(" DrNykterstein ").unwrap(), "DrNykterstein");
        assert!(validate_username("alice_b-2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("a").is_err());
        assert!(validate_username("../admin").is_err());
        assert!(validate_username("bob smith").is_err());
    }
}
