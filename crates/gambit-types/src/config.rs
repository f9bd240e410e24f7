use std::{fs, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{time_control::TimeControlCategory, GambitError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LichessConfig {
    pub base_url: String,
    /// Personal API token, sent as a bearer token when present.
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub max_games: Option<u32>,
    pub since: Option<NaiveDate>,
    #[serde(default = "default_categories")]
    pub categories: Vec<TimeControlCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GambitConfig {
    pub lichess: LichessConfig,
    pub query: QueryConfig,
    pub display: DisplayConfig,
    pub ops: OpsConfig,
}

fn default_categories() -> Vec<TimeControlCategory> {
    TimeControlCategory::RATED.to_vec()
}

impl Default for GambitConfig {
    fn default() -> Self {
        Self {
            lichess: LichessConfig {
                base_url: "https://lichess.org".into(),
                token: None,
                user_agent: concat!("gambit/", env!("CARGO_PKG_VERSION")).into(),
                timeout_secs: 30,
            },
            query: QueryConfig {
                max_games: None,
                since: NaiveDate::from_ymd_opt(2023, 1, 1),
                categories: default_categories(),
            },
            display: DisplayConfig { top_n: 5 },
            ops: OpsConfig {
                log_level: "info".into(),
                log_file: None,
            },
        }
    }
}

impl GambitConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            GambitError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            GambitError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.lichess.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GambitError::Configuration(
                "lichess.base_url must be an http(s) URL".into(),
            ));
        }
        if self.lichess.timeout_secs == 0 {
            return Err(GambitError::Configuration(
                "lichess.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.query.max_games == Some(0) {
            return Err(GambitError::Configuration(
                "query.max_games must be greater than zero when set".into(),
            ));
        }
        if self.display.top_n == 0 {
            return Err(GambitError::Configuration(
                "display.top_n must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
