use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use gambit_types::{
    config::LichessConfig, metrics::PerfCounts, time_control::TimeControlCategory, GambitError,
    Result,
};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{network_error, validate_username, GameQuery, GameSource};

const PGN_MIME: &str = "application/x-chess-pgn";

/// HTTP source backed by the public Lichess API.
pub struct LichessClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl LichessClient {
    pub fn new(config: &LichessConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| network_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|token| !token.is_empty()),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, username: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| network_error(format!("request failed: {err}")))?;
        check_status(response.status(), username)?;
        Ok(response)
    }
}

#[async_trait]
impl GameSource for LichessClient {
    async fn fetch_games(&self, query: &GameQuery) -> Result<String> {
        let username = validate_username(&query.username)?;
        let url = format!("{}/api/games/user/{}", self.base_url, username);
        let params = games_query_params(query);
        info!("Fetching games for '{}' ({:?})", username, params);

        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, PGN_MIME)
            .query(&params);
        let body = self
            .send(request, username)
            .await?
            .text()
            .await
            .map_err(|err| network_error(format!("failed to read game export: {err}")))?;
        debug!("Received {} bytes of PGN for '{}'", body.len(), username);
        Ok(body)
    }

    async fn fetch_perf(
        &self,
        username: &str,
        category: TimeControlCategory,
    ) -> Result<Option<PerfCounts>> {
        let Some(perf_type) = category.perf_type() else {
            return Ok(None);
        };
        let username = validate_username(username)?;
        let url = format!("{}/api/user/{}/perf/{}", self.base_url, username, perf_type);

        let request = self.http.get(url).header(header::ACCEPT, "application/json");
        let body = self
            .send(request, username)
            .await?
            .text()
            .await
            .map_err(|err| network_error(format!("failed to read {perf_type} stats: {err}")))?;
        decode_perf(&body).map(Some)
    }
}

fn check_status(status: StatusCode, username: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(GambitError::PlayerNotFound(username.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(GambitError::RateLimited),
        s => Err(network_error(format!("unexpected HTTP status {s}"))),
    }
}

fn games_query_params(query: &GameQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("opening", "true".to_string()),
        ("clocks", "false".to_string()),
        ("evals", "false".to_string()),
    ];
    if let Some(max) = query.max_games {
        params.push(("max", max.to_string()));
    }
    if let Some(since) = query.since.and_then(start_of_day_millis) {
        params.push(("since", since.to_string()));
    }
    let perf_types: Vec<_> = query
        .categories
        .iter()
        .filter_map(|category| category.perf_type())
        .collect();
    if !perf_types.is_empty() {
        params.push(("perfType", perf_types.join(",")));
    }
    params
}

fn start_of_day_millis(date: NaiveDate) -> Option<i64> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

#[derive(Debug, Deserialize)]
struct PerfResponse {
    stat: PerfStat,
}

#[derive(Debug, Deserialize)]
struct PerfStat {
    #[serde(default)]
    count: PerfCountBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PerfCountBody {
    all: u32,
    win: u32,
    draw: u32,
    loss: u32,
}

fn decode_perf(body: &str) -> Result<PerfCounts> {
    let response: PerfResponse = serde_json::from_str(body)
        .map_err(|err| network_error(format!("malformed perf statistics: {err}")))?;
    let count = response.stat.count;
    Ok(PerfCounts {
        all: count.all,
        win: count.win,
        draw: count.draw,
        loss: count.loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_query_only_requests_openings() {
        let params = games_query_params(&GameQuery::new("alice"));
        assert_eq!(
            params,
            [
                ("opening", "true".to_string()),
                ("clocks", "false".to_string()),
                ("evals", "false".to_string()),
            ]
        );
    }

    #[test]
    fn full_query_carries_limits_and_perf_types() {
        let query = GameQuery {
            username: "alice".into(),
            max_games: Some(300),
            since: NaiveDate::from_ymd_opt(2023, 1, 1),
            categories: vec![
                TimeControlCategory::Blitz,
                TimeControlCategory::Other,
                TimeControlCategory::UltraBullet,
            ],
        };
        let params = games_query_params(&query);

        assert!(params.contains(&("max", "300".to_string())));
        assert!(params.contains(&("since", "1672531200000".to_string())));
        assert!(params.contains(&("perfType", "blitz,ultraBullet".to_string())));
    }

    #[test]
    fn decode_lichess_perf_payload() {
        let body = r#"{
            "user": {"name": "alice"},
            "perf": {"glicko": {"rating": 1850.2, "deviation": 45.1}},
            "rank": null,
            "percentile": 71.3,
            "stat": {
                "count": {"all": 120, "rated": 118, "win": 61, "loss": 50, "draw": 9, "tour": 3},
                "resultStreak": {}
            }
        }"#;
        let counts = decode_perf(body).expect("decode perf");
        assert_eq!(
            counts,
            PerfCounts {
                all: 120,
                win: 61,
                draw: 9,
                loss: 50,
            }
        );
    }

    #[test]
    fn decode_perf_without_games() {
        let counts = decode_perf(r#"{"stat": {}}"#).expect("decode perf");
        assert_eq!(counts, PerfCounts::default());
        assert!(decode_perf("<html>").is_err());
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(StatusCode::OK, "alice").is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "alice"),
            Err(GambitError::PlayerNotFound(name)) if name == "alice"
        ));
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, "alice"),
            Err(GambitError::RateLimited)
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "alice"),
            Err(GambitError::Network(_))
        ));
    }

    #[tokio::test]
    async fn other_category_has_no_perf_endpoint() {
        let client = LichessClient::new(&LichessConfig {
            base_url: "http://127.0.0.1:9".into(),
            token: None,
            user_agent: "gambit-test".into(),
            timeout_secs: 1,
        })
        .expect("client");
        let perf = client
            .fetch_perf("alice", TimeControlCategory::Other)
            .await
            .expect("no request issued");
        assert!(perf.is_none());
    }
}
