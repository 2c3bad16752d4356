//! Per-day request counts from a Prometheus instant query.
use crate::config::Prometheus as PrometheusConfig;
use crate::metrics_defs::{DAYS_FAILED, DAYS_FETCHED, FETCH_DURATION, SAMPLES_SKIPPED};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use shared::{counter, histogram};
use std::collections::HashMap;
use std::time::{Duration, Instant};

const HOST_LABEL: &str = "host";

/// One host's request count for one day.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub host: String,
    pub count: u64,
}

impl Sample {
    pub fn new<H: Into<String>>(host: H, count: u64) -> Self {
        Sample {
            host: host.into(),
            count,
        }
    }
}

/// Source of daily traffic samples.
///
/// Implementations never fail: a day that cannot be fetched yields no samples.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch(&self, date: NaiveDate) -> Vec<Sample>;
}

#[derive(thiserror::Error, Debug)]
pub enum PrometheusError {
    #[error("prometheus request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("prometheus returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    metric: HashMap<String, String>,
    // [<unix timestamp>, "<value>"]
    value: Option<(serde_json::Value, String)>,
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct PrometheusClient {
    client: reqwest::Client,
    url: Url,
    query: String,
    credentials: Credentials,
}

impl PrometheusClient {
    pub fn new(
        config: &PrometheusConfig,
        credentials: Credentials,
    ) -> Result<Self, PrometheusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(PrometheusClient {
            client,
            url: config.url.clone(),
            query: config.query.clone(),
            credentials,
        })
    }

    /// Runs the configured query at UTC midnight of `date`.
    pub async fn query_day(&self, date: NaiveDate) -> Result<Vec<Sample>, PrometheusError> {
        let time = format!("{date}T00:00:00Z");

        let response = self
            .client
            .get(self.url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .query(&[("query", self.query.as_str()), ("time", time.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PrometheusError::Status(response.status()));
        }

        tracing::debug!(status = %response.status(), %date, "Prometheus responded");
        let body = response.json::<QueryResponse>().await?;

        Ok(samples_from(body))
    }
}

#[async_trait]
impl MetricsSource for PrometheusClient {
    async fn fetch(&self, date: NaiveDate) -> Vec<Sample> {
        let start = Instant::now();
        let result = self.query_day(date).await;
        histogram!(FETCH_DURATION).record(start.elapsed().as_secs_f64());

        match result {
            Ok(samples) => {
                counter!(DAYS_FETCHED).increment(1);
                samples
            }
            Err(e) => {
                tracing::error!(%date, error = %e, "Prometheus query failed, counting day as zero");
                counter!(DAYS_FAILED).increment(1);
                Vec::new()
            }
        }
    }
}

fn samples_from(response: QueryResponse) -> Vec<Sample> {
    let Some(data) = response.data else {
        return Vec::new();
    };

    data.result
        .into_iter()
        .filter_map(|mut result| {
            let host = result.metric.remove(HOST_LABEL);
            let count = result.value.as_ref().and_then(|(_, v)| parse_count(v));

            match (host, count) {
                (Some(host), Some(count)) => Some(Sample::new(host, count)),
                (host, _) => {
                    tracing::warn!(
                        host = host.as_deref().unwrap_or("<missing>"),
                        value = ?result.value,
                        "Skipping query result"
                    );
                    counter!(SAMPLES_SKIPPED).increment(1);
                    None
                }
            }
        })
        .collect()
}

/// Parses a sample value such as `"1234"` or `"1.234e3"`, truncating any
/// fraction. Negative values count as zero.
fn parse_count(value: &str) -> Option<u64> {
    let parsed: f64 = value.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(parsed.max(0.0).trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::testutils::spawn_server;
    use axum::{Json, Router, extract::Query, http::HeaderMap, http::StatusCode, routing::get};
    use serde_json::json;

    fn config_for(url: &str) -> PrometheusConfig {
        serde_yaml::from_str(&format!("url: \"{url}\"\ntimeout_secs: 5")).unwrap()
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "reporter".into(),
            password: "secret".into(),
        }
    }

    async fn query_handler(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<serde_json::Value>, StatusCode> {
        // "reporter:secret"
        let expected_auth = "Basic cmVwb3J0ZXI6c2VjcmV0";
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected_auth) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        assert_eq!(params.get("time").map(String::as_str), Some("2024-05-01T00:00:00Z"));
        assert!(params.get("query").is_some());

        Ok(Json(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"host": "a.example"}, "value": [1714521600, "1500"]},
                    {"metric": {"host": "b.example"}, "value": [1714521600, "42.9"]},
                    {"metric": {}, "value": [1714521600, "7"]},
                    {"metric": {"host": "c.example"}, "value": [1714521600, "NaN"]}
                ]
            }
        })))
    }

    #[tokio::test]
    async fn test_query_day() {
        let router = Router::new().route("/api/v1/query", get(query_handler));
        let (addr, _server) = spawn_server(router).await;
        let config = config_for(&format!("http://{addr}/api/v1/query"));

        let client = PrometheusClient::new(&config, credentials()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let samples = client.query_day(date).await.unwrap();

        assert_eq!(
            samples,
            vec![Sample::new("a.example", 1500), Sample::new("b.example", 42)]
        );
    }

    #[tokio::test]
    async fn test_fetch_degrades_to_empty() {
        let router = Router::new().route(
            "/api/v1/query",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let (addr, _server) = spawn_server(router).await;
        let config = config_for(&format!("http://{addr}/api/v1/query"));

        let client = PrometheusClient::new(&config, credentials()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(matches!(
            client.query_day(date).await,
            Err(PrometheusError::Status(status)) if status == StatusCode::BAD_GATEWAY
        ));
        assert!(client.fetch(date).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let router = Router::new().route("/api/v1/query", get(|| async { "<html>login</html>" }));
        let (addr, _server) = spawn_server(router).await;
        let config = config_for(&format!("http://{addr}/api/v1/query"));

        let client = PrometheusClient::new(&config, credentials()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(client.fetch(date).await.is_empty());
    }

    #[test]
    fn test_missing_data_yields_no_samples() {
        let response: QueryResponse =
            serde_json::from_value(json!({"status": "error", "error": "bad query"})).unwrap();
        assert!(samples_from(response).is_empty());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1234"), Some(1234));
        assert_eq!(parse_count("1.234e3"), Some(1234));
        assert_eq!(parse_count("999.99"), Some(999));
        assert_eq!(parse_count("-5"), Some(0));
        assert_eq!(parse_count("+Inf"), None);
        assert_eq!(parse_count("abc"), None);
    }
}
