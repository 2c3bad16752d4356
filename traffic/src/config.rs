use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_QUERY: &str = "round(sum by (host) (increase(http_nginx_requests_total[24h])))";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("prometheus query cannot be empty")]
    EmptyQuery,
    #[error("prometheus timeout must be greater than 0")]
    InvalidTimeout,
}

/// Prometheus instant-query endpoint and credentials.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Prometheus {
    /// Full query URL, e.g. `https://prometheus.internal/api/v1/query`
    pub url: Url,
    #[serde(default = "default_query")]
    pub query: String,
    /// Prompted for when absent.
    pub username: Option<String>,
    /// Prompted for when absent.
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Prometheus {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    pub prometheus: Prometheus,
    /// Topology file written by the extractor.
    #[serde(default = "default_topology_file")]
    pub topology_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.prometheus.validate()
    }
}

fn default_query() -> String {
    DEFAULT_QUERY.into()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_topology_file() -> PathBuf {
    "hub_group_list.csv".into()
}

fn default_output_dir() -> PathBuf {
    "generated".into()
}
