use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("root prefix must start and end with '/': {0}")]
    InvalidRootPrefix(String),
    #[error("depth must be greater than 0")]
    InvalidDepth,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum ParameterStoreType {
    Http { url: Url },
    File { path: PathBuf },
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct ParameterStore {
    #[serde(flatten)]
    pub r#type: ParameterStoreType,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    pub parameter_store: ParameterStore,
    /// Listing root. Tenant keys live a fixed number of levels below it.
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,
    /// Number of `/` separators in a tenant key, root included.
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_root_prefix() -> String {
    "/prod/".into()
}

fn default_depth() -> usize {
    4
}

fn default_output() -> PathBuf {
    "hub_group_list.csv".into()
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.root_prefix.starts_with('/') || !self.root_prefix.ends_with('/') {
            return Err(ValidationError::InvalidRootPrefix(self.root_prefix.clone()));
        }
        if self.depth == 0 {
            return Err(ValidationError::InvalidDepth);
        }
        Ok(())
    }
}
