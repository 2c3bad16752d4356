use crate::metrics_defs::PARAMETERS_LISTED;
use crate::types::Parameter;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use shared::counter;
use std::collections::HashSet;
use std::path::PathBuf;

/// One page of a `GetParametersByPath` style listing.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParameterPage {
    #[serde(default)]
    parameters: Vec<ParameterEntry>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParameterEntry {
    name: String,
    value: String,
}

impl From<ParameterEntry> for Parameter {
    fn from(entry: ParameterEntry) -> Self {
        Parameter::new(entry.name, entry.value)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("parameter store request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("parameter store returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("could not read parameter export: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse parameter listing: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter store returned next token `{0}` twice")]
    RepeatedToken(String),
}

/// Recursive listing of decrypted parameters under a path prefix.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn list_by_path(&self, prefix: &str) -> Result<Vec<Parameter>, StoreError>;
}

/// Lists parameters from an HTTP endpoint, following `NextToken` until the
/// listing is exhausted. A token seen twice ends the listing with an error.
pub struct HttpParameterStore {
    client: reqwest::Client,
    url: Url,
}

impl HttpParameterStore {
    pub fn new(url: Url) -> Self {
        HttpParameterStore {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ParameterStore for HttpParameterStore {
    async fn list_by_path(&self, prefix: &str) -> Result<Vec<Parameter>, StoreError> {
        let mut parameters = Vec::new();
        let mut next_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut page_fetches = 0;

        loop {
            let mut url = self.url.clone();
            url.query_pairs_mut()
                .append_pair("path", prefix)
                .append_pair("recursive", "true")
                .append_pair("with_decryption", "true");

            if let Some(ref token) = next_token {
                url.query_pairs_mut().append_pair("next_token", token);
            }

            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Err(StoreError::Status(response.status()));
            }

            let page = response.json::<ParameterPage>().await?;
            parameters.extend(page.parameters.into_iter().map(Parameter::from));
            page_fetches += 1;

            match page.next_token.filter(|token| !token.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    return Err(StoreError::RepeatedToken(token));
                }
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            pages = page_fetches,
            parameters = parameters.len(),
            "Fetched parameter listing"
        );
        counter!(PARAMETERS_LISTED).increment(parameters.len() as u64);

        Ok(parameters)
    }
}

/// Reads a previously exported listing, e.g. the JSON printed by
/// `aws ssm get-parameters-by-path --recursive --with-decryption`.
pub struct FileParameterStore {
    path: PathBuf,
}

impl FileParameterStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileParameterStore { path: path.into() }
    }
}

#[async_trait]
impl ParameterStore for FileParameterStore {
    async fn list_by_path(&self, prefix: &str) -> Result<Vec<Parameter>, StoreError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let page: ParameterPage = serde_json::from_str(&contents)?;

        let parameters: Vec<Parameter> = page
            .parameters
            .into_iter()
            .filter(|entry| entry.name.starts_with(prefix))
            .map(Parameter::from)
            .collect();

        tracing::info!(
            path = %self.path.display(),
            parameters = parameters.len(),
            "Loaded parameter export"
        );
        counter!(PARAMETERS_LISTED).increment(parameters.len() as u64);

        Ok(parameters)
    }
}
