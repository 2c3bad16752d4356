pub mod config;
pub mod decode;
pub mod extractor;
pub mod metrics_defs;
pub mod parameter_store;
pub mod topology_file;
pub mod types;

use config::ParameterStoreType;
use extractor::TopologyExtractor;
use parameter_store::{FileParameterStore, HttpParameterStore, ParameterStore};
use topology_file::TopologyFileError;

#[derive(thiserror::Error, Debug)]
pub enum TopologyError {
    #[error("no tenant records found under {0}")]
    NoRecords(String),
    #[error(transparent)]
    File(#[from] TopologyFileError),
}

pub fn get_store(store_type: &ParameterStoreType) -> Box<dyn ParameterStore> {
    match store_type {
        ParameterStoreType::Http { url } => Box::new(HttpParameterStore::new(url.clone())),
        ParameterStoreType::File { path } => Box::new(FileParameterStore::new(path.clone())),
    }
}

/// Extracts tenant records into the configured topology file and returns
/// how many were written. Nothing is written when no records are found.
pub async fn fetch_topology(config: &config::Config) -> Result<usize, TopologyError> {
    let store = get_store(&config.parameter_store.r#type);
    let records = TopologyExtractor::new(store.as_ref(), &config.root_prefix, config.depth)
        .extract()
        .await;

    if records.is_empty() {
        return Err(TopologyError::NoRecords(config.root_prefix.clone()));
    }

    topology_file::write(&config.output, &records)?;
    tracing::info!(
        path = %config.output.display(),
        records = records.len(),
        "Saved topology file"
    );

    Ok(records.len())
}
