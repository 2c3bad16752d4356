use crate::decode::decode_cp_url;
use crate::metrics_defs::RECORDS_DROPPED;
use crate::parameter_store::ParameterStore;
use crate::types::{Parameter, TopologyRecord};
use shared::counter;

/// Turns a parameter-store listing into tenant topology records.
pub struct TopologyExtractor<'a> {
    store: &'a dyn ParameterStore,
    root_prefix: String,
    depth: usize,
}

impl<'a> TopologyExtractor<'a> {
    pub fn new(store: &'a dyn ParameterStore, root_prefix: &str, depth: usize) -> Self {
        TopologyExtractor {
            store,
            root_prefix: root_prefix.to_string(),
            depth,
        }
    }

    /// Lists and decodes tenant records. A store failure yields no records.
    pub async fn extract(&self) -> Vec<TopologyRecord> {
        match self.store.list_by_path(&self.root_prefix).await {
            Ok(parameters) => select_records(parameters, self.depth),
            Err(e) => {
                tracing::error!(
                    prefix = %self.root_prefix,
                    error = %e,
                    "Could not list parameters"
                );
                Vec::new()
            }
        }
    }
}

/// Keeps parameters at exactly `depth` separators whose value carries a
/// non-empty `cpUrl`, preserving listing order.
pub fn select_records(parameters: Vec<Parameter>, depth: usize) -> Vec<TopologyRecord> {
    parameters
        .into_iter()
        .filter(|parameter| parameter.depth() == depth)
        .filter_map(|parameter| match decode_cp_url(&parameter.value) {
            Ok(domain) if !domain.is_empty() => {
                Some(TopologyRecord::new(parameter.name, domain))
            }
            // Only reachable for an escaped empty value; a bare `{"cpUrl":""}`
            // fails to decode and takes the error arm below.
            Ok(_) => {
                tracing::debug!(name = %parameter.name, "Skipping parameter without cpUrl");
                None
            }
            Err(e) => {
                tracing::warn!(
                    name = %parameter.name,
                    raw_value = %parameter.value,
                    error = %e,
                    "Could not decode parameter value"
                );
                counter!(RECORDS_DROPPED).increment(1);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_store::StoreError;
    use async_trait::async_trait;

    struct StaticStore(Vec<Parameter>);

    #[async_trait]
    impl ParameterStore for StaticStore {
        async fn list_by_path(&self, prefix: &str) -> Result<Vec<Parameter>, StoreError> {
            Ok(self
                .0
                .iter()
                .filter(|p| p.name.starts_with(prefix))
                .cloned()
                .collect())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ParameterStore for FailingStore {
        async fn list_by_path(&self, _prefix: &str) -> Result<Vec<Parameter>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("access denied")))
        }
    }

    fn cp_url(url: &str) -> String {
        format!(r#"{{"cpUrl":"{url}"}}"#)
    }

    #[test]
    fn test_only_fixed_depth_is_kept() {
        let parameters = vec![
            Parameter::new("/prod/ap", cp_url("depth2.example")),
            Parameter::new("/prod/ap/hub-ap-south-1-db10", cp_url("depth3.example")),
            Parameter::new("/prod/ap/hub-ap-south-1-db10/tenanta", cp_url("d1.example")),
            Parameter::new("/prod/ap/hub-ap-south-1-db10/tenanta/x", cp_url("depth5.example")),
        ];

        for depth in 0..8 {
            let records = select_records(parameters.clone(), depth);
            assert!(records.iter().all(|r| r.key_path.matches('/').count() == depth));
        }

        let records = select_records(parameters, 4);
        assert_eq!(
            records,
            vec![TopologyRecord::new(
                "/prod/ap/hub-ap-south-1-db10/tenanta",
                "d1.example"
            )]
        );
    }

    #[test]
    fn test_undecodable_and_empty_are_dropped() {
        let parameters = vec![
            Parameter::new("/prod/ap/hub-ap-south-1-db10/a", "{broken"),
            // Dropped as a decode error, not as an empty domain.
            Parameter::new("/prod/ap/hub-ap-south-1-db10/b", r#"{"cpUrl":""}"#),
            Parameter::new("/prod/ap/hub-ap-south-1-db10/c", r#"{"other":"x"}"#),
            Parameter::new("/prod/ap/hub-ap-south-1-db10/d", cp_url("d.example")),
            // Decodes to an empty domain.
            Parameter::new("/prod/ap/hub-ap-south-1-db10/e", r#""{""cpUrl"":""""}""#),
        ];

        let records = select_records(parameters, 4);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].domain, "d.example");
    }

    #[tokio::test]
    async fn test_extract_uses_prefix() {
        let store = StaticStore(vec![
            Parameter::new("/prod/ap/hub-ap-south-1-db10/a", cp_url("a.example")),
            Parameter::new("/test/ap/hub-ap-south-1-db10/b", cp_url("b.example")),
        ]);

        let records = TopologyExtractor::new(&store, "/prod/", 4).extract().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].domain, "a.example");
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty() {
        let records = TopologyExtractor::new(&FailingStore, "/prod/", 4)
            .extract()
            .await;
        assert!(records.is_empty());
    }
}
