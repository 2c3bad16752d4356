use serde::Deserialize;
use std::fs::File;
use topology::config::Config as TopologyConfig;
use traffic::config::Config as TrafficConfig;

#[derive(Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Deserialize, Debug)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub topology: Option<TopologyConfig>,
    pub traffic: Option<TrafficConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use topology::config::ParameterStoreType;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: "https://key@sentry.example/1"
            topology:
                parameter_store:
                    type: file
                    path: /var/lib/hubweight/parameters.json
            traffic:
                prometheus:
                    url: "https://prometheus.internal/api/v1/query"
                    username: reporter
                output_dir: /var/lib/hubweight/generated
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
        assert!(config.common.logging.is_some());

        let topology = config.topology.expect("topology config");
        assert_eq!(
            topology.parameter_store.r#type,
            ParameterStoreType::File {
                path: "/var/lib/hubweight/parameters.json".into()
            }
        );
        assert_eq!(topology.root_prefix, "/prod/");

        let traffic = config.traffic.expect("traffic config");
        assert_eq!(traffic.prometheus.username.as_deref(), Some("reporter"));
        assert_eq!(traffic.output_dir.to_str(), Some("/var/lib/hubweight/generated"));
    }

    #[test]
    fn sections_are_optional() {
        let yaml = r#"
            traffic:
                prometheus:
                    url: "http://127.0.0.1:9090/api/v1/query"
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");
        assert!(config.topology.is_none());
        assert!(config.common.metrics.is_none());
        assert!(config.traffic.is_some());
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.yaml")),
            Err(ConfigError::LoadError(_))
        ));

        let tmp = write_tmp_file("traffic: [not, a, map]");
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
