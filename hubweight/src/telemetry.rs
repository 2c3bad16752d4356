//! Logging and metrics bootstrap for the binary.
use crate::config::{CommonConfig, LoggingConfig};
use metrics_exporter_statsd::StatsdBuilder;
use sentry::types::Dsn;
use shared::metrics_defs::describe_all;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "HUBWEIGHT_LOG";
const METRICS_PREFIX: &str = "hubweight";

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("could not build statsd recorder: {0}")]
    Statsd(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    RecorderInstalled,
    #[error("invalid sentry dsn: {0}")]
    InvalidDsn(#[from] sentry::types::ParseDsnError),
}

/// Keeps the sentry client alive until the end of `main`.
pub struct Telemetry {
    _sentry: Option<sentry::ClientInitGuard>,
}

fn sentry_options(logging: &LoggingConfig) -> Result<sentry::ClientOptions, TelemetryError> {
    let dsn: Dsn = logging.sentry_dsn.parse()?;

    Ok(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    })
}

pub fn init(common: &CommonConfig) -> Result<Telemetry, TelemetryError> {
    let sentry = common
        .logging
        .as_ref()
        .map(sentry_options)
        .transpose()?
        .map(sentry::init);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(sentry.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .init();

    if let Some(metrics) = &common.metrics {
        let recorder = StatsdBuilder::from(metrics.statsd_host.clone(), metrics.statsd_port)
            .build(Some(METRICS_PREFIX))?;
        metrics::set_global_recorder(recorder).map_err(|_| TelemetryError::RecorderInstalled)?;

        describe_all(topology::metrics_defs::ALL_METRICS);
        describe_all(traffic::metrics_defs::ALL_METRICS);
        tracing::info!(
            host = %metrics.statsd_host,
            port = metrics.statsd_port,
            "Sending metrics to statsd"
        );
    }

    Ok(Telemetry { _sentry: sentry })
}
