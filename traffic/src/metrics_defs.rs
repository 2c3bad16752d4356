//! Metrics definitions for the traffic report.

use shared::metrics_defs::{MetricDef, MetricType};

pub const DAYS_FETCHED: MetricDef = MetricDef {
    name: "traffic.days.fetched",
    metric_type: MetricType::Counter,
    description: "Number of days successfully queried from Prometheus",
};

pub const DAYS_FAILED: MetricDef = MetricDef {
    name: "traffic.days.failed",
    metric_type: MetricType::Counter,
    description: "Number of days whose Prometheus query failed and counted as zero traffic",
};

pub const SAMPLES_SKIPPED: MetricDef = MetricDef {
    name: "traffic.samples.skipped",
    metric_type: MetricType::Counter,
    description: "Number of query results ignored for a missing host label or bad value",
};

pub const FETCH_DURATION: MetricDef = MetricDef {
    name: "traffic.fetch.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete one day's Prometheus query in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[DAYS_FETCHED, DAYS_FAILED, SAMPLES_SKIPPED, FETCH_DURATION];
