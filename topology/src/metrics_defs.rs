//! Metrics definitions for the topology extractor.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PARAMETERS_LISTED: MetricDef = MetricDef {
    name: "topology.parameters.listed",
    metric_type: MetricType::Counter,
    description: "Number of parameters returned by the parameter store",
};

pub const RECORDS_DROPPED: MetricDef = MetricDef {
    name: "topology.records.dropped",
    metric_type: MetricType::Counter,
    description: "Number of tenant parameters dropped because their value could not be decoded",
};

pub const ALL_METRICS: &[MetricDef] = &[PARAMETERS_LISTED, RECORDS_DROPPED];
