pub mod aggregate;
pub mod config;
pub mod date_range;
pub mod metrics_defs;
pub mod prometheus;
pub mod report;
pub mod rollups;
pub mod tenants;
pub mod weight;

use aggregate::TrafficTotals;
use date_range::DateRange;
use prometheus::MetricsSource;
use report::{ReportError, ReportWriter, WrittenReport};
use rollups::Rollups;
use std::path::Path;
use topology::types::TopologyRecord;

/// Fetches traffic for every day of `range`, joins it with the topology
/// records and writes all report files into `output_dir`.
pub async fn build_report(
    source: &dyn MetricsSource,
    records: &[TopologyRecord],
    range: &DateRange,
    output_dir: &Path,
) -> Result<Vec<WrittenReport>, ReportError> {
    let tenants = tenants::derive_tenant_shards(records);
    tracing::info!(
        records = records.len(),
        tenants = tenants.len(),
        "Derived tenant shard groups"
    );

    let totals = TrafficTotals::collect(source, range).await;
    tracing::info!(hosts = totals.len(), days = range.num_days(), "Aggregated traffic");

    ReportWriter::new(output_dir).write_all(&Rollups::new(&totals, &tenants))
}
