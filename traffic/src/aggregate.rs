use crate::date_range::DateRange;
use crate::prometheus::{MetricsSource, Sample};
use indexmap::IndexMap;

/// Request counts per host summed over a date range, in first-seen order.
///
/// Totals are a plain sum, so combining days or partial totals in any order
/// yields the same counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrafficTotals {
    counts: IndexMap<String, u64>,
}

impl TrafficTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries `source` once per day of `range`, one day at a time.
    pub async fn collect(source: &dyn MetricsSource, range: &DateRange) -> Self {
        let mut totals = TrafficTotals::new();

        for day in range.days() {
            tracing::info!(date = %day, "Processing data");
            let samples = source.fetch(day).await;
            tracing::debug!(date = %day, samples = samples.len(), "Fetched samples");
            totals.add_samples(samples);
        }

        totals
    }

    pub fn add(&mut self, host: &str, count: u64) {
        match self.counts.get_mut(host) {
            Some(total) => *total = total.saturating_add(count),
            None => {
                self.counts.insert(host.to_string(), count);
            }
        }
    }

    pub fn add_samples<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = Sample>,
    {
        for sample in samples {
            self.add(&sample.host, sample.count);
        }
    }

    pub fn merge(&mut self, other: TrafficTotals) {
        for (host, count) in other.counts {
            self.add(&host, count);
        }
    }

    /// Total for `host`, zero when it was never observed.
    pub fn get(&self, host: &str) -> u64 {
        self.counts.get(host).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(host, count)| (host.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
