//! Report tables derived from one set of traffic totals and one tenant mapping.
//!
//! Every table borrows the same [`TrafficTotals`], and every weight column
//! is computed with [`weight`]. Descending sorts are stable, so rows with
//! equal counts keep their first-seen order.
use crate::aggregate::TrafficTotals;
use crate::tenants::TenantShard;
use crate::weight::weight;
use indexmap::IndexMap;
use shared::csv::ToRecord;

#[derive(Clone, Debug, PartialEq)]
pub struct HostCount {
    pub host: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedHost {
    pub host: String,
    pub count: u64,
    pub weight: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TenantTraffic {
    pub tenant: String,
    pub shard_group: String,
    pub domain: String,
    pub count: u64,
    pub weight: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShardTotal {
    pub shard_group: String,
    pub total: u64,
}

impl ToRecord for HostCount {
    fn to_record(&self) -> Vec<String> {
        vec![self.host.clone(), self.count.to_string()]
    }
}

impl ToRecord for RankedHost {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.host.clone(),
            self.count.to_string(),
            self.weight.to_string(),
        ]
    }
}

impl ToRecord for TenantShard {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.tenant.clone(),
            self.shard_group.clone(),
            self.domain.clone(),
        ]
    }
}

impl ToRecord for TenantTraffic {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.tenant.clone(),
            self.shard_group.clone(),
            self.domain.clone(),
            self.count.to_string(),
            self.weight.to_string(),
        ]
    }
}

impl ToRecord for ShardTotal {
    fn to_record(&self) -> Vec<String> {
        vec![self.shard_group.clone(), self.total.to_string()]
    }
}

pub struct Rollups<'a> {
    totals: &'a TrafficTotals,
    tenants: &'a [TenantShard],
}

impl<'a> Rollups<'a> {
    pub fn new(totals: &'a TrafficTotals, tenants: &'a [TenantShard]) -> Self {
        Rollups { totals, tenants }
    }

    /// Every observed host in first-seen order.
    pub fn counts(&self) -> Vec<HostCount> {
        self.totals
            .iter()
            .map(|(host, count)| HostCount {
                host: host.to_string(),
                count,
            })
            .collect()
    }

    pub fn sorted_counts(&self) -> Vec<HostCount> {
        let mut rows = self.counts();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }

    pub fn ranked(&self) -> Vec<RankedHost> {
        self.sorted_counts()
            .into_iter()
            .map(|row| RankedHost {
                weight: weight(row.count),
                host: row.host,
                count: row.count,
            })
            .collect()
    }

    pub fn tenants(&self) -> &'a [TenantShard] {
        self.tenants
    }

    /// One row per tenant. Domains without traffic get a zero count.
    pub fn tenant_traffic(&self) -> Vec<TenantTraffic> {
        self.tenants
            .iter()
            .map(|tenant| {
                let count = self.totals.get(&tenant.domain);
                TenantTraffic {
                    tenant: tenant.tenant.clone(),
                    shard_group: tenant.shard_group.clone(),
                    domain: tenant.domain.clone(),
                    count,
                    weight: weight(count),
                }
            })
            .collect()
    }

    /// Sum of tenant weights per shard group, heaviest first.
    pub fn shard_weights(&self) -> Vec<ShardTotal> {
        self.sum_by_shard(|tenant| weight(self.totals.get(&tenant.domain)))
    }

    /// Sum of tenant request counts per shard group, busiest first.
    pub fn shard_requests(&self) -> Vec<ShardTotal> {
        self.sum_by_shard(|tenant| self.totals.get(&tenant.domain))
    }

    fn sum_by_shard<F>(&self, value: F) -> Vec<ShardTotal>
    where
        F: Fn(&TenantShard) -> u64,
    {
        let mut sums: IndexMap<&str, u64> = IndexMap::new();
        for tenant in self.tenants {
            let sum = sums.entry(tenant.shard_group.as_str()).or_insert(0);
            *sum = sum.saturating_add(value(tenant));
        }

        let mut rows: Vec<ShardTotal> = sums
            .into_iter()
            .map(|(shard_group, total)| ShardTotal {
                shard_group: shard_group.to_string(),
                total,
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }
}
