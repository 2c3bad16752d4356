//! Tenant and shard-group identities derived from topology key paths.
//!
//! A key path such as `/prod/ap/hub-ap-south-1-db10/tenanta` names tenant
//! `TENANTA` on shard group `db10`.
use topology::types::TopologyRecord;

const HUB_PREFIX: &str = "hub-";
const MIN_HUB_PARTS: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct TenantShard {
    pub tenant: String,
    pub shard_group: String,
    pub domain: String,
}

impl TenantShard {
    pub fn new<T, S, D>(tenant: T, shard_group: S, domain: D) -> Self
    where
        T: Into<String>,
        S: Into<String>,
        D: Into<String>,
    {
        TenantShard {
            tenant: tenant.into(),
            shard_group: shard_group.into(),
            domain: domain.into(),
        }
    }
}

/// Maps every record with a qualifying `hub-` segment to its tenant and
/// shard group, preserving record order. Other records are left out.
pub fn derive_tenant_shards(records: &[TopologyRecord]) -> Vec<TenantShard> {
    records
        .iter()
        .filter_map(|record| {
            let tenant = record.segments().last()?.to_uppercase();
            let shard_group = record.segments().find_map(shard_group)?;
            Some(TenantShard::new(tenant, shard_group, record.domain.as_str()))
        })
        .collect()
}

/// `hub-ap-south-1-db10` -> `db10`. Segments with fewer than four
/// hyphen-separated parts do not name a shard group.
fn shard_group(segment: &str) -> Option<&str> {
    if !segment.starts_with(HUB_PREFIX) {
        return None;
    }

    let parts: Vec<&str> = segment.split('-').collect();
    if parts.len() < MIN_HUB_PARTS {
        return None;
    }
    parts.last().copied()
}
