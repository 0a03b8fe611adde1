//! Input preparation for free range allocation.
//!
//! Finding free sub-ranges is done by an external [`RangeAllocator`]. This
//! module only checks a request and resolves it into the candidate networks,
//! wanted length and count the allocator works with.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::net::{Family, Network, parse_network};
use crate::settings::AllocationSettings;

/// The parts of a pool that allocation cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolPrefixes {
    pub prefixes: Vec<String>,
    pub ipv4_default_prefix_length: Option<u8>,
    pub ipv6_default_prefix_length: Option<u8>,
}

impl PoolPrefixes {
    fn default_length(&self, family: Family) -> Option<u8> {
        match family {
            Family::V4 => self.ipv4_default_prefix_length,
            Family::V6 => self.ipv6_default_prefix_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationSource {
    Pool { pool: PoolPrefixes, family: Family },
    Prefixes(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Routing context the new ranges must be unique in.
    pub vrf_id: i64,
    pub source: AllocationSource,
    pub prefix_length: Option<u8>,
    pub count: Option<usize>,
}

impl AllocationRequest {
    pub fn from_pool(vrf_id: i64, pool: PoolPrefixes, family: Family) -> Self {
        Self { vrf_id, source: AllocationSource::Pool { pool, family }, prefix_length: None, count: None }
    }
    pub fn from_prefixes(vrf_id: i64, prefixes: Vec<String>, prefix_length: u8) -> Self {
        Self {
            vrf_id,
            source: AllocationSource::Prefixes(prefixes),
            prefix_length: Some(prefix_length),
            count: None,
        }
    }
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
    pub fn with_prefix_length(mut self, prefix_length: u8) -> Self {
        self.prefix_length = Some(prefix_length);
        self
    }
}

/// A checked request, ready for the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationInput {
    pub vrf_id: i64,
    pub family: Family,
    pub candidates: Vec<Network>,
    pub prefix_length: u8,
    pub count: usize,
}

/// Finds free sub-ranges of the wanted size among the candidates.
pub trait RangeAllocator {
    fn free_ranges(&self, input: &AllocationInput) -> Result<Vec<String>>;
}

fn invalid(message: impl Into<String>) -> SearchError {
    SearchError::Allocation(message.into())
}

pub fn prepare(request: &AllocationRequest, settings: &AllocationSettings) -> Result<AllocationInput> {
    let count = request.count.unwrap_or(1);
    if count > settings.max_count {
        return Err(invalid("count over the maximum result size"));
    }

    let (family, candidates, prefix_length) = match &request.source {
        AllocationSource::Pool { pool, family } => {
            let candidates: Vec<Network> = pool
                .prefixes
                .iter()
                .filter_map(|p| parse_network(p))
                .filter(|n| n.family() == *family)
                .collect();
            if candidates.is_empty() {
                return Err(invalid(format!("No prefixes of family {} in pool", family)));
            }
            let prefix_length = request
                .prefix_length
                .or_else(|| pool.default_length(*family))
                .ok_or_else(|| invalid(format!("No default prefix length for family {} in pool", family)))?;
            (*family, candidates, prefix_length)
        }
        AllocationSource::Prefixes(prefixes) => {
            let prefix_length = request
                .prefix_length
                .ok_or_else(|| invalid("'prefix_length' must be specified with 'from-prefix'"))?;
            let mut family: Option<Family> = None;
            let mut candidates = Vec::with_capacity(prefixes.len());
            for prefix in prefixes {
                let network = parse_network(prefix).ok_or_else(|| invalid(format!("Invalid prefix '{}'", prefix)))?;
                match family {
                    None => family = Some(network.family()),
                    Some(f) if f != network.family() => {
                        return Err(invalid(
                            "mixing of address-family is not allowed for 'from-prefix' arg",
                        ));
                    }
                    Some(_) => (),
                }
                candidates.push(network);
            }
            let family = family.ok_or_else(|| invalid("'from-prefix' needs at least one prefix"))?;
            (family, candidates, prefix_length)
        }
    };

    if prefix_length > family.max_length() {
        return Err(invalid(format!(
            "the specified wanted prefix length argument must be between 0 and {} for ipv{}",
            family.max_length(),
            family
        )));
    }

    debug!(vrf_id = request.vrf_id, %family, prefix_length, count, candidates = candidates.len(), "allocation prepared");
    Ok(AllocationInput { vrf_id: request.vrf_id, family, candidates, prefix_length, count })
}

/// Prepares `request` and asks `allocator` for free ranges.
pub fn find_free(
    request: &AllocationRequest,
    settings: &AllocationSettings,
    allocator: &dyn RangeAllocator,
) -> Result<Vec<String>> {
    let input = prepare(request, settings)?;
    allocator.free_ranges(&input)
}
