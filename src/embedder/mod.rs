pub mod first_fit;
pub mod random;

use bimap::BiHashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::mapping::{Mapping, PathMap};
use crate::domain::request::{VirtualNodeId, VirtualRequest};
use crate::domain::router;
use crate::domain::substrate::{NodeId, SubstrateNetwork};
use crate::error::{Error, Result};

pub use first_fit::FirstFitEmbedder;
pub use random::RandomEmbedder;

/// Result of one embedding attempt.
///
/// A failed attempt carries no node or link assignments at all, so
/// callers can never observe a partial mapping.
#[derive(Debug, Clone)]
pub enum EmbedResult {
    Embedded(Mapping),
    Infeasible,
}

impl EmbedResult {
    pub fn is_success(&self) -> bool {
        matches!(self, EmbedResult::Embedded(_))
    }
}

/// An embedding strategy computes a candidate mapping against a
/// read-only substrate view. It never mutates substrate state; the
/// ledger commits the mapping afterwards.
pub trait Embedder {
    fn name(&self) -> &'static str;

    fn embed(&mut self, substrate: &SubstrateNetwork, request: &VirtualRequest) -> EmbedResult;
}

/// Substrate nodes able to host a virtual node of the given demand:
/// enough residual cpu and not already used by this request. Ordered by
/// substrate creation order.
pub(crate) fn feasible_candidates(substrate: &SubstrateNetwork, node_map: &BiHashMap<VirtualNodeId, NodeId>, cpu_demand: i64) -> Vec<NodeId> {
    substrate
        .node_ids()
        .filter(|snode| !node_map.contains_right(snode) && substrate.cpu_residual(*snode) >= cpu_demand)
        .collect()
}

/// Link phase shared by all strategies: routes every virtual edge
/// through the bandwidth-filtered substrate.
///
/// All paths are computed and validated against the same residual
/// snapshot (nothing has been applied yet, so no edge accounts for
/// capacity claimed by an earlier edge of the same request). Any
/// unroutable edge fails the whole request.
pub(crate) fn route_virtual_edges(
    substrate: &SubstrateNetwork,
    request: &VirtualRequest,
    node_map: &BiHashMap<VirtualNodeId, NodeId>,
) -> Option<PathMap> {
    let mut path_map = PathMap::new();

    for edge in &request.edges {
        let source = *node_map.get_by_left(&edge.u)?;
        let target = *node_map.get_by_left(&edge.v)?;

        let path = router::find_path(substrate, source, target, edge.bandwidth)?;
        path_map.insert((edge.u, edge.v), path);
    }

    Some(path_map)
}

/// Strategy factory keyed by configuration name.
///
/// Unknown names and the not-yet-implemented greedy variant fail with a
/// configuration error instead of silently defaulting to another
/// strategy.
pub fn get_embedder(name: &str, seed: u64) -> Result<Box<dyn Embedder>> {
    match name {
        "first_fit" => Ok(Box::new(FirstFitEmbedder::new())),
        "random" => Ok(Box::new(RandomEmbedder::new(StdRng::seed_from_u64(seed)))),
        "greedy" => Err(Error::ConfigurationError("embedder 'greedy' is declared but not implemented".to_string())),
        other => Err(Error::ConfigurationError(format!("unknown embedder '{}'", other))),
    }
}
