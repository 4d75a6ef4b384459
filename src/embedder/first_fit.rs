use bimap::BiHashMap;

use crate::domain::mapping::Mapping;
use crate::domain::request::VirtualRequest;
use crate::domain::substrate::SubstrateNetwork;
use crate::embedder::{EmbedResult, Embedder, route_virtual_edges};

/// Deterministic strategy: each virtual node lands on the first unused
/// substrate node (in creation order) with enough residual cpu.
///
/// On a fixed substrate and request this always produces the same
/// mapping.
#[derive(Debug, Default)]
pub struct FirstFitEmbedder;

impl FirstFitEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for FirstFitEmbedder {
    fn name(&self) -> &'static str {
        "first_fit"
    }

    fn embed(&mut self, substrate: &SubstrateNetwork, request: &VirtualRequest) -> EmbedResult {
        let mut node_map = BiHashMap::new();

        for (vnode, &cpu_demand) in request.cpu_demands.iter().enumerate() {
            let candidate = substrate
                .node_ids()
                .find(|snode| !node_map.contains_right(snode) && substrate.cpu_residual(*snode) >= cpu_demand);

            match candidate {
                Some(snode) => {
                    node_map.insert(vnode, snode);
                }
                None => return EmbedResult::Infeasible,
            }
        }

        match route_virtual_edges(substrate, request, &node_map) {
            Some(path_map) => EmbedResult::Embedded(Mapping { node_map, path_map }),
            None => EmbedResult::Infeasible,
        }
    }
}
