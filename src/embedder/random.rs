use bimap::BiHashMap;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::domain::mapping::Mapping;
use crate::domain::request::VirtualRequest;
use crate::domain::substrate::SubstrateNetwork;
use crate::embedder::{EmbedResult, Embedder, feasible_candidates, route_virtual_edges};

/// Places each virtual node on a uniformly chosen feasible substrate
/// node. The RNG is seeded explicitly, so a fixed seed reproduces the
/// same mapping sequence across runs.
#[derive(Debug)]
pub struct RandomEmbedder {
    rng: StdRng,
}

impl RandomEmbedder {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Embedder for RandomEmbedder {
    fn name(&self) -> &'static str {
        "random"
    }

    fn embed(&mut self, substrate: &SubstrateNetwork, request: &VirtualRequest) -> EmbedResult {
        let mut node_map = BiHashMap::new();

        for (vnode, &cpu_demand) in request.cpu_demands.iter().enumerate() {
            let candidates = feasible_candidates(substrate, &node_map, cpu_demand);

            match candidates.choose(&mut self.rng) {
                Some(&snode) => {
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
