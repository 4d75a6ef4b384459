use rand::Rng;
use rand::rngs::StdRng;
use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::config::{SubstrateConfig, VnrConfig};
use crate::domain::clock::RequestProvider;
use crate::domain::request::{VirtualEdge, VirtualRequest};
use crate::domain::substrate::SubstrateNetwork;

/// Draws an Erdős–Rényi substrate network with uniform integer
/// capacities from the configured inclusive ranges.
///
/// No connectivity guarantee: a disconnected substrate simply makes
/// some virtual links unroutable.
pub fn generate_substrate(config: &SubstrateConfig, rng: &mut StdRng) -> SubstrateNetwork {
    let mut substrate = SubstrateNetwork::new();

    for _ in 0..config.num_nodes {
        let cpu = rng.random_range(config.cpu_range[0]..=config.cpu_range[1]);
        substrate.add_node(cpu);
    }

    for u in 0..config.num_nodes {
        for v in (u + 1)..config.num_nodes {
            if rng.random_bool(config.edge_prob) {
                let bandwidth = rng.random_range(config.bandwidth_range[0]..=config.bandwidth_range[1]);
                substrate.add_link(u, v, bandwidth);
            }
        }
    }

    log::debug!("Generated substrate with {} nodes and {} links.", substrate.num_nodes(), substrate.num_links());

    substrate
}

/// Request source drawing Erdős–Rényi virtual topologies.
///
/// Topologies are resampled until connected, so every handed-out
/// request satisfies the provider contract. Request ids are monotonic.
pub struct VnrGenerator {
    config: VnrConfig,
    rng: StdRng,
    next_id: u64,
}

impl VnrGenerator {
    pub fn new(config: VnrConfig, rng: StdRng) -> Self {
        Self { config, rng, next_id: 0 }
    }

    fn sample_topology(&mut self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();

        for u in 0..self.config.num_nodes {
            for v in (u + 1)..self.config.num_nodes {
                if self.rng.random_bool(self.config.edge_prob) {
                    edges.push((u, v));
                }
            }
        }

        edges
    }
}

impl RequestProvider for VnrGenerator {
    fn next_request(&mut self, arrival_time: f64) -> VirtualRequest {
        let num_nodes = self.config.num_nodes;

        let edges = loop {
            let candidate = self.sample_topology();
            if is_connected(num_nodes, &candidate) {
                break candidate;
            }
        };

        let cpu_demands = (0..num_nodes).map(|_| self.rng.random_range(self.config.cpu_range[0]..=self.config.cpu_range[1])).collect();

        let edges = edges
            .into_iter()
            .map(|(u, v)| VirtualEdge::new(u, v, self.rng.random_range(self.config.bandwidth_range[0]..=self.config.bandwidth_range[1])))
            .collect();

        let duration = self.rng.random_range(self.config.duration_range[0]..=self.config.duration_range[1]);

        let id = self.next_id;
        self.next_id += 1;

        VirtualRequest { id, arrival_time, duration, cpu_demands, edges }
    }
}

/// Union-find connectivity check over an edge list.
pub fn is_connected(num_nodes: usize, edges: &[(usize, usize)]) -> bool {
    if num_nodes == 0 {
        return false;
    }

    let mut components = QuickUnionUf::<UnionBySize>::new(num_nodes);

    for &(u, v) in edges {
        components.union(u, v);
    }

    let root = components.find(0);
    (1..num_nodes).all(|node| components.find(node) == root)
}
