pub type VirtualNodeId = usize;

/// An undirected virtual link with a bandwidth demand. Endpoints are
/// stored in normalized `(low, high)` order, matching how `Mapping`
/// keys its paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualEdge {
    pub u: VirtualNodeId,
    pub v: VirtualNodeId,
    pub bandwidth: i64,
}

impl VirtualEdge {
    pub fn new(u: VirtualNodeId, v: VirtualNodeId, bandwidth: i64) -> Self {
        if u <= v { Self { u, v, bandwidth } } else { Self { u: v, v: u, bandwidth } }
    }
}

/// A virtual network request. Immutable once generated: the embedding
/// pipeline only ever reads it.
#[derive(Debug, Clone)]
pub struct VirtualRequest {
    pub id: u64,
    pub arrival_time: f64,

    /// Ticks the request holds its resources after admission.
    pub duration: i64,

    /// CPU demand per virtual node; the index is the virtual node id.
    pub cpu_demands: Vec<i64>,

    pub edges: Vec<VirtualEdge>,
}

impl VirtualRequest {
    pub fn num_nodes(&self) -> usize {
        self.cpu_demands.len()
    }

    pub fn cpu_demand(&self, node: VirtualNodeId) -> i64 {
        self.cpu_demands[node]
    }
}
