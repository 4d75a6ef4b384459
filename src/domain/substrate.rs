use std::collections::BTreeMap;

pub type NodeId = usize;

/// Endpoints of an undirected substrate link, stored in normalized
/// `(low, high)` order so `(u, v)` and `(v, u)` address the same link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub a: NodeId,
    pub b: NodeId,
}

impl LinkKey {
    pub fn new(u: NodeId, v: NodeId) -> Self {
        if u <= v { Self { a: u, b: v } } else { Self { a: v, b: u } }
    }
}

impl std::fmt::Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

#[derive(Debug, Clone)]
pub struct SubstrateNode {
    cpu_capacity: i64,
    cpu_residual: i64,
}

#[derive(Debug, Clone)]
pub struct SubstrateLink {
    bandwidth_capacity: i64,
    bandwidth_residual: i64,
}

/// The physical network hosting virtual requests.
///
/// Nodes are identified by their creation index, links by normalized
/// `LinkKey`s. Iteration over nodes and adjacency lists follows stable
/// creation order, which the router and the FirstFit strategy rely on
/// for reproducible results.
///
/// Residuals are private: every mutation goes through the
/// `pub(crate)` debit/credit hooks, which only `ledger::ResourceLedger`
/// calls.
#[derive(Debug, Clone, Default)]
pub struct SubstrateNetwork {
    nodes: Vec<SubstrateNode>,
    links: BTreeMap<LinkKey, SubstrateLink>,
    adjacency: Vec<Vec<NodeId>>,
}

impl SubstrateNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, cpu_capacity: i64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SubstrateNode { cpu_capacity, cpu_residual: cpu_capacity });
        self.adjacency.push(Vec::new());
        id
    }

    pub fn add_link(&mut self, u: NodeId, v: NodeId, bandwidth_capacity: i64) -> LinkKey {
        if u == v {
            panic!("Self-loop ({u}, {v}) is not a valid substrate link.");
        }
        if u >= self.nodes.len() || v >= self.nodes.len() {
            panic!("Link endpoints ({u}, {v}) must be existing substrate nodes.");
        }

        let key = LinkKey::new(u, v);
        let inserted = self
            .links
            .insert(key, SubstrateLink { bandwidth_capacity, bandwidth_residual: bandwidth_capacity })
            .is_none();

        // A duplicate link replaces the previous capacity; the adjacency
        // lists must not grow a second entry for it.
        if inserted {
            self.adjacency[u].push(v);
            self.adjacency[v].push(u);
        }

        key
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Node ids in stable creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.nodes.len()
    }

    pub fn cpu_capacity(&self, node: NodeId) -> i64 {
        self.nodes[node].cpu_capacity
    }

    pub fn cpu_residual(&self, node: NodeId) -> i64 {
        self.nodes[node].cpu_residual
    }

    pub fn has_link(&self, key: LinkKey) -> bool {
        self.links.contains_key(&key)
    }

    pub fn bandwidth_capacity(&self, key: LinkKey) -> Option<i64> {
        self.links.get(&key).map(|link| link.bandwidth_capacity)
    }

    pub fn bandwidth_residual(&self, key: LinkKey) -> Option<i64> {
        self.links.get(&key).map(|link| link.bandwidth_residual)
    }

    pub fn link_keys(&self) -> impl Iterator<Item = LinkKey> + '_ {
        self.links.keys().copied()
    }

    /// Neighbors of `node` in link-insertion order.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node]
    }

    pub(crate) fn debit_cpu(&mut self, node: NodeId, amount: i64) {
        let residual = &mut self.nodes[node].cpu_residual;
        *residual -= amount;
        debug_assert!(*residual >= 0, "cpu residual of node {node} went negative");
    }

    pub(crate) fn credit_cpu(&mut self, node: NodeId, amount: i64) {
        let node_state = &mut self.nodes[node];
        node_state.cpu_residual += amount;
        debug_assert!(node_state.cpu_residual <= node_state.cpu_capacity, "cpu residual of node {node} exceeds its capacity");
    }

    pub(crate) fn debit_bandwidth(&mut self, key: LinkKey, amount: i64) {
        let Some(link) = self.links.get_mut(&key) else {
            panic!("SubstrateLink {key} was not found in the SubstrateNetwork.");
        };
        link.bandwidth_residual -= amount;
        debug_assert!(link.bandwidth_residual >= 0, "bandwidth residual of link {key} went negative");
    }

    pub(crate) fn credit_bandwidth(&mut self, key: LinkKey, amount: i64) {
        let Some(link) = self.links.get_mut(&key) else {
            panic!("SubstrateLink {key} was not found in the SubstrateNetwork.");
        };
        link.bandwidth_residual += amount;
        debug_assert!(link.bandwidth_residual <= link.bandwidth_capacity, "bandwidth residual of link {key} exceeds its capacity");
    }
}
