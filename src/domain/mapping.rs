use bimap::BiHashMap;
use std::collections::HashMap;

use crate::domain::request::{VirtualNodeId, VirtualRequest};
use crate::domain::substrate::NodeId;

/// Substrate walk realizing one virtual edge: first/last elements are
/// the mapped endpoints, every consecutive pair is an existing link,
/// length >= 2.
pub type SubstratePath = Vec<NodeId>;

/// Paths per virtual edge, keyed by the edge's normalized endpoints.
pub type PathMap = HashMap<(VirtualNodeId, VirtualNodeId), SubstratePath>;

/// A complete candidate embedding of one request.
///
/// The node map is a bimap, so no two virtual nodes can share a
/// substrate node by construction.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pub node_map: BiHashMap<VirtualNodeId, NodeId>,
    pub path_map: PathMap,
}

impl Mapping {
    pub fn substrate_node(&self, vnode: VirtualNodeId) -> Option<NodeId> {
        self.node_map.get_by_left(&vnode).copied()
    }
}

/// An admitted request holding substrate resources until `expires_at`.
///
/// Owned by the simulation clock from acceptance until expiry; the
/// ledger releases its resources exactly once when it is destroyed.
#[derive(Debug, Clone)]
pub struct Lease {
    pub request: VirtualRequest,
    pub mapping: Mapping,
    pub expires_at: f64,
}
