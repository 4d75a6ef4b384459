use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::mapping::Mapping;
use crate::domain::request::VirtualRequest;
use crate::domain::substrate::{LinkKey, NodeId, SubstrateNetwork};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient cpu on substrate node {node}: residual {residual}, requested {requested}")]
    InsufficientCpu { node: NodeId, residual: i64, requested: i64 },

    #[error("insufficient bandwidth on substrate link {link}: residual {residual}, requested {requested}")]
    InsufficientBandwidth { link: LinkKey, residual: i64, requested: i64 },
}

/// Aggregated resource demand against the substrate.
///
/// Deltas addressing the same node or link accumulate, so the reserve
/// check sees the total a reservation places on each resource rather
/// than one installment at a time.
#[derive(Debug, Clone, Default)]
pub struct ResourceDelta {
    nodes: BTreeMap<NodeId, i64>,
    links: BTreeMap<LinkKey, i64>,
}

impl ResourceDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: NodeId, amount: i64) {
        *self.nodes.entry(node).or_insert(0) += amount;
    }

    pub fn add_link(&mut self, link: LinkKey, amount: i64) {
        *self.links.entry(link).or_insert(0) += amount;
    }

    /// Full resource consumption of an accepted mapping: the cpu demand
    /// of every placed virtual node plus the bandwidth demand of every
    /// virtual edge on every consecutive link of its path.
    pub fn from_embedding(request: &VirtualRequest, mapping: &Mapping) -> Self {
        let mut delta = ResourceDelta::new();

        for (&vnode, &snode) in mapping.node_map.iter() {
            delta.add_node(snode, request.cpu_demand(vnode));
        }

        for edge in &request.edges {
            let Some(path) = mapping.path_map.get(&(edge.u, edge.v)) else {
                panic!("Mapping of request {} is missing a path for virtual edge ({}, {}).", request.id, edge.u, edge.v);
            };

            for pair in path.windows(2) {
                delta.add_link(LinkKey::new(pair[0], pair[1]), edge.bandwidth);
            }
        }

        delta
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Sole owner of substrate residual capacities.
///
/// Every component reads the substrate through `substrate()`; only the
/// ledger's reserve/release pair mutates it.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    substrate: SubstrateNetwork,
}

impl ResourceLedger {
    pub fn new(substrate: SubstrateNetwork) -> Self {
        Self { substrate }
    }

    /// Read-only view for embedding computation.
    pub fn substrate(&self) -> &SubstrateNetwork {
        &self.substrate
    }

    /// Checks the entire delta set against current residuals and applies
    /// it atomically: if any single aggregated delta would drive a
    /// residual negative, nothing is applied.
    pub fn reserve(&mut self, delta: &ResourceDelta) -> Result<(), LedgerError> {
        for (&node, &requested) in &delta.nodes {
            let residual = self.substrate.cpu_residual(node);
            if residual < requested {
                return Err(LedgerError::InsufficientCpu { node, residual, requested });
            }
        }

        for (&link, &requested) in &delta.links {
            let Some(residual) = self.substrate.bandwidth_residual(link) else {
                panic!("ResourceDelta references link {link}, which does not exist in the substrate.");
            };
            if residual < requested {
                return Err(LedgerError::InsufficientBandwidth { link, residual, requested });
            }
        }

        for (&node, &amount) in &delta.nodes {
            self.substrate.debit_cpu(node, amount);
        }

        for (&link, &amount) in &delta.links {
            self.substrate.debit_bandwidth(link, amount);
        }

        Ok(())
    }

    /// Restores exactly the amounts previously reserved for `delta`.
    ///
    /// Idempotence is the caller's responsibility: releasing the same
    /// reservation twice corrupts the residuals.
    pub fn release(&mut self, delta: &ResourceDelta) {
        for (&node, &amount) in &delta.nodes {
            self.substrate.credit_cpu(node, amount);
        }

        for (&link, &amount) in &delta.links {
            self.substrate.credit_bandwidth(link, amount);
        }
    }

    /// Commits an accepted mapping's resource consumption.
    ///
    /// Only invoked after a strategy succeeded against the current
    /// substrate state. A shortfall here means the strategy and the
    /// ledger disagree about that state, which is an
    /// internal-consistency bug: it aborts instead of clamping.
    pub fn apply(&mut self, request: &VirtualRequest, mapping: &Mapping) {
        let delta = ResourceDelta::from_embedding(request, mapping);

        if let Err(e) = self.reserve(&delta) {
            panic!("Resource invariant violated while committing accepted request {}: {e}", request.id);
        }
    }

    /// Inverse of `apply`, called exactly once per lease at expiry.
    pub fn release_embedding(&mut self, request: &VirtualRequest, mapping: &Mapping) {
        let delta = ResourceDelta::from_embedding(request, mapping);
        self.release(&delta);
    }
}
