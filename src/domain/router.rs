use std::collections::VecDeque;

use crate::domain::substrate::{LinkKey, NodeId, SubstrateNetwork};

/// Finds an unweighted shortest path from `source` to `target` using
/// only links whose residual bandwidth covers `bandwidth_demand`.
///
/// The search is a plain BFS over the implicitly filtered substrate.
/// Ties between equal-length paths resolve to the first path discovered
/// in traversal order; since adjacency lists follow the substrate's
/// stable creation order, the result is deterministic.
///
/// Returns `None` when no feasible path exists (including a `source` or
/// `target` with no feasible incident link).
pub fn find_path(substrate: &SubstrateNetwork, source: NodeId, target: NodeId, bandwidth_demand: i64) -> Option<Vec<NodeId>> {
    if source == target || source >= substrate.num_nodes() || target >= substrate.num_nodes() {
        return None;
    }

    let mut predecessor: Vec<Option<NodeId>> = vec![None; substrate.num_nodes()];
    let mut visited = vec![false; substrate.num_nodes()];
    let mut queue = VecDeque::new();

    visited[source] = true;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for &neighbor in substrate.neighbors(current) {
            if visited[neighbor] {
                continue;
            }

            let residual = substrate.bandwidth_residual(LinkKey::new(current, neighbor)).unwrap_or(0);
            if residual < bandwidth_demand {
                continue;
            }

            visited[neighbor] = true;
            predecessor[neighbor] = Some(current);

            if neighbor == target {
                return Some(reconstruct(&predecessor, source, target));
            }

            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(predecessor: &[Option<NodeId>], source: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;

    while current != source {
        current = predecessor[current].expect("every visited node except the source has a predecessor");
        path.push(current);
    }

    path.reverse();
    path
}
