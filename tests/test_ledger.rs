use bimap::BiHashMap;

use vne_sim::domain::ledger::{LedgerError, ResourceDelta, ResourceLedger};
use vne_sim::domain::mapping::Mapping;
use vne_sim::domain::request::{VirtualEdge, VirtualRequest};
use vne_sim::domain::substrate::{LinkKey, SubstrateNetwork};

/// 3 nodes with cpu 10 each, one link (0, 1) with bandwidth 5.
fn small_substrate() -> SubstrateNetwork {
    let mut substrate = SubstrateNetwork::new();
    substrate.add_node(10);
    substrate.add_node(10);
    substrate.add_node(10);
    substrate.add_link(0, 1, 5);
    substrate
}

fn two_node_request(cpu: [i64; 2], bandwidth: i64) -> VirtualRequest {
    VirtualRequest {
        id: 0,
        arrival_time: 0.0,
        duration: 3,
        cpu_demands: vec![cpu[0], cpu[1]],
        edges: vec![VirtualEdge::new(0, 1, bandwidth)],
    }
}

fn identity_mapping() -> Mapping {
    let mut node_map = BiHashMap::new();
    node_map.insert(0usize, 0usize);
    node_map.insert(1usize, 1usize);

    let mut mapping = Mapping { node_map, ..Mapping::default() };
    mapping.path_map.insert((0, 1), vec![0, 1]);
    mapping
}

#[test]
fn reserve_debits_every_delta() {
    let mut ledger = ResourceLedger::new(small_substrate());

    let mut delta = ResourceDelta::new();
    delta.add_node(0, 4);
    delta.add_node(1, 6);
    delta.add_link(LinkKey::new(0, 1), 5);

    ledger.reserve(&delta).expect("residuals cover the delta");

    assert_eq!(ledger.substrate().cpu_residual(0), 6);
    assert_eq!(ledger.substrate().cpu_residual(1), 4);
    assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(0));
}

#[test]
fn reserve_is_atomic_on_shortfall() {
    let mut ledger = ResourceLedger::new(small_substrate());

    // Node 0 alone would fit, node 1 does not: nothing may be applied.
    let mut delta = ResourceDelta::new();
    delta.add_node(0, 4);
    delta.add_node(1, 11);

    let err = ledger.reserve(&delta).unwrap_err();
    assert_eq!(err, LedgerError::InsufficientCpu { node: 1, residual: 10, requested: 11 });

    assert_eq!(ledger.substrate().cpu_residual(0), 10);
    assert_eq!(ledger.substrate().cpu_residual(1), 10);
}

#[test]
fn reserve_checks_aggregated_link_demand() {
    let mut ledger = ResourceLedger::new(small_substrate());

    // Each installment fits on its own, their sum does not.
    let mut delta = ResourceDelta::new();
    delta.add_link(LinkKey::new(0, 1), 3);
    delta.add_link(LinkKey::new(0, 1), 3);

    let err = ledger.reserve(&delta).unwrap_err();
    assert_eq!(err, LedgerError::InsufficientBandwidth { link: LinkKey::new(0, 1), residual: 5, requested: 6 });

    assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(5));
}

#[test]
fn release_restores_exact_amounts() {
    let mut ledger = ResourceLedger::new(small_substrate());

    let mut delta = ResourceDelta::new();
    delta.add_node(2, 7);
    delta.add_link(LinkKey::new(0, 1), 2);

    ledger.reserve(&delta).expect("residuals cover the delta");
    ledger.release(&delta);

    assert_eq!(ledger.substrate().cpu_residual(2), 10);
    assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(5));
}

#[test]
fn apply_then_release_round_trips_for_all_demands() {
    for cpu in 0..=10 {
        for bandwidth in 0..=5 {
            let mut ledger = ResourceLedger::new(small_substrate());
            let request = two_node_request([cpu, cpu], bandwidth);
            let mapping = identity_mapping();

            ledger.apply(&request, &mapping);

            assert_eq!(ledger.substrate().cpu_residual(0), 10 - cpu);
            assert_eq!(ledger.substrate().cpu_residual(1), 10 - cpu);
            assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(5 - bandwidth));

            ledger.release_embedding(&request, &mapping);

            assert_eq!(ledger.substrate().cpu_residual(0), 10);
            assert_eq!(ledger.substrate().cpu_residual(1), 10);
            assert_eq!(ledger.substrate().cpu_residual(2), 10);
            assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(5));
        }
    }
}

#[test]
fn apply_charges_every_hop_of_a_multi_link_path() {
    let mut substrate = SubstrateNetwork::new();
    substrate.add_node(10);
    substrate.add_node(10);
    substrate.add_node(10);
    substrate.add_link(0, 1, 8);
    substrate.add_link(1, 2, 8);

    let mut ledger = ResourceLedger::new(substrate);

    let request = VirtualRequest {
        id: 1,
        arrival_time: 0.0,
        duration: 1,
        cpu_demands: vec![2, 2],
        edges: vec![VirtualEdge::new(0, 1, 3)],
    };

    let mut node_map = BiHashMap::new();
    node_map.insert(0usize, 0usize);
    node_map.insert(1usize, 2usize);
    let mut mapping = Mapping { node_map, ..Mapping::default() };
    mapping.path_map.insert((0, 1), vec![0, 1, 2]);

    ledger.apply(&request, &mapping);

    assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(0, 1)), Some(5));
    assert_eq!(ledger.substrate().bandwidth_residual(LinkKey::new(1, 2)), Some(5));
    assert_eq!(ledger.substrate().cpu_residual(1), 10, "intermediate hop must not pay cpu");
}
