use rand::SeedableRng;
use rand::rngs::StdRng;

use vne_sim::config::{SubstrateConfig, VnrConfig};
use vne_sim::domain::clock::RequestProvider;
use vne_sim::generator::{VnrGenerator, generate_substrate, is_connected};

fn substrate_config() -> SubstrateConfig {
    SubstrateConfig { num_nodes: 15, edge_prob: 0.4, cpu_range: [50, 100], bandwidth_range: [20, 60] }
}

fn vnr_config() -> VnrConfig {
    VnrConfig { num_nodes: 5, edge_prob: 0.3, cpu_range: [1, 10], bandwidth_range: [1, 10], duration_range: [5, 10] }
}

#[test]
fn substrate_respects_configured_shape_and_ranges() {
    let mut rng = StdRng::seed_from_u64(3);
    let substrate = generate_substrate(&substrate_config(), &mut rng);

    assert_eq!(substrate.num_nodes(), 15);

    for node in substrate.node_ids() {
        let capacity = substrate.cpu_capacity(node);
        assert!((50..=100).contains(&capacity));
        assert_eq!(substrate.cpu_residual(node), capacity, "fresh substrate starts at full residual");
    }

    for key in substrate.link_keys() {
        let capacity = substrate.bandwidth_capacity(key).unwrap();
        assert!((20..=60).contains(&capacity));
        assert_eq!(substrate.bandwidth_residual(key), Some(capacity));
    }
}

#[test]
fn substrate_generation_is_seed_deterministic() {
    let build = || {
        let mut rng = StdRng::seed_from_u64(77);
        generate_substrate(&substrate_config(), &mut rng)
    };

    let a = build();
    let b = build();

    assert_eq!(a.num_nodes(), b.num_nodes());
    assert_eq!(a.link_keys().collect::<Vec<_>>(), b.link_keys().collect::<Vec<_>>());

    for node in a.node_ids() {
        assert_eq!(a.cpu_capacity(node), b.cpu_capacity(node));
    }
    for key in a.link_keys() {
        assert_eq!(a.bandwidth_capacity(key), b.bandwidth_capacity(key));
    }
}

#[test]
fn generated_requests_are_connected_with_demands_in_range() {
    let mut generator = VnrGenerator::new(vnr_config(), StdRng::seed_from_u64(5));

    for expected_id in 0..50 {
        let request = generator.next_request(expected_id as f64);

        assert_eq!(request.id, expected_id);
        assert_eq!(request.num_nodes(), 5);
        assert!((5..=10).contains(&request.duration));

        for &cpu in &request.cpu_demands {
            assert!((1..=10).contains(&cpu));
        }

        let edges: Vec<(usize, usize)> = request.edges.iter().map(|edge| (edge.u, edge.v)).collect();
        assert!(is_connected(request.num_nodes(), &edges), "provider must only hand out connected topologies");

        for edge in &request.edges {
            assert!((1..=10).contains(&edge.bandwidth));
            assert!(edge.u < edge.v, "virtual edges are stored normalized");
        }
    }
}

#[test]
fn request_generation_is_seed_deterministic() {
    let draw = |seed: u64| {
        let mut generator = VnrGenerator::new(vnr_config(), StdRng::seed_from_u64(seed));
        let request = generator.next_request(0.0);
        (request.cpu_demands.clone(), request.edges.clone(), request.duration)
    };

    assert_eq!(draw(13), draw(13));
}
