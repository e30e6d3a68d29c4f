//! Loop clusters and loop-zone borders
//!
//! # Test Categories
//!
//! 1. **Cluster Tests**: Two cycles touching at one zone form one cluster
//! 2. **Figure Eight Walks**: All routes through nested loops
//! 3. **Loop Zone Border Tests**: Restricted interfaces at zones in a loop

use netpath::pathwalk::CallAt;
use netpath::topology::Node;

use super::{hop, load_prepared, walk};

// ============================================================================
// Cluster Tests
// ============================================================================

#[test]
fn test_figure_eight_is_one_cluster() {
    let (topo, diag) = load_prepared("figure_eight");
    assert!(diag.is_empty());

    let z1 = Node::Zone(topo.find_zone("z1").unwrap());
    for name in ["z2", "z3"] {
        let zone = Node::Zone(topo.find_zone(name).unwrap());
        assert_eq!(topo.cluster_exit_of(zone), Some(z1), "{name}");
    }
    for name in ["r1", "r2", "r3", "r4"] {
        let router = Node::Router(topo.find_router(name).unwrap());
        assert_eq!(topo.cluster_exit_of(router), Some(z1), "{name}");
        assert_eq!(topo.distance(router), topo.distance(z1), "{name}");
    }

    // The inner cycle keeps its own loop inside the cluster.
    let z2 = Node::Zone(topo.find_zone("z2").unwrap());
    let z3 = Node::Zone(topo.find_zone("z3").unwrap());
    assert_ne!(topo.loop_of(z2), topo.loop_of(z3));
}

// ============================================================================
// Figure Eight Walks
// ============================================================================

#[test]
fn test_figure_eight_router_walk() {
    let (mut topo, _) = load_prepared("figure_eight");

    assert_eq!(
        walk(&mut topo, "z1", "z3", CallAt::Router),
        vec![
            hop(Some("c1"), Some("c2")),
            hop(Some("d1"), Some("d2")),
            hop(Some("a1"), Some("a2")),
            hop(Some("b1"), Some("b2"))
        ]
    );
}

#[test]
fn test_figure_eight_zone_walk() {
    let (mut topo, _) = load_prepared("figure_eight");

    assert_eq!(
        walk(&mut topo, "z1", "z3", CallAt::Zone),
        vec![
            hop(None, Some("a1")),
            hop(None, Some("b1")),
            hop(Some("a2"), Some("c1")),
            hop(Some("a2"), Some("d1")),
            hop(Some("b2"), Some("c1")),
            hop(Some("b2"), Some("d1")),
            hop(Some("c2"), None),
            hop(Some("d2"), None)
        ]
    );
}

#[test]
fn test_figure_eight_inner_cycle_only() {
    let (mut topo, _) = load_prepared("figure_eight");

    // Routes from z2 to z3 never leave the inner cycle.
    assert_eq!(
        walk(&mut topo, "z2", "z3", CallAt::Router),
        vec![hop(Some("c1"), Some("c2")), hop(Some("d1"), Some("d2"))]
    );
}

// ============================================================================
// Loop Zone Border Tests
// ============================================================================

#[test]
fn test_border_flag() {
    let (topo, diag) = load_prepared("loop_zone_border");
    assert!(diag.is_empty());

    let p = topo.find_interface("r3.z2").unwrap();
    let inner = topo.find_interface("r1.z2").unwrap();
    assert!(topo.is_loop_zone_border(p));
    assert!(!topo.is_loop_zone_border(inner));
    assert_eq!(topo.restrictions_of(p).len(), 1);
}

#[test]
fn test_restriction_effective_when_entering_loop() {
    let (mut topo, _) = load_prepared("loop_zone_border");

    assert_eq!(
        walk(&mut topo, "z3", "z1", CallAt::Router),
        vec![
            hop(Some("r3.z3"), Some("r3.z2")),
            hop(Some("r2.z2"), Some("r2.z1"))
        ]
    );
}

#[test]
fn test_restriction_not_effective_at_start_interface() {
    let (mut topo, _) = load_prepared("loop_zone_border");

    assert_eq!(
        walk(&mut topo, "r3.z2", "z1", CallAt::Router),
        vec![
            hop(None, Some("r3.z2")),
            hop(Some("r2.z2"), Some("r2.z1")),
            hop(Some("r1.z2"), Some("r1.z1"))
        ]
    );
}

#[test]
fn test_border_queries_in_both_orders() {
    let (mut first, _) = load_prepared("loop_zone_border");
    let a1 = walk(&mut first, "z3", "z1", CallAt::Router);
    let b1 = walk(&mut first, "r3.z2", "z1", CallAt::Router);

    let (mut second, _) = load_prepared("loop_zone_border");
    let b2 = walk(&mut second, "r3.z2", "z1", CallAt::Router);
    let a2 = walk(&mut second, "z3", "z1", CallAt::Router);

    assert_eq!(a1, a2);
    assert_eq!(b1, b2);
}
