//! Path walking on chains and single cycles
//!
//! # Test Categories
//!
//! 1. **Chain Tests**: Paths without any loop
//! 2. **Cycle Tests**: Both routes through a single cycle
//! 3. **Symmetry Tests**: Paths in both directions use the same objects
//! 4. **Memoization Tests**: Repeated queries give identical results

use std::collections::BTreeSet;

use netpath::pathwalk::CallAt;
use netpath::topology::Node;

use super::{hop, load_prepared, store, walk, Hop};

// ============================================================================
// Chain Tests
// ============================================================================

#[test]
fn test_chain_router_walk() {
    let (mut topo, diag) = load_prepared("chain");
    assert!(diag.is_empty());

    assert_eq!(
        walk(&mut topo, "z1", "z3", CallAt::Router),
        vec![
            hop(Some("r1.z1"), Some("r1.z2")),
            hop(Some("r2.z2"), Some("r2.z3"))
        ]
    );
}

#[test]
fn test_chain_zone_walk() {
    let (mut topo, _) = load_prepared("chain");

    assert_eq!(
        walk(&mut topo, "z1", "z3", CallAt::Zone),
        vec![
            hop(None, Some("r1.z1")),
            hop(Some("r1.z2"), Some("r2.z2")),
            hop(Some("r2.z3"), None)
        ]
    );
}

#[test]
fn test_chain_reverse_walk() {
    let (mut topo, _) = load_prepared("chain");

    assert_eq!(
        walk(&mut topo, "z3", "z1", CallAt::Router),
        vec![
            hop(Some("r2.z3"), Some("r2.z2")),
            hop(Some("r1.z2"), Some("r1.z1"))
        ]
    );
}

#[test]
fn test_chain_walk_from_router() {
    let (mut topo, _) = load_prepared("chain");

    assert_eq!(
        walk(&mut topo, "r1", "z3", CallAt::Router),
        vec![
            hop(None, Some("r1.z2")),
            hop(Some("r2.z2"), Some("r2.z3"))
        ]
    );
    assert_eq!(
        walk(&mut topo, "r1", "r2", CallAt::Router),
        vec![hop(None, Some("r1.z2")), hop(Some("r2.z2"), None)]
    );
}

#[test]
fn test_walk_to_itself() {
    let (mut topo, _) = load_prepared("chain");

    assert!(walk(&mut topo, "z2", "z2", CallAt::Router).is_empty());
    assert_eq!(walk(&mut topo, "z2", "z2", CallAt::Zone), vec![hop(None, None)]);
}

#[test]
fn test_chain_distances() {
    let (topo, _) = load_prepared("chain");
    let z1 = Node::Zone(topo.find_zone("z1").unwrap());
    let z3 = Node::Zone(topo.find_zone("z3").unwrap());
    let r2 = Node::Router(topo.find_router("r2").unwrap());

    assert_eq!(topo.distance(z1), 0);
    assert_eq!(topo.distance(r2), 6);
    assert_eq!(topo.distance(z3), 8);
    assert_eq!(topo.to_root(z1), None);
    assert_eq!(topo.to_root(z3), topo.find_interface("r2.z3"));
    assert_eq!(topo.loop_of(r2), None);
}

// ============================================================================
// Cycle Tests
// ============================================================================

#[test]
fn test_cycle_both_routes() {
    let (mut topo, _) = load_prepared("cycle");

    assert_eq!(
        walk(&mut topo, "z1", "z2", CallAt::Router),
        vec![
            hop(Some("r1.z1"), Some("r1.z2")),
            hop(Some("r2.z1"), Some("r2.z2"))
        ]
    );
}

#[test]
fn test_cycle_from_router() {
    let (mut topo, _) = load_prepared("cycle");

    assert_eq!(
        walk(&mut topo, "r1", "z2", CallAt::Router),
        vec![
            hop(None, Some("r1.z1")),
            hop(None, Some("r1.z2")),
            hop(Some("r2.z1"), Some("r2.z2"))
        ]
    );
}

#[test]
fn test_cycle_router_interfaces() {
    let (mut topo, _) = load_prepared("cycle");
    let r1 = topo.find_router("r1").unwrap();
    let z2 = store(&topo, "z2");

    let intfs = topo.path_router_interfaces(r1, z2).unwrap();
    let names: Vec<&str> = intfs.iter().map(|&i| topo.intf_name(i)).collect();
    assert_eq!(names, vec!["r1.z1", "r1.z2"]);
}

// ============================================================================
// Symmetry Tests
// ============================================================================

fn reversed(hops: &[Hop]) -> BTreeSet<Hop> {
    hops.iter().map(|(i, o)| (o.clone(), i.clone())).collect()
}

#[test]
fn test_cycle_symmetry() {
    let (mut topo, _) = load_prepared("cycle");

    let forward = walk(&mut topo, "z1", "z2", CallAt::Router);
    let backward = walk(&mut topo, "z2", "z1", CallAt::Router);
    assert_eq!(reversed(&forward), backward.into_iter().collect());
}

#[test]
fn test_symmetry_without_cached_reverse() {
    let (mut topo, _) = load_prepared("cycle");
    let forward = walk(&mut topo, "z1", "z2", CallAt::Router);

    let (mut fresh, _) = load_prepared("cycle");
    let backward = walk(&mut fresh, "z2", "z1", CallAt::Router);
    assert_eq!(reversed(&forward), backward.into_iter().collect());
}

// ============================================================================
// Memoization Tests
// ============================================================================

#[test]
fn test_repeated_walk_is_identical() {
    let (mut topo, _) = load_prepared("cycle");

    let first = walk(&mut topo, "z1", "z2", CallAt::Zone);
    let second = walk(&mut topo, "z1", "z2", CallAt::Zone);
    assert_eq!(first, second);

    let src = store(&topo, "z1");
    let dst = store(&topo, "z2");
    assert!(topo.is_marked(src, dst));
}

#[test]
fn test_independent_loads_are_identical() {
    let (mut first, _) = load_prepared("cycle");
    let (mut second, _) = load_prepared("cycle");

    for (src, dst) in [("z1", "z2"), ("r2", "z1"), ("r1", "r2")] {
        assert_eq!(
            walk(&mut first, src, dst, CallAt::Router),
            walk(&mut second, src, dst, CallAt::Router),
            "{src} -> {dst}"
        );
    }
}
