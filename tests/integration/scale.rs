//! Large topologies
//!
//! Long chains and rings are prepared, marked and walked on the default
//! test thread.

use netpath::config::EngineConfig;
use netpath::diag::Diagnostics;
use netpath::pathwalk::CallAt;
use netpath::topology::{Topology, TopologyBuilder, ZoneId};

/// z0 - r0 - z1 - r1 - ... - zn, or r(n-1) back to z0 if `ring`.
fn build(n: usize, ring: bool) -> (Topology, Vec<ZoneId>) {
    let mut b = TopologyBuilder::new();
    let count = if ring { n } else { n + 1 };
    let zones: Vec<ZoneId> = (0..count)
        .map(|i| b.add_zone(format!("z{i}")).unwrap())
        .collect();
    for i in 0..n {
        let r = b.add_router(format!("r{i}")).unwrap();
        b.add_interface(format!("r{i}.a"), r, zones[i]).unwrap();
        b.add_interface(format!("r{i}.b"), r, zones[(i + 1) % count])
            .unwrap();
    }
    let mut topo = b.build();
    let mut diag = Diagnostics::buffered();
    topo.prepare_traversal(&EngineConfig::default(), &mut diag)
        .unwrap();
    assert!(diag.is_empty());
    (topo, zones)
}

fn count_router_hops(topo: &mut Topology, src: ZoneId, dst: ZoneId) -> usize {
    let mut hops = 0;
    topo.single_path_walk(src.into(), dst.into(), CallAt::Router, |_, _| hops += 1)
        .unwrap();
    hops
}

#[test]
fn test_long_chain() {
    let (mut topo, zones) = build(10_000, false);
    let (first, last) = (zones[0], zones[10_000]);

    assert!(topo.mark_path(first, last).unwrap());
    assert_eq!(count_router_hops(&mut topo, first, last), 10_000);
    assert_eq!(count_router_hops(&mut topo, last, first), 10_000);
}

#[test]
fn test_long_ring() {
    let (mut topo, zones) = build(2_000, true);
    let (first, middle) = (zones[0], zones[1_000]);

    assert!(topo.mark_path(first, middle).unwrap());
    // Both halves of the ring are valid routes.
    assert_eq!(count_router_hops(&mut topo, first, middle), 2_000);
    assert_eq!(count_router_hops(&mut topo, middle, first), 2_000);
}
