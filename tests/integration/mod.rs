//! Integration tests for netpath
//!
//! Scenarios are loaded from the JSON topology descriptions under
//! `tests/fixtures/` and exercised through the public API only.
//!
//! # Test Organization
//!
//! - `walks`: path walking on chains and single cycles
//! - `loops`: loop clusters and loop-zone borders
//! - `restrictions`: path restrictions and their consistency checks
//! - `partitions`: partition tags and queries across partitions
//! - `background`: foreground/background split over marked paths
//! - `scale`: long chains and rings

pub mod background;
pub mod loops;
pub mod partitions;
pub mod restrictions;
pub mod scale;
pub mod walks;

use std::path::PathBuf;

use netpath::config::{load_topology, EngineConfig};
use netpath::diag::Diagnostics;
use netpath::pathwalk::CallAt;
use netpath::topology::{IntfId, PathStore, Topology};

/// Names of the interfaces passed to a visitor
pub type Hop = (Option<String>, Option<String>);

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{name}.json"))
}

/// Load a fixture and prepare it with default settings
pub fn load_prepared(name: &str) -> (Topology, Diagnostics) {
    let mut topology = load_topology(fixture_path(name)).unwrap();
    let mut diag = Diagnostics::buffered();
    topology
        .prepare_traversal(&EngineConfig::default(), &mut diag)
        .unwrap();
    (topology, diag)
}

/// Path store of a named zone, router or interface
pub fn store(topology: &Topology, name: &str) -> PathStore {
    if let Some(zone) = topology.find_zone(name) {
        return zone.into();
    }
    if let Some(router) = topology.find_router(name) {
        return router.into();
    }
    let intf = topology
        .find_interface(name)
        .unwrap_or_else(|| panic!("unknown object {name}"));
    topology.path_node_of_interface(intf)
}

pub fn hop(i: Option<&str>, o: Option<&str>) -> Hop {
    (i.map(String::from), o.map(String::from))
}

pub fn hop_names(topology: &Topology, hops: &[(Option<IntfId>, Option<IntfId>)]) -> Vec<Hop> {
    let name = |intf: Option<IntfId>| intf.map(|i| topology.intf_name(i).to_string());
    hops.iter().map(|&(i, o)| (name(i), name(o))).collect()
}

/// Walk from `src` to `dst` and collect the visited hops by name
pub fn walk(topology: &mut Topology, src: &str, dst: &str, at: CallAt) -> Vec<Hop> {
    let (src, dst) = (store(topology, src), store(topology, dst));
    let mut hops = Vec::new();
    topology
        .single_path_walk(src, dst, at, |i, o| hops.push((i, o)))
        .unwrap();
    hop_names(topology, &hops)
}
