//! Partition tags and queries across partitions
//!
//! # Test Categories
//!
//! 1. **Tagged Partitions**: Intended partitions load without complaint
//! 2. **Cross Partition Queries**: No path, with partitions as the reason
//! 3. **Partition Checks**: Untagged parts and spare tags

use netpath::config::{load_topology_str, EngineConfig};
use netpath::diag::{Diagnostics, Severity};
use netpath::error::{NoPathReason, PathError};
use netpath::pathwalk::CallAt;
use netpath::topology::Node;

use super::{hop, load_prepared, store, walk};

fn prepare_str(json: &str) -> Diagnostics {
    let mut topo = load_topology_str(json).unwrap();
    let mut diag = Diagnostics::buffered();
    topo.prepare_traversal(&EngineConfig::default(), &mut diag)
        .unwrap();
    diag
}

// ============================================================================
// Tagged Partitions
// ============================================================================

#[test]
fn test_tagged_partitions_are_accepted() {
    let (topo, diag) = load_prepared("partitions");
    assert!(diag.is_empty());

    let a2 = Node::Zone(topo.find_zone("a2").unwrap());
    let b1 = Node::Zone(topo.find_zone("b1").unwrap());
    assert_eq!(topo.partition_name(a2), Some("east"));
    assert_eq!(topo.partition_name(b1), Some("west"));
    assert_ne!(topo.partition_of(a2), topo.partition_of(b1));
}

#[test]
fn test_walk_inside_partition() {
    let (mut topo, _) = load_prepared("partitions");

    assert_eq!(
        walk(&mut topo, "a1", "a2", CallAt::Router),
        vec![hop(Some("ra.a1"), Some("ra.a2"))]
    );
    assert_eq!(
        walk(&mut topo, "b2", "b1", CallAt::Router),
        vec![hop(Some("rb.b2"), Some("rb.b1"))]
    );
}

// ============================================================================
// Cross Partition Queries
// ============================================================================

#[test]
fn test_no_path_between_partitions() {
    let (mut topo, _) = load_prepared("partitions");
    let (a1, b2) = (store(&topo, "a1"), store(&topo, "b2"));

    let mut visited = 0;
    let err = topo
        .single_path_walk(a1, b2, CallAt::Router, |_, _| visited += 1)
        .unwrap_err();
    assert_eq!(visited, 0);
    match &err {
        PathError::NoValidPath { reason, .. } => assert_eq!(
            reason,
            &NoPathReason::DifferentPartitions {
                src: "east".into(),
                dst: "west".into()
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err
        .to_string()
        .contains("different topology partitions: east, west."));

    // Nothing is left marked by the failed attempt.
    assert!(!topo.is_marked(a1, b2));
    assert!(!topo.mark_path(a1, b2).unwrap());
}

// ============================================================================
// Partition Checks
// ============================================================================

#[test]
fn test_untagged_parts_are_reported() {
    let diag = prepare_str(
        r#"{
          "zones": [ { "name": "z1" }, { "name": "z2" } ]
        }"#,
    );
    let errors: Vec<&str> = diag.with_severity(Severity::Error).collect();
    assert_eq!(
        errors,
        vec!["IPv4 topology has unconnected parts:\n - z1\n - z2\n Use partition attribute, if intended."]
    );
}

#[test]
fn test_spare_partition_name() {
    let diag = prepare_str(
        r#"{
          "zones": [ { "name": "z1", "partition": "lab" }, { "name": "z2" } ],
          "routers": [ { "name": "r1" } ],
          "interfaces": [
            { "name": "r1.z1", "router": "r1", "zone": "z1" },
            { "name": "r1.z2", "router": "r1", "zone": "z2" }
          ]
        }"#,
    );
    assert_eq!(diag.error_count(), 0);
    assert_eq!(
        diag.with_severity(Severity::Warning).collect::<Vec<_>>(),
        vec!["Spare partition name for single partition z1: lab."]
    );
}

#[test]
fn test_ipv6_parts_are_checked_separately() {
    // One IPv4 and one IPv6 part: each version is a single partition.
    let diag = prepare_str(
        r#"{
          "zones": [ { "name": "z1" }, { "name": "v6", "ipv6": true } ]
        }"#,
    );
    assert!(diag.is_empty());
}
