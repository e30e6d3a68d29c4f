//! Path restrictions
//!
//! # Test Categories
//!
//! 1. **Restricted Walks**: Routes crossing a restriction twice are skipped
//! 2. **Restricted Endpoints**: Queries starting at a restricted interface
//! 3. **Consistency Checks**: Misplaced restrictions are narrowed

use netpath::config::{load_topology_str, EngineConfig};
use netpath::diag::{Diagnostics, Severity};
use netpath::error::{NoPathReason, PathError};
use netpath::pathwalk::CallAt;

use super::{hop, load_prepared, store, walk};

const BLOCKED_CYCLE: &str = r#"{
  "zones": [ { "name": "z1" }, { "name": "z2" } ],
  "routers": [ { "name": "r1" }, { "name": "r2" } ],
  "interfaces": [
    { "name": "r1.z1", "router": "r1", "zone": "z1" },
    { "name": "r2.z1", "router": "r2", "zone": "z1" },
    { "name": "r2.z2", "router": "r2", "zone": "z2" },
    { "name": "r1.z2", "router": "r1", "zone": "z2" }
  ],
  "pathrestrictions": [
    { "name": "pathrestriction:p1", "interfaces": [ "r1.z1", "r1.z2" ] },
    { "name": "pathrestriction:p2", "interfaces": [ "r2.z1", "r2.z2" ] }
  ]
}"#;

// ============================================================================
// Restricted Walks
// ============================================================================

#[test]
fn test_restricted_router_is_avoided() {
    let (mut topo, diag) = load_prepared("cycle_restricted");
    assert!(diag.is_empty());

    assert_eq!(
        walk(&mut topo, "z1", "z2", CallAt::Router),
        vec![hop(Some("r2.z1"), Some("r2.z2"))]
    );
    // The reverse direction is restricted in the same way.
    assert_eq!(
        walk(&mut topo, "z2", "z1", CallAt::Router),
        vec![hop(Some("r2.z2"), Some("r2.z1"))]
    );
}

#[test]
fn test_fully_blocked_cycle() {
    let mut topo = load_topology_str(BLOCKED_CYCLE).unwrap();
    let mut diag = Diagnostics::buffered();
    topo.prepare_traversal(&EngineConfig::default(), &mut diag)
        .unwrap();
    assert!(diag.is_empty());

    let (z1, z2) = (store(&topo, "z1"), store(&topo, "z2"));
    let err = topo
        .single_path_walk(z1, z2, CallAt::Router, |_, _| {})
        .unwrap_err();
    assert!(err.is_recoverable());
    match &err {
        PathError::NoValidPath { from, to, reason, .. } => {
            assert_eq!(from, "z1");
            assert_eq!(to, "z2");
            assert_eq!(
                reason,
                &NoPathReason::Blocked {
                    restrictions: vec![
                        ("pathrestriction:p1".into(), 1),
                        ("pathrestriction:p2".into(), 1)
                    ]
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Possible blocking pathrestrictions"));

    // The failure is remembered, the statistics stay available.
    assert!(!topo.mark_path(z1, z2).unwrap());
    assert!(topo.blocking_restrictions(z1, z2).is_some());
}

// ============================================================================
// Restricted Endpoints
// ============================================================================

#[test]
fn test_walk_from_restricted_interface() {
    let (mut topo, _) = load_prepared("cycle_restricted");

    assert_eq!(
        walk(&mut topo, "r1.z1", "z2", CallAt::Router),
        vec![hop(None, Some("r1.z1")), hop(Some("r2.z1"), Some("r2.z2"))]
    );
}

#[test]
fn test_walk_from_restricted_interface_into_its_zone() {
    let (mut topo, _) = load_prepared("cycle_restricted");

    assert_eq!(
        walk(&mut topo, "r1.z2", "z2", CallAt::Router),
        vec![hop(None, Some("r1.z2"))]
    );
}

#[test]
fn test_router_interfaces_of_restricted_router() {
    let (mut topo, _) = load_prepared("cycle_restricted");
    let r1 = topo.find_router("r1").unwrap();
    let z2 = store(&topo, "z2");

    let intfs = topo.path_router_interfaces(r1, z2).unwrap();
    let names: Vec<&str> = intfs.iter().map(|&i| topo.intf_name(i)).collect();
    assert_eq!(names, vec!["r1.z1", "r1.z2"]);
}

// ============================================================================
// Consistency Checks
// ============================================================================

#[test]
fn test_misplaced_restriction_on_chain() {
    let json = r#"{
      "zones": [ { "name": "z1" }, { "name": "z2" } ],
      "routers": [ { "name": "r1" } ],
      "interfaces": [
        { "name": "r1.z1", "router": "r1", "zone": "z1" },
        { "name": "r1.z2", "router": "r1", "zone": "z2" }
      ],
      "pathrestrictions": [
        { "name": "pathrestriction:p", "interfaces": [ "r1.z1", "r1.z2" ] }
      ]
    }"#;
    let mut restricted = load_topology_str(json).unwrap();
    let config = EngineConfig {
        misplaced_restriction: Severity::Error,
        ..EngineConfig::default()
    };

    let mut diag = Diagnostics::buffered();
    restricted.prepare_traversal(&config, &mut diag).unwrap();
    assert_eq!(
        diag.with_severity(Severity::Error).collect::<Vec<_>>(),
        vec![
            "Ignoring pathrestriction:p at r1.z1\n because it isn't located inside cyclic graph",
            "Ignoring pathrestriction:p at r1.z2\n because it isn't located inside cyclic graph"
        ]
    );

    let intf = restricted.find_interface("r1.z1").unwrap();
    assert!(restricted.restrictions_of(intf).is_empty());

    // Without its restriction the chain is walked as usual.
    assert_eq!(
        walk(&mut restricted, "z1", "z2", CallAt::Router),
        vec![hop(Some("r1.z1"), Some("r1.z2"))]
    );
}
