//! Foreground/background split over marked paths
//!
//! Paths are marked up front; afterwards both passes only read the
//! topology and must see the same routes.

use netpath::config::EngineConfig;
use netpath::diag::{run_split, Diagnostics, Severity};
use netpath::pathwalk::CallAt;
use netpath::topology::{IntfId, PathStore, Topology};

use super::{hop, hop_names, load_prepared, store, Hop};

fn config(concurrency: usize) -> EngineConfig {
    EngineConfig {
        concurrency,
        ..EngineConfig::default()
    }
}

/// Mark all pairs of the given objects in both directions.
fn mark_all(topo: &mut Topology, names: &[&str]) -> Vec<(PathStore, PathStore)> {
    let stores: Vec<PathStore> = names.iter().map(|n| store(topo, n)).collect();
    let mut pairs = Vec::new();
    for &src in &stores {
        for &dst in &stores {
            assert!(topo.mark_path(src, dst).unwrap());
            pairs.push((src, dst));
        }
    }
    pairs
}

fn walk_all(topo: &Topology, pairs: &[(PathStore, PathStore)]) -> Vec<Vec<Hop>> {
    pairs
        .iter()
        .map(|&(src, dst)| {
            let mut hops: Vec<(Option<IntfId>, Option<IntfId>)> = Vec::new();
            topo.walk_marked(src, dst, CallAt::Router, |i, o| hops.push((i, o)))
                .unwrap();
            hop_names(topo, &hops)
        })
        .collect()
}

#[test]
fn test_passes_see_same_routes() {
    let (mut topo, _) = load_prepared("cycle_restricted");
    let pairs = mark_all(&mut topo, &["z1", "z2", "r2"]);
    let expected = walk_all(&topo, &pairs);

    let mut diag = Diagnostics::buffered();
    let foreground = run_split(
        &topo,
        &config(2),
        &mut diag,
        |t, d| {
            d.info("foreground done");
            walk_all(t, &pairs)
        },
        |t, d| {
            for (routes, &(src, dst)) in walk_all(t, &pairs).iter().zip(&pairs) {
                d.info(format!(
                    "{} -> {}: {} hops",
                    t.store_name(src),
                    t.store_name(dst),
                    routes.len()
                ));
            }
        },
    );

    assert_eq!(foreground, expected);
    let infos: Vec<&str> = diag.with_severity(Severity::Info).collect();
    assert_eq!(infos.len(), 1 + pairs.len());
    assert_eq!(infos[0], "foreground done");
    assert!(infos.contains(&"z1 -> z2: 1 hops"));
}

#[test]
fn test_marked_route_seen_by_background() {
    let (mut topo, _) = load_prepared("chain");
    mark_all(&mut topo, &["z1", "z3"]);
    let (z1, z3) = (store(&topo, "z1"), store(&topo, "z3"));

    let mut diag = Diagnostics::buffered();
    run_split(
        &topo,
        &config(2),
        &mut diag,
        |_, _| {},
        |t, d| {
            let mut hops = Vec::new();
            t.walk_marked(z1, z3, CallAt::Router, |i, o| hops.push((i, o)))
                .unwrap();
            if hop_names(t, &hops)
                != vec![
                    hop(Some("r1.z1"), Some("r1.z2")),
                    hop(Some("r2.z2"), Some("r2.z3")),
                ]
            {
                d.error("unexpected route");
            }
        },
    );
    assert!(diag.is_empty());
}

#[test]
fn test_unmarked_route_reported_by_background() {
    let (mut topo, _) = load_prepared("chain");
    mark_all(&mut topo, &["z1", "z2"]);
    let (z1, z3) = (store(&topo, "z1"), store(&topo, "z3"));

    let mut diag = Diagnostics::buffered();
    run_split(
        &topo,
        &config(2),
        &mut diag,
        |_, d| d.warn("foreground"),
        |t, d| {
            if let Err(err) = t.walk_marked(z1, z3, CallAt::Router, |_, _| {}) {
                d.error(err.to_string());
            }
        },
    );
    let texts: Vec<&str> = diag.messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(
        texts,
        vec!["foreground", "path from z1 to z3 has not been marked"]
    );
}

#[test]
fn test_inline_split_runs_background_first() {
    let (mut topo, _) = load_prepared("cycle");
    mark_all(&mut topo, &["z1", "z2"]);

    let mut diag = Diagnostics::buffered();
    run_split(
        &topo,
        &config(1),
        &mut diag,
        |_, d| d.info("foreground"),
        |_, d| d.info("background"),
    );
    let texts: Vec<&str> = diag.messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["background", "foreground"]);
}
