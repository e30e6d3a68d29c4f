//! Adjusting a loop path to start or end at an interface
//!
//! A route through a cluster that starts at a restricted interface is
//! first computed from the zone of that interface. Afterwards all tuples
//! crossing the router of the interface by some other way are removed,
//! together with the tuples that become dangling by that removal, and the
//! route is made to start at the interface itself.

use std::collections::HashSet;

use crate::topology::{IntfId, LoopPath, Topology};

const IN: usize = 0;
const OUT: usize = 1;

fn side(tuple: (IntfId, IntfId), side: usize) -> IntfId {
    if side == IN {
        tuple.0
    } else {
        tuple.1
    }
}

/// Tuples of a loop path with removal marks
struct Tuples {
    router: Vec<Option<(IntfId, IntfId)>>,
    zone: Vec<Option<(IntfId, IntfId)>>,
    del_in: HashSet<IntfId>,
    del_out: HashSet<IntfId>,
}

impl Tuples {
    fn list(&mut self, at_router: bool) -> &mut Vec<Option<(IntfId, IntfId)>> {
        if at_router {
            &mut self.router
        } else {
            &mut self.zone
        }
    }

    /// Remove a tuple and mark its interfaces, since adjacent tuples could
    /// become dangling now.
    fn mark_deleted(&mut self, at_router: bool, idx: usize) {
        if let Some((i, o)) = self.list(at_router)[idx].take() {
            self.del_in.insert(o);
            self.del_out.insert(i);
        }
    }
}

impl Topology {
    pub(crate) fn fixup_zone_path(
        &self,
        start: Option<IntfId>,
        end: Option<IntfId>,
        lpath: &mut LoopPath,
    ) {
        let mut tuples = Tuples {
            router: lpath.router_tuples.iter().copied().map(Some).collect(),
            zone: lpath.zone_tuples.iter().copied().map(Some).collect(),
            del_in: HashSet::new(),
            del_out: HashSet::new(),
        };

        // Remove tuples crossing the router where the path starts or ends,
        // and tuples crossing related redundancy interfaces.
        for (anchor, at) in [(start, IN), (end, OUT)] {
            let Some(anchor) = anchor else {
                continue;
            };
            let router = self.intf(anchor).router;
            for idx in 0..tuples.router.len() {
                let Some(tuple) = tuples.router[idx] else {
                    continue;
                };
                let intf = side(tuple, at);
                let crossing = if self.intf(intf).router == router {
                    intf != anchor
                } else {
                    self.intf(anchor).redundancy_intfs.contains(&intf)
                };
                if crossing {
                    tuples.mark_deleted(true, idx);
                }
            }
        }

        // Remove dangling tuples, alternating between routers and zones.
        let mut changed = false;
        let mut at_router = true;
        while !tuples.del_in.is_empty() || !tuples.del_out.is_empty() {
            changed = true;

            for &(i, o) in tuples.list(at_router).clone().iter().flatten() {
                tuples.del_in.remove(&o);
                tuples.del_out.remove(&i);
            }
            at_router = !at_router;
            let del_in = std::mem::take(&mut tuples.del_in);
            let del_out = std::mem::take(&mut tuples.del_out);
            for idx in 0..tuples.list(at_router).len() {
                if let Some((i, o)) = tuples.list(at_router)[idx] {
                    if del_in.contains(&i) || del_out.contains(&o) {
                        tuples.mark_deleted(at_router, idx);
                    }
                }
            }
        }

        if changed {
            lpath.router_tuples = tuples.router.into_iter().flatten().collect();
            lpath.zone_tuples = tuples.zone.into_iter().flatten().collect();

            // Drop interfaces at start and end that are no longer used.
            let all = lpath.router_tuples.iter().chain(&lpath.zone_tuples);
            let has_in: HashSet<IntfId> = all.clone().map(|t| t.0).collect();
            let has_out: HashSet<IntfId> = all.map(|t| t.1).collect();
            lpath.enter.retain(|i| has_in.contains(i));
            lpath.leave.retain(|i| has_out.contains(i));
        }

        // Let the path start or end at the router of the interface instead
        // of its zone.
        if let Some(start) = start {
            lpath.enter = change_side(lpath, start, IN);
        }
        if let Some(end) = end {
            lpath.leave = change_side(lpath, end, OUT);
        }
    }
}

fn change_side(lpath: &mut LoopPath, anchor: IntfId, at: usize) -> Vec<IntfId> {
    let border = if at == IN {
        std::mem::take(&mut lpath.enter)
    } else {
        std::mem::take(&mut lpath.leave)
    };
    let mut result = Vec::new();
    let mut seen = false;
    for intf in border {
        if intf == anchor {
            lpath.router_tuples.retain(|&tuple| {
                if side(tuple, at) == intf {
                    result.push(side(tuple, OUT - at));
                    false
                } else {
                    true
                }
            });
        } else {
            lpath.zone_tuples.push(if at == IN {
                (anchor, intf)
            } else {
                (intf, anchor)
            });
            if !seen {
                seen = true;
                result.push(anchor);
            }
        }
    }
    result
}
