//! Routes through loop clusters
//!
//! Inside a cluster all valid routes between two objects are collected by
//! a depth-first search. A route is valid if it visits no node twice and
//! crosses no path restriction twice. The result is stored as a
//! [`LoopPath`] at the start object.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::trace;

use super::BlockingStats;
use crate::error::TopologyError;
use crate::topology::{
    IntfId, LoopId, LoopPath, Navigation, Node, PathStore, RestrictId, Topology,
};

/// Where a route through a cluster begins or ends
struct LoopEndpoint {
    node: Node,
    /// Restricted interface inside of the loop
    loop_intf: Option<IntfId>,
    /// Restricted interface at the border of the loop
    border_intf: Option<IntfId>,
}

fn dedup<T: Eq + Hash + Copy>(list: &mut Vec<T>) {
    let mut seen = HashSet::with_capacity(list.len());
    list.retain(|&item| seen.insert(item));
}

/// Record that a route passes `obj` from `in_intf` to `out_intf`.
fn push_tuple(lpath: &mut LoopPath, obj: Node, in_intf: IntfId, out_intf: IntfId) {
    if obj.is_router() {
        lpath.router_tuples.push((in_intf, out_intf));
    } else {
        lpath.zone_tuples.push((in_intf, out_intf));
    }
}

/// A node on the current search path
struct SearchFrame<'n> {
    obj: Node,
    in_intf: IntfId,
    /// Restrictions activated when entering `obj`
    restricts: Vec<RestrictId>,
    /// Loops that may be entered from `obj`
    allowed: &'n HashSet<LoopId>,
    /// Position of the next interface of `obj` to try
    index: usize,
    success: bool,
}

/// Outcome of stepping onto a node
enum Step<'n> {
    Done(bool),
    Enter(SearchFrame<'n>),
}

impl Topology {
    /// Depth-first search from `obj`, entered by `in_intf`, towards `end`.
    ///
    /// Collects the traversed tuples in `lpath`. Returns true if at least
    /// one valid route to `end` was found. The search path is kept on an
    /// explicit stack; active flags are cleared when a frame is popped.
    fn cluster_path_mark1(
        &mut self,
        obj: Node,
        in_intf: IntfId,
        end: Node,
        lpath: &mut LoopPath,
        navi: &Navigation,
        blocking: &mut BlockingStats,
    ) -> bool {
        let mut stack = match self.cluster_step(obj, in_intf, end, lpath, navi, blocking) {
            Step::Done(found) => return found,
            Step::Enter(frame) => vec![frame],
        };

        let mut success = false;
        while let Some(frame) = stack.last_mut() {
            if let Some(intf) = self.next_cluster_intf(frame) {
                let next = self.next_node(frame.obj, intf);
                match self.cluster_step(next, intf, end, lpath, navi, blocking) {
                    Step::Done(true) => {
                        frame.success = true;
                        push_tuple(lpath, frame.obj, frame.in_intf, intf);
                    }
                    Step::Done(false) => {}
                    Step::Enter(child) => stack.push(child),
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            for &id in &done.restricts {
                self.restrict_mut(id).active = false;
            }
            self.node_mut(done.obj).active = false;
            match stack.last_mut() {
                Some(parent) if done.success => {
                    parent.success = true;
                    push_tuple(lpath, parent.obj, parent.in_intf, done.in_intf);
                }
                Some(_) => {}
                None => success = done.success,
            }
        }
        success
    }

    /// Step onto `obj` by `in_intf`.
    ///
    /// Either the outcome is known at once, or `obj` is activated together
    /// with the restrictions of `in_intf` and must be searched further.
    fn cluster_step<'n>(
        &mut self,
        obj: Node,
        in_intf: IntfId,
        end: Node,
        lpath: &mut LoopPath,
        navi: &'n Navigation,
        blocking: &mut BlockingStats,
    ) -> Step<'n> {
        let restricts = &self.intf(in_intf).path_restrict;
        if let Some(&active) = restricts.iter().find(|&&r| self.restrict(r).active) {
            trace!(
                "Restriction {} blocks {}",
                self.restriction_name(active),
                self.intf_name(in_intf)
            );
            blocking.record(active);
            return Step::Done(false);
        }
        if self.node(obj).active {
            return Step::Done(false);
        }
        if obj == end {
            lpath.leave.push(in_intf);
            return Step::Done(true);
        }
        let Some(allowed) = self.node(obj).loop_.and_then(|l| navi.get(&l)) else {
            return Step::Done(false);
        };

        let restricts = restricts.clone();
        for &id in &restricts {
            self.restrict_mut(id).active = true;
        }
        self.node_mut(obj).active = true;
        Step::Enter(SearchFrame {
            obj,
            in_intf,
            restricts,
            allowed,
            index: 0,
            success: false,
        })
    }

    /// Next interface of the frame's node that leads into an allowed loop
    fn next_cluster_intf(&self, frame: &mut SearchFrame<'_>) -> Option<IntfId> {
        let interfaces = &self.node(frame.obj).interfaces;
        while let Some(&intf) = interfaces.get(frame.index) {
            frame.index += 1;
            if intf == frame.in_intf {
                continue;
            }
            if matches!(self.intf(intf).loop_, Some(lp) if frame.allowed.contains(&lp)) {
                return Some(intf);
            }
        }
        None
    }

    fn loop_endpoint(&self, store: PathStore) -> LoopEndpoint {
        match store {
            PathStore::Intf(i) => {
                let intf = self.intf(i);
                if intf.loop_.is_some() {
                    LoopEndpoint {
                        node: Node::Router(intf.router),
                        loop_intf: Some(i),
                        border_intf: None,
                    }
                } else {
                    let node = if self.zone(intf.zone).node.loop_.is_some() {
                        Node::Zone(intf.zone)
                    } else {
                        Node::Router(intf.router)
                    };
                    LoopEndpoint {
                        node,
                        loop_intf: None,
                        border_intf: Some(i),
                    }
                }
            }
            PathStore::Zone(z) => LoopEndpoint {
                node: Node::Zone(z),
                loop_intf: None,
                border_intf: None,
            },
            PathStore::Router(r) => LoopEndpoint {
                node: Node::Router(r),
                loop_intf: None,
                border_intf: None,
            },
        }
    }

    /// Collect all routes through the cluster from `start_store` to
    /// `end_store` and store them at `start_store`.
    ///
    /// The reversed result is stored at `end_store` as well, unless a
    /// route in that direction is known already.
    pub(crate) fn cluster_path_mark(
        &mut self,
        start_store: PathStore,
        end_store: PathStore,
        blocking: &mut BlockingStats,
    ) -> Result<bool, TopologyError> {
        if self.memo(start_store).loop_path.contains_key(&end_store) {
            return Ok(true);
        }

        let start = self.loop_endpoint(start_store);
        let end = self.loop_endpoint(end_store);
        if start.loop_intf.is_some() || end.loop_intf.is_some() {
            return self.intf_cluster_path_mark(
                start_store,
                end_store,
                start.loop_intf,
                end.loop_intf,
                blocking,
            );
        }
        let (from, to) = (start.node, end.node);

        // A restriction at both borders makes every route invalid.
        let mut restricts = Vec::new();
        for intf in [start.border_intf, end.border_intf].into_iter().flatten() {
            for &r in &self.intf(intf).path_restrict {
                if self.restrict(r).active || restricts.contains(&r) {
                    return Ok(false);
                }
                restricts.push(r);
            }
        }
        let mut topo = self.activate_restrictions(restricts);

        if from == to {
            return Ok(false);
        }
        let navi = topo.cluster_navigation(from, to)?;
        let from_loop = topo.loop_in_cluster(from)?;
        let Some(allowed) = navi.get(&from_loop) else {
            return Err(TopologyError::MissingNavigation {
                from: topo.node_name(from).to_string(),
                to: topo.node_name(to).to_string(),
            });
        };

        let mut lpath = LoopPath::default();
        let mut success = false;
        {
            let mut topo = topo.activate(from);
            for index in 0..topo.node(from).interfaces.len() {
                let intf = topo.node(from).interfaces[index];
                match topo.intf(intf).loop_ {
                    Some(lp) if allowed.contains(&lp) => {}
                    _ => continue,
                }
                let next = topo.next_node(from, intf);
                if topo.cluster_path_mark1(next, intf, to, &mut lpath, &navi, blocking) {
                    success = true;
                    lpath.enter.push(intf);
                }
            }
        }
        if !success {
            return Ok(false);
        }

        dedup(&mut lpath.router_tuples);
        dedup(&mut lpath.zone_tuples);
        // Nested loops lead to duplicate exits.
        dedup(&mut lpath.leave);
        trace!(
            "Loop path {} -> {}: {} router tuples, {} zone tuples",
            topo.store_name(start_store),
            topo.store_name(end_store),
            lpath.router_tuples.len(),
            lpath.zone_tuples.len()
        );

        if !topo.memo(end_store).loop_path.contains_key(&start_store) {
            let reversed = lpath.reversed();
            topo.memo_mut(end_store)
                .loop_path
                .insert(start_store, reversed);
        }
        topo.memo_mut(start_store).loop_path.insert(end_store, lpath);
        Ok(true)
    }

    /// Route through a cluster that starts or ends at a restricted
    /// interface inside of a loop.
    ///
    /// The route is computed from the zone of the interface and then
    /// narrowed to the interface.
    fn intf_cluster_path_mark(
        &mut self,
        mut start_store: PathStore,
        mut end_store: PathStore,
        start_intf: Option<IntfId>,
        end_intf: Option<IntfId>,
        blocking: &mut BlockingStats,
    ) -> Result<bool, TopologyError> {
        if let Some(i) = start_intf {
            start_store = PathStore::Zone(self.intf(i).zone);
        }
        if let Some(i) = end_intf {
            end_store = PathStore::Zone(self.intf(i).zone);
        }
        let intf_at_zone = |topo: &Self, intf: PathStore, zone: PathStore| match (intf, zone) {
            (PathStore::Intf(i), PathStore::Zone(z)) => topo.intf(i).zone == z,
            _ => false,
        };

        let mut lpath = LoopPath::default();
        if start_store == end_store
            || intf_at_zone(self, end_store, start_store)
            || intf_at_zone(self, start_store, end_store)
        {
            // Both ends are attached to the same zone.
            match (start_intf, end_intf) {
                (Some(s), Some(e)) => {
                    lpath.enter.push(s);
                    lpath.leave.push(e);
                    lpath.zone_tuples.push((s, e));
                    start_store = PathStore::Intf(s);
                    end_store = PathStore::Intf(e);
                }
                (Some(s), None) => {
                    lpath.enter.push(s);
                    lpath.leave.push(s);
                    start_store = PathStore::Intf(s);
                }
                (None, Some(e)) => {
                    lpath.enter.push(e);
                    lpath.leave.push(e);
                    end_store = PathStore::Intf(e);
                }
                (None, None) => return Ok(false),
            }
        } else {
            if !self.cluster_path_mark(start_store, end_store, blocking)? {
                return Ok(false);
            }
            lpath = self
                .memo(start_store)
                .loop_path
                .get(&end_store)
                .cloned()
                .ok_or_else(|| {
                    TopologyError::incomplete(
                        self.store_name(start_store),
                        self.store_name(end_store),
                    )
                })?;
            self.fixup_zone_path(start_intf, end_intf, &mut lpath);
            if let Some(s) = start_intf {
                start_store = PathStore::Intf(s);
            }
            if let Some(e) = end_intf {
                end_store = PathStore::Intf(e);
            }
        }

        if lpath.enter.is_empty() {
            return Ok(false);
        }
        self.memo_mut(start_store).loop_path.insert(end_store, lpath);
        Ok(true)
    }

    /// Store where a route through a cluster begins or ends, and whether
    /// it is the zone of an interface at the border of the cluster.
    fn cluster_store(
        &self,
        store: PathStore,
        obj: Node,
        border: &mut Option<IntfId>,
    ) -> (PathStore, bool) {
        let store_intf = match store {
            PathStore::Intf(i) => Some(i),
            _ => None,
        };
        // No restriction applies where the store itself enters the loop.
        if store_intf.is_some() && *border == store_intf {
            *border = None;
        }
        match (store_intf, *border) {
            (Some(i), None) => {
                let intf = self.intf(i);
                if intf.loop_.is_none() && self.zone(intf.zone).node.loop_.is_some() {
                    (PathStore::Zone(intf.zone), true)
                } else {
                    (store, false)
                }
            }
            (_, Some(b)) if !self.intf(b).path_restrict.is_empty() => (PathStore::Intf(b), false),
            _ => (obj.into(), false),
        }
    }

    /// Mark the route through the cluster between `from` and `to` and link
    /// it into the path from `from_store` to `to_store`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn connect_cluster_path(
        &mut self,
        from: Node,
        to: Node,
        mut from_in: Option<IntfId>,
        mut to_out: Option<IntfId>,
        from_store: PathStore,
        to_store: PathStore,
        blocking: &mut BlockingStats,
    ) -> Result<bool, TopologyError> {
        let (start_store, start_at_zone) = self.cluster_store(from_store, from, &mut from_in);
        let (end_store, end_at_zone) = self.cluster_store(to_store, to, &mut to_out);

        if !self.cluster_path_mark(start_store, end_store, blocking)? {
            return Ok(false);
        }

        let store = from_in.map_or(from_store, PathStore::Intf);
        if end_at_zone {
            // Continue to the router of the interface outside of the loop.
            if let PathStore::Intf(i) = to_store {
                to_out = Some(i);
            }
        }
        if from_in.is_some() || start_at_zone {
            self.memo_mut(store).path.insert(to_store, to_out);
        } else {
            self.memo_mut(store).path1.insert(to_store, to_out);
        }
        match store {
            PathStore::Intf(i) if start_at_zone => {
                self.intf_mut(i).loop_entry_zone.insert(to_store, start_store);
            }
            _ => {
                self.memo_mut(store).loop_entry.insert(to_store, start_store);
            }
        }
        self.memo_mut(start_store).loop_exit.insert(to_store, end_store);
        Ok(true)
    }
}
