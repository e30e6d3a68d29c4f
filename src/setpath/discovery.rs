//! Loop discovery
//!
//! Depth-first traversal from one root zone per partition. Every reached
//! node gets a distance (root 0, +2 per step) and either an interface
//! towards the root or a loop marker.

use std::collections::BTreeMap;

use tracing::debug;

use crate::diag::Diagnostics;
use crate::error::TopologyError;
use crate::topology::{IntfId, Loop, LoopId, Node, Topology, ZoneId};

/// A node on the current traversal path
struct SetpathFrame {
    obj: Node,
    /// Interface the node was entered by
    to_zone1: Option<IntfId>,
    distance: u32,
    /// Largest distance seen below the node
    max: u32,
    /// Position of the next interface of `obj` to try
    index: usize,
}

impl Topology {
    /// Assign distances and discover loops in all partitions.
    pub(crate) fn find_dists_and_loops(
        &mut self,
        diag: &mut Diagnostics,
    ) -> Result<(), TopologyError> {
        if self.zones.is_empty() {
            return Err(TopologyError::EmptyTopology);
        }

        let mut start_distance = 0;
        let mut partitions = Vec::new();
        for index in 0..self.zones.len() {
            let zone1 = ZoneId(index);
            if self.zone(zone1).node.zone1.is_some() {
                continue;
            }
            partitions.push(zone1);
            let max = self.setpath_obj(zone1, start_distance);
            start_distance = max + 1;
        }
        debug!(
            "Found {} partitions, {} loop markers",
            partitions.len(),
            self.loops.len()
        );

        let unconnected = self.partitions_not_joined_by_split_router(&partitions);
        self.check_partition_usage(&unconnected, diag);
        Ok(())
    }

    fn new_loop(&mut self, exit: Node, distance: u32) -> LoopId {
        let id = LoopId(self.loops.len());
        self.loops.push(Loop {
            exit,
            distance,
            cluster_exit: None,
            redirect: None,
        });
        id
    }

    /// Depth-first traversal of the partition of `zone1`.
    ///
    /// The current path is kept on an explicit stack of frames; a node is
    /// active while its frame is on the stack. Returns the largest
    /// distance seen.
    fn setpath_obj(&mut self, zone1: ZoneId, distance: u32) -> u32 {
        let root = Node::Zone(zone1);
        let mut stack = vec![self.enter_setpath(root, None, distance, zone1)];
        let mut max = distance;

        while let Some(frame) = stack.last_mut() {
            if let Some(intf) = self.next_setpath_intf(frame) {
                let obj = frame.obj;
                let next = self.next_node(obj, intf);

                // Reached an ancestor again: found a cycle.
                if self.node(next).active {
                    let new_distance = self.node(next).distance + 1;
                    let found = self.new_loop(next, new_distance);
                    self.intf_mut(intf).loop_ = Some(found);
                    frame.max = frame.max.max(new_distance);
                    self.absorb_loop(obj, intf, Some(found));
                } else {
                    let child = self.enter_setpath(next, Some(intf), frame.distance + 2, zone1);
                    stack.push(child);
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let found = self.leave_setpath(&done);
            match stack.last_mut() {
                Some(parent) => {
                    parent.max = parent.max.max(done.max);
                    if let Some(intf) = done.to_zone1 {
                        self.absorb_loop(parent.obj, intf, found);
                    }
                }
                None => max = done.max,
            }
        }
        max
    }

    /// Activate `obj`, entered by `to_zone1`, and record its distance.
    fn enter_setpath(
        &mut self,
        obj: Node,
        to_zone1: Option<IntfId>,
        distance: u32,
        zone1: ZoneId,
    ) -> SetpathFrame {
        let data = self.node_mut(obj);
        data.active = true;
        data.distance = distance;
        data.zone1 = Some(zone1);
        SetpathFrame {
            obj,
            to_zone1,
            distance,
            max: distance,
            index: 0,
        }
    }

    /// Next interface of the frame's node that is still a free edge
    fn next_setpath_intf(&self, frame: &mut SetpathFrame) -> Option<IntfId> {
        let interfaces = &self.node(frame.obj).interfaces;
        while let Some(&intf) = interfaces.get(frame.index) {
            frame.index += 1;
            if Some(intf) == frame.to_zone1 {
                continue;
            }
            let edge = self.intf(intf);
            if edge.loop_.is_none() && edge.main_intf.is_none() {
                return Some(intf);
            }
        }
        None
    }

    /// Take over the loop found behind `intf` of `obj`.
    fn absorb_loop(&mut self, obj: Node, intf: IntfId, found: Option<LoopId>) {
        let Some(found) = found else {
            self.intf_mut(intf).to_zone1 = Some(obj);
            return;
        };
        self.intf_mut(intf).loop_ = Some(found);

        if self.lp(found).exit == obj {
            // Exit node gets its own marker with the exit distance.
            if self.node(obj).loop_.is_none() {
                let distance = self.node(obj).distance;
                let marker = self.new_loop(obj, distance);
                self.node_mut(obj).loop_ = Some(marker);
            }
        } else if let Some(own) = self.node(obj).loop_ {
            // Node is part of two loops. Keep the one whose exit is
            // closer to the root.
            if own != found {
                if self.lp(found).distance < self.lp(own).distance {
                    self.lp_mut(own).redirect = Some(found);
                    self.node_mut(obj).loop_ = Some(found);
                } else {
                    self.lp_mut(found).redirect = Some(own);
                }
            }
        } else {
            self.node_mut(obj).loop_ = Some(found);
        }
    }

    /// Deactivate a finished node.
    ///
    /// Returns the loop the node is part of, unless it is the exit of
    /// that loop.
    fn leave_setpath(&mut self, frame: &SetpathFrame) -> Option<LoopId> {
        let obj = frame.obj;
        self.node_mut(obj).active = false;
        if let Some(own) = self.node(obj).loop_ {
            if self.lp(own).exit != obj {
                return Some(own);
            }
        }
        self.node_mut(obj).to_zone1 = frame.to_zone1;
        None
    }

    /// Partitions that are not linked to another partition by a split
    /// crypto router.
    fn partitions_not_joined_by_split_router(&self, partitions: &[ZoneId]) -> Vec<ZoneId> {
        partitions
            .iter()
            .copied()
            .filter(|&root| {
                !self.routers.iter().any(|router| {
                    router.node.zone1 == Some(root)
                        && router.orig_router.is_some_and(|orig| {
                            self.router(orig)
                                .node
                                .zone1
                                .is_some_and(|other| other != root)
                        })
                })
            })
            .collect()
    }

    /// Check partition tags against the partitions actually found.
    fn check_partition_usage(&mut self, unconnected: &[ZoneId], diag: &mut Diagnostics) {
        let mut tags: BTreeMap<ZoneId, Vec<String>> = BTreeMap::new();
        for zone in &self.zones {
            let (Some(tag), Some(root)) = (&zone.partition, zone.node.zone1) else {
                continue;
            };
            let list = tags.entry(root).or_default();
            if !list.contains(tag) {
                list.push(tag.clone());
            }
        }

        for (&root, list) in &tags {
            if list.len() > 1 {
                diag.error(format!(
                    "Several partition names in partition {}:\n - {}",
                    self.zone(root).name,
                    list.join("\n - ")
                ));
            }
            if let Some(tag) = list.last() {
                self.partition_names.insert(root, tag.clone());
            }
        }

        let (ipv6, ipv4): (Vec<ZoneId>, Vec<ZoneId>) = unconnected
            .iter()
            .copied()
            .partition(|&root| self.zone(root).ipv6);

        let versions = [("IPv6", &ipv6), ("IPv4", &ipv4)];
        for (_, roots) in versions {
            if let [root] = roots.as_slice() {
                if let Some(tag) = self.partition_names.get(root) {
                    diag.warn(format!(
                        "Spare partition name for single partition {}: {}.",
                        self.zone(*root).name,
                        tag
                    ));
                }
            }
        }
        for (version, roots) in versions {
            if roots.len() > 1 {
                let unnamed: Vec<&str> = roots
                    .iter()
                    .filter(|&&root| !tags.contains_key(&root))
                    .map(|&root| self.zone(root).name.as_str())
                    .collect();
                if !unnamed.is_empty() {
                    diag.error(format!(
                        "{version} topology has unconnected parts:\n - {}\n Use partition attribute, if intended.",
                        unnamed.join("\n - ")
                    ));
                }
            }
        }
    }
}
