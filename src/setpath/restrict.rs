//! Consistency checks of path restrictions and redundancy interfaces
//!
//! Run after loop reduction, since they depend on loop membership:
//!
//! - restriction members outside of any loop are dropped, a restriction
//!   spanning different loop clusters or left with a single member is
//!   dropped completely,
//! - redundancy interfaces must all sit in one loop,
//! - a restriction whose members are all covered by other restrictions is
//!   detached from its interfaces.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::config::EngineConfig;
use crate::diag::{Diagnostics, Severity};
use crate::topology::{IntfId, LoopId, Node, RestrictId, Topology};

impl Topology {
    /// Loop of an interface, its router or its zone.
    fn any_loop_of_intf(&self, intf: IntfId) -> Option<LoopId> {
        let data = self.intf(intf);
        data.loop_
            .or(self.router(data.router).node.loop_)
            .or(self.zone(data.zone).node.loop_)
    }

    pub(crate) fn check_pathrestrictions(&mut self, config: &EngineConfig, diag: &mut Diagnostics) {
        for index in 0..self.restrictions.len() {
            let id = RestrictId(index);
            if self.restrict(id).elements.is_empty() {
                continue;
            }
            let mut to_be_deleted =
                self.misplaced_restriction_elements(id, config.misplaced_restriction, diag);

            // A single remaining interface restricts nothing.
            if to_be_deleted.len() + 1 == self.restrict(id).elements.len() {
                to_be_deleted = self.restrict(id).elements.clone();
            }
            if !to_be_deleted.is_empty() {
                self.remove_from_restriction(id, &to_be_deleted);
            }

            for pos in 0..self.restrict(id).elements.len() {
                let intf = self.restrict(id).elements[pos];
                let zone = self.intf(intf).zone;
                if self.intf(intf).loop_.is_none() && self.zone(zone).node.loop_.is_some() {
                    self.intf_mut(intf).loop_zone_border = true;
                }
            }
        }
    }

    fn misplaced_restriction_elements(
        &self,
        id: RestrictId,
        severity: Severity,
        diag: &mut Diagnostics,
    ) -> Vec<IntfId> {
        let restrict = self.restrict(id);
        let mut misplaced = Vec::new();
        let mut prev: Option<(Option<Node>, IntfId)> = None;
        for &intf in &restrict.elements {
            let Some(lp) = self.any_loop_of_intf(intf) else {
                diag.report(
                    severity,
                    format!(
                        "Ignoring {} at {}\n because it isn't located inside cyclic graph",
                        restrict.name,
                        self.intf(intf).name
                    ),
                );
                misplaced.push(intf);
                continue;
            };

            // Interfaces must belong to same loop cluster.
            let cluster = self.lp(lp).cluster_exit;
            match prev {
                None => prev = Some((cluster, intf)),
                Some((prev_cluster, prev_intf)) if prev_cluster != cluster => {
                    diag.report(
                        severity,
                        format!(
                            "Ignoring {} having elements from different loops:\n - {}\n - {}",
                            restrict.name,
                            self.intf(prev_intf).name,
                            self.intf(intf).name
                        ),
                    );
                    return restrict.elements.clone();
                }
                Some(_) => {}
            }
        }
        misplaced
    }

    fn remove_from_restriction(&mut self, id: RestrictId, intfs: &[IntfId]) {
        self.restrict_mut(id)
            .elements
            .retain(|intf| !intfs.contains(intf));
        for &intf in intfs {
            self.intf_mut(intf).path_restrict.retain(|&r| r != id);
        }
    }

    pub(crate) fn check_virtual_interfaces(&mut self, diag: &mut Diagnostics) {
        let mut seen = HashSet::new();
        for index in 0..self.interfaces.len() {
            let group = &self.interfaces[index].redundancy_intfs;
            if group.len() <= 1 || seen.contains(&IntfId(index)) {
                continue;
            }
            let group = group.clone();
            seen.extend(group.iter().copied());

            let mut outside = false;
            for &intf in &group {
                if self.router(self.intf(intf).router).node.loop_.is_none() {
                    diag.error(format!(
                        "{} must be located inside cyclic sub-graph",
                        self.intf(intf).name
                    ));
                    outside = true;
                }
            }
            if outside {
                // Remove invalid restrictions to prevent follow-up errors.
                for &intf in &group {
                    self.intf_mut(intf).path_restrict.clear();
                }
                continue;
            }

            let reference = self.intf(group[0]).loop_;
            if group[1..].iter().any(|&intf| self.intf(intf).loop_ != reference) {
                let names: Vec<&str> = group.iter().map(|&i| self.intf_name(i)).collect();
                diag.error(format!(
                    "Virtual interfaces\n - {}\n must all be part of the same cyclic sub-graph",
                    names.join("\n - ")
                ));
            }
        }
    }

    /// Detach restrictions whose members are all contained in other
    /// restrictions.
    pub(crate) fn remove_redundant_pathrestrictions(
        &mut self,
        config: &EngineConfig,
        diag: &mut Diagnostics,
    ) {
        let effective: Vec<RestrictId> = (0..self.restrictions.len())
            .map(RestrictId)
            .filter(|&id| !self.restrict(id).elements.is_empty())
            .collect();

        let mut intf2restrictions: BTreeMap<IntfId, BTreeSet<RestrictId>> = BTreeMap::new();
        for &id in &effective {
            for &intf in &self.restrict(id).elements {
                intf2restrictions.entry(intf).or_default().insert(id);
            }
        }

        let mut removed = 0;
        for &id in &effective {
            let Some(superset) = self.containing_restrictions(id, &intf2restrictions) else {
                continue;
            };
            let elements = self.restrict(id).elements.clone();
            for intf in elements {
                self.intf_mut(intf).path_restrict.retain(|&r| r != id);
            }
            if config.show_diag {
                let mut names: Vec<&str> = superset
                    .iter()
                    .map(|&r| self.restriction_name(r))
                    .collect();
                names.sort_unstable();
                diag.info(format!(
                    "Removed {}; is subset of {}",
                    self.restriction_name(id),
                    names.join(", ")
                ));
            }
            self.restrict_mut(id).deleted = Some(superset);
            removed += 1;
        }
        debug!("Removed {} redundant pathrestrictions", removed);
    }

    fn containing_restrictions(
        &self,
        id: RestrictId,
        intf2restrictions: &BTreeMap<IntfId, BTreeSet<RestrictId>>,
    ) -> Option<Vec<RestrictId>> {
        let elements = &self.restrict(id).elements;
        let intf1 = *elements.first()?;

        // Restrictions of equal or bigger size sharing intf1
        let mut superset: Vec<RestrictId> = intf2restrictions
            .get(&intf1)?
            .iter()
            .copied()
            .filter(|&other| self.restrict(other).elements.len() >= elements.len())
            .collect();
        if superset.len() < 2 {
            return None;
        }

        for &intf in &elements[1..] {
            let with_intf = intf2restrictions.get(&intf)?;
            superset.retain(|&other| {
                other != id && self.restrict(other).deleted.is_none() && with_intf.contains(&other)
            });
            if superset.is_empty() {
                return None;
            }
        }
        Some(superset)
    }
}
