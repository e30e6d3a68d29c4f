use super::{CallAt, PathQuery, PathRule};
use crate::error::{PathError, TopologyError};
use crate::topology::{IntfId, PathStore, Topology};

impl Topology {
    /// Walk the path of `rule`, marking it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns `PathError::NoValidPath` if source and destination are not
    /// connected by a valid path. Callers computing static routes may
    /// ignore it, since the same error shows up again for the rules.
    pub fn path_walk<R, F>(&mut self, rule: &R, at: CallAt, mut visit: F) -> Result<(), PathError>
    where
        R: PathRule + ?Sized,
        F: FnMut(&R, Option<IntfId>, Option<IntfId>),
    {
        let (from, to) = (rule.src_path(), rule.dst_path());
        if !self.mark_path(from, to)? {
            let context = rule.describe(self);
            return Err(self.no_path_error(from, to, context));
        }
        self.walk_marked(from, to, at, |i, o| visit(rule, i, o))
    }

    /// Walk the path between two stores, marking it first if necessary.
    ///
    /// # Errors
    ///
    /// See [`Topology::path_walk`].
    pub fn single_path_walk<F>(
        &mut self,
        src: PathStore,
        dst: PathStore,
        at: CallAt,
        mut visit: F,
    ) -> Result<(), PathError>
    where
        F: FnMut(Option<IntfId>, Option<IntfId>),
    {
        let query = PathQuery { src, dst };
        self.path_walk(&query, at, |_, i, o| visit(i, o))
    }

    /// Walk a path marked before.
    ///
    /// Needs only shared access, so several walks may run side by side once
    /// all paths have been marked.
    ///
    /// # Errors
    ///
    /// Returns `PathError::NotMarked` if the path has not been marked.
    pub fn walk_marked<F>(
        &self,
        from: PathStore,
        to: PathStore,
        at: CallAt,
        mut visit: F,
    ) -> Result<(), PathError>
    where
        F: FnMut(Option<IntfId>, Option<IntfId>),
    {
        if !self.is_marked(from, to) {
            return Err(PathError::NotMarked {
                from: self.store_name(from).to_string(),
                to: self.store_name(to).to_string(),
            });
        }
        let at_zone = at == CallAt::Zone;

        // A restricted interface is handled like its router.
        let is_router = !matches!(from, PathStore::Zone(_));
        let mut call_it = is_router != at_zone;

        let mut in_intf: Option<IntfId> = None;
        let mut out = self.memo(from).path1.get(&to).copied().flatten();

        // Path starts at a restricted interface at the border of a zone
        // inside a loop. Its restriction is not effective inside the loop.
        let mut entry = None;
        if let PathStore::Intf(x) = from {
            if let Some(&zone) = self.intf(x).loop_entry_zone.get(&to) {
                if call_it {
                    visit(None, Some(x));
                }
                in_intf = Some(x);
                out = self.next_hop(x, to)?;
                entry = Some(zone);
            }
        }
        let entry = entry.or_else(|| self.memo(from).loop_entry.get(&to).copied());

        if let Some(entry) = entry {
            let exit = self.loop_exit(entry, to)?;
            call_it = self.loop_path_walk(in_intf, out, entry, exit, at_zone, &mut visit)?;
            let Some(next) = out else {
                return Ok(());
            };
            in_intf = Some(next);
            out = self.next_hop(next, to)?;
            call_it = !call_it;
        }

        loop {
            let entry = in_intf.and_then(|i| self.memo(PathStore::Intf(i)).loop_entry.get(&to).copied());
            if let Some(entry) = entry {
                let exit = self.loop_exit(entry, to)?;
                call_it = self.loop_path_walk(in_intf, out, entry, exit, at_zone, &mut visit)?;
            } else if call_it {
                visit(in_intf, out);
            }

            let Some(next) = out else {
                return Ok(());
            };
            in_intf = Some(next);
            out = self.next_hop(next, to)?;
            call_it = !call_it;
        }
    }

    /// Interface following `intf` on the path to `to`.
    fn next_hop(&self, intf: IntfId, to: PathStore) -> Result<Option<IntfId>, TopologyError> {
        self.memo(PathStore::Intf(intf))
            .path
            .get(&to)
            .copied()
            .ok_or_else(|| TopologyError::incomplete(self.intf_name(intf), self.store_name(to)))
    }

    pub(crate) fn loop_exit(&self, entry: PathStore, to: PathStore) -> Result<PathStore, TopologyError> {
        self.memo(entry)
            .loop_exit
            .get(&to)
            .copied()
            .ok_or_else(|| TopologyError::incomplete(self.store_name(entry), self.store_name(to)))
    }

    /// Visit the part of a path inside a loop cluster.
    ///
    /// Returns true if the visitor was called at the last object inside
    /// the cluster.
    fn loop_path_walk<F>(
        &self,
        in_intf: Option<IntfId>,
        out: Option<IntfId>,
        entry: PathStore,
        exit: PathStore,
        at_zone: bool,
        visit: &mut F,
    ) -> Result<bool, TopologyError>
    where
        F: FnMut(Option<IntfId>, Option<IntfId>),
    {
        let lpath = self
            .memo(entry)
            .loop_path
            .get(&exit)
            .ok_or_else(|| TopologyError::incomplete(self.store_name(entry), self.store_name(exit)))?;

        // An interface store counts as router only if the loop path starts
        // at its router.
        let at_router = |store: PathStore, border: &[IntfId]| match store {
            PathStore::Router(_) => true,
            PathStore::Intf(x) => border
                .first()
                .is_some_and(|&b| self.intf(b).router == self.intf(x).router),
            PathStore::Zone(_) => false,
        };

        if at_router(entry, &lpath.enter) != at_zone {
            for &intf in &lpath.enter {
                visit(in_intf, Some(intf));
            }
        }

        let tuples = if at_zone {
            &lpath.zone_tuples
        } else {
            &lpath.router_tuples
        };
        for &(i, o) in tuples {
            visit(Some(i), Some(o));
        }

        let call_it = at_router(exit, &lpath.leave) != at_zone;
        if call_it {
            for &intf in &lpath.leave {
                visit(Some(intf), out);
            }
        }
        Ok(call_it)
    }
}
