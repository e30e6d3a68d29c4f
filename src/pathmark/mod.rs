//! Path marking
//!
//! Marks the path between a source and a destination store by writing
//! next-hop entries into the memo tables of the objects along the way.
//! Outside of loops a path is a single chain of interfaces; a loop cluster
//! is crossed by a [`LoopPath`](crate::topology::LoopPath) that holds all
//! valid routes through it.
//!
//! The entry point is [`Topology::mark_path`](crate::topology::Topology::mark_path).

mod cluster;
mod fixup;
mod mark;
mod navigation;

use std::collections::BTreeMap;

use crate::topology::RestrictId;

/// Number of path attempts blocked per restriction during one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingStats {
    counts: BTreeMap<RestrictId, usize>,
}

impl BlockingStats {
    pub(crate) fn record(&mut self, id: RestrictId) {
        *self.counts.entry(id).or_default() += 1;
    }

    /// True if no restriction blocked any attempt
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Attempts blocked by `id`
    #[must_use]
    pub fn count(&self, id: RestrictId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Blocking restrictions with their counts, in id order
    pub fn iter(&self) -> impl Iterator<Item = (RestrictId, usize)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }
}
