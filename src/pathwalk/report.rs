//! Explanations for missing paths

use crate::error::{NoPathReason, PathError};
use crate::topology::{PathStore, Topology};

impl Topology {
    /// Build the error for a query that has no valid path.
    ///
    /// Different partitions are the root cause if they differ. Otherwise
    /// the restrictions that blocked the search are listed, the most
    /// specific ones first.
    pub(crate) fn no_path_error(&self, from: PathStore, to: PathStore, context: String) -> PathError {
        PathError::NoValidPath {
            from: self.store_name(from).to_string(),
            to: self.store_name(to).to_string(),
            context,
            reason: self.no_path_reason(from, to),
        }
    }

    fn no_path_reason(&self, from: PathStore, to: PathStore) -> NoPathReason {
        let src = self.partition_name(self.store_node(from)).unwrap_or_default();
        let dst = self.partition_name(self.store_node(to)).unwrap_or_default();
        if src != dst {
            return NoPathReason::DifferentPartitions {
                src: src.to_string(),
                dst: dst.to_string(),
            };
        }

        let Some(stats) = self.blocking_restrictions(from, to) else {
            return NoPathReason::Unknown;
        };
        if stats.is_empty() {
            return NoPathReason::Unknown;
        }
        let mut restrictions: Vec<(String, usize)> = stats
            .iter()
            .map(|(id, count)| (self.restriction_name(id).to_string(), count))
            .collect();
        restrictions.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        NoPathReason::Blocked { restrictions }
    }
}
