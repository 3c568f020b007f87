//! Incremental parsing support
//!
//! An edited tree marks every node the edit could have influenced as
//! damaged. While deriving, the parser asks a [`ReuseCursor`] for an
//! undamaged node of the rule it is about to run, starting at the current
//! token; a hit is spliced into the new tree by reference.
//!
//! # Key Types
//!
//! - [`ReuseCursor`] - finds reusable nodes in an edited tree
//! - [`CursorStats`] - how lookups went, for debugging and tuning
//! - [`IncrementalStats`] - what the last parse reused and rebuilt

mod cursor;

use std::sync::Arc;

use arbor_tree::{Child, Node};
use rustc_hash::FxHashSet;

pub use cursor::{CursorStats, ReuseCursor};

/// Statistics for incremental parsing.
///
/// Both counts describe the finished tree: a reused subtree counts once
/// however large it is, and every other node counts as reparsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    /// Number of subtrees taken over from the previous tree.
    pub reused_count: usize,
    /// Number of nodes built by the parse.
    pub reparsed_count: usize,
}

impl IncrementalStats {
    /// Calculate reuse rate as a percentage.
    #[allow(
        clippy::cast_precision_loss,
        reason = "counts won't approach 2^52; precision loss irrelevant for display"
    )]
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused_count + self.reparsed_count;
        if total == 0 {
            0.0
        } else {
            (self.reused_count as f64 / total as f64) * 100.0
        }
    }

    /// Classify the nodes of a freshly built tree.
    ///
    /// `reused` holds the addresses of the subtrees spliced in from the
    /// previous tree; the walk does not descend into them.
    pub(crate) fn of_tree(root: &Arc<Node>, reused: &FxHashSet<*const Node>) -> Self {
        let mut stats = IncrementalStats::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if reused.contains(&Arc::as_ptr(node)) {
                stats.reused_count += 1;
                continue;
            }
            stats.reparsed_count += 1;
            stack.extend(node.children().iter().map(Child::node));
        }
        stats
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
