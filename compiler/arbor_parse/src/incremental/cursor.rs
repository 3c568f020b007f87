//! Cursor navigation for finding reusable nodes.

use std::sync::Arc;

use arbor_ir::SymbolId;
use arbor_tree::{EditedTree, Node};
use tracing::trace;

/// Statistics for cursor navigation (debugging/tuning).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorStats {
    /// Total number of `find()` calls.
    pub lookups: u32,
    /// Lookups that returned a node.
    pub hits: u32,
    /// Nodes stepped into on the way down.
    pub skipped: u32,
    /// Candidates with the right symbol and start that were damaged.
    pub intersected: u32,
}

/// Navigator for finding reusable nodes in an edited tree.
///
/// Positions are in the coordinates of the edited text. Every lookup
/// descends from the root, so lookups may come in any order; the parser
/// backtracks and asks about the same position more than once.
pub struct ReuseCursor<'old> {
    root: &'old Arc<Node>,
    stats: CursorStats,
}

impl<'old> ReuseCursor<'old> {
    pub fn new(shell: &'old EditedTree) -> Self {
        ReuseCursor {
            root: shell.root(),
            stats: CursorStats::default(),
        }
    }

    /// Find an undamaged node with `symbol` starting at `pos`.
    ///
    /// Walks down through the nodes covering `pos`. A damaged candidate does
    /// not end the search: a nested node with the same symbol and start may
    /// still be intact. The root itself is never returned.
    pub fn find(&mut self, symbol: SymbolId, pos: u32) -> Option<&'old Arc<Node>> {
        self.stats.lookups += 1;

        let mut node = self.root;
        let mut start = 0;
        loop {
            let rel = pos.checked_sub(start)?;
            let children = node.children();
            let index = children.partition_point(|child| child.end() <= rel);
            let child = children.get(index)?;
            if child.offset() > rel {
                // `pos` falls between two children
                return None;
            }

            let child_start = start + child.offset();
            if child_start == pos && child.node().symbol() == symbol {
                if !child.node().is_damaged() {
                    self.stats.hits += 1;
                    return Some(child.node());
                }
                trace!(?symbol, pos, "candidate is damaged");
                self.stats.intersected += 1;
            }
            self.stats.skipped += 1;
            node = child.node();
            start = child_start;
        }
    }

    /// Get cursor navigation statistics.
    pub fn stats(&self) -> &CursorStats {
        &self.stats
    }
}
