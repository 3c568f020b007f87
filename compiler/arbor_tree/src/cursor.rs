//! Zipper cursor over a syntax tree.
//!
//! A cursor is a current node plus the path of ancestors that leads to it,
//! kept on an explicit frame stack so that moving up is O(1) and no node
//! needs a parent pointer. Nodes are position independent, so each frame
//! also carries the absolute start of its parent.
//!
//! The cursor borrows the tree, which pins it for the cursor's lifetime.
//! Any number of cursors may walk the same tree; none of them can change it.
//! A cursor can also be rooted at any node of the tree, and the node under
//! it can be taken out as an owned `Arc` that outlives the cursor.

mod reducing;

use std::sync::Arc;

use arbor_grammar::Grammar;
use arbor_ir::{Span, SymbolId};
use smallvec::SmallVec;

use crate::node::Node;
use crate::tree::Tree;

pub use reducing::ReducingCursor;

/// Which nodes [`Cursor::next_matching`] stops at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeFilter {
    AnyNode,
    /// Named nodes, error nodes included.
    NamedNode,
    WithSymbol(SymbolId),
}

impl NodeFilter {
    pub fn matches(self, grammar: &dyn Grammar, symbol: SymbolId) -> bool {
        match self {
            NodeFilter::AnyNode => true,
            NodeFilter::NamedNode => grammar.is_named(symbol),
            NodeFilter::WithSymbol(wanted) => symbol == wanted,
        }
    }
}

/// One ancestor on the path to the current node.
#[derive(Clone, Copy, Debug)]
struct Frame<'t> {
    parent: &'t Arc<Node>,
    parent_start: u32,
    /// Index of the node below this frame among `parent`'s children.
    index: usize,
}

/// A movable position in a [`Tree`].
#[derive(Clone, Debug)]
pub struct Cursor<'t> {
    tree: &'t Tree,
    node: &'t Arc<Node>,
    start: u32,
    frames: SmallVec<[Frame<'t>; 16]>,
    /// Set once `next` has walked off the end of the tree.
    exhausted: bool,
}

impl<'t> Cursor<'t> {
    /// A cursor at the root of `tree`.
    pub fn new(tree: &'t Tree) -> Self {
        Cursor {
            tree,
            node: tree.root(),
            start: 0,
            frames: SmallVec::new(),
            exhausted: false,
        }
    }

    /// A cursor whose root is the current node.
    ///
    /// Ranges stay in tree coordinates. The new cursor cannot move above its
    /// root, and its pre-order walk ends after the last descendant.
    pub fn subtree_cursor(&self) -> Cursor<'t> {
        Cursor {
            tree: self.tree,
            node: self.node,
            start: self.start,
            frames: SmallVec::new(),
            exhausted: false,
        }
    }

    /// A [`ReducingCursor`] rooted at the current node.
    ///
    /// `init` stands in for the accumulator of the root's parent.
    pub fn reducing<A, F>(&self, init: A, reducer: F) -> ReducingCursor<'t, A, F>
    where
        F: Fn(&A, &Cursor<'t>) -> A,
    {
        ReducingCursor::new(self.subtree_cursor(), init, reducer)
    }

    /// Move to the first child.
    pub fn down(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let Some(child) = self.node.child(0) else {
            return false;
        };
        self.frames.push(Frame {
            parent: self.node,
            parent_start: self.start,
            index: 0,
        });
        self.start += child.offset();
        self.node = child.node();
        true
    }

    /// Move to the next sibling.
    pub fn right(&mut self) -> bool {
        self.sibling(1)
    }

    /// Move to the previous sibling.
    pub fn left(&mut self) -> bool {
        self.sibling(-1)
    }

    fn sibling(&mut self, step: isize) -> bool {
        if self.exhausted {
            return false;
        }
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        let Some(index) = frame.index.checked_add_signed(step) else {
            return false;
        };
        let parent = frame.parent;
        let Some(child) = parent.child(index) else {
            return false;
        };
        frame.index = index;
        self.start = frame.parent_start + child.offset();
        self.node = child.node();
        true
    }

    /// Move to the parent.
    pub fn up(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        self.node = frame.parent;
        self.start = frame.parent_start;
        true
    }

    /// Advance one step in pre-order: first child, else the next sibling of
    /// the nearest ancestor (self included) that has one.
    ///
    /// Returns `false` once the walk is finished. From then on every
    /// movement returns `false`.
    #[allow(
        clippy::should_implement_trait,
        reason = "a zipper step, not an iterator: it moves in place and yields nothing"
    )]
    pub fn next(&mut self) -> bool {
        if self.down() {
            return true;
        }
        loop {
            if self.right() {
                return true;
            }
            if !self.up() {
                self.exhausted = true;
                return false;
            }
        }
    }

    /// Step back in pre-order: the last descendant of the previous sibling,
    /// else the parent. Returns `false` at the root.
    pub fn prev(&mut self) -> bool {
        if self.left() {
            while self.node.child_count() > 0 {
                self.descend_last();
            }
            return true;
        }
        self.up()
    }

    fn descend_last(&mut self) {
        let index = self.node.child_count() - 1;
        let child = &self.node.children()[index];
        self.frames.push(Frame {
            parent: self.node,
            parent_start: self.start,
            index,
        });
        self.start += child.offset();
        self.node = child.node();
    }

    /// Advance in pre-order to the next node accepted by `filter`.
    pub fn next_matching(&mut self, filter: NodeFilter) -> bool {
        while self.next() {
            if filter.matches(self.tree.grammar().as_ref(), self.node.symbol()) {
                return true;
            }
        }
        false
    }

    /// Move to the first child that ends after `offset`.
    ///
    /// Returns that child's index, or `None` (without moving) if there is
    /// no such child.
    pub fn goto_first_child_for_byte(&mut self, offset: u32) -> Option<usize> {
        if self.exhausted {
            return None;
        }
        let index = self
            .node
            .children()
            .iter()
            .position(|child| self.start + child.end() > offset)?;
        let child = &self.node.children()[index];
        self.frames.push(Frame {
            parent: self.node,
            parent_start: self.start,
            index,
        });
        self.start += child.offset();
        self.node = child.node();
        Some(index)
    }

    /// Whether `next` has finished the walk.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    #[inline]
    pub fn node(&self) -> &'t Node {
        self.node
    }

    /// The current node as an owned handle.
    ///
    /// The handle keeps the subtree alive after the cursor and the tree are
    /// gone, and compares by identity with the tree's own node.
    #[inline]
    pub fn subtree(&self) -> Arc<Node> {
        Arc::clone(self.node)
    }

    #[inline]
    pub fn node_symbol(&self) -> SymbolId {
        self.node.symbol()
    }

    /// Absolute byte range of the current node.
    #[inline]
    pub fn node_range(&self) -> Span {
        Span::new(self.start, self.start + self.node.len())
    }

    /// Name of the current node's symbol.
    pub fn node_type(&self) -> &'t str {
        self.tree
            .grammar()
            .symbol_name(self.node.symbol())
            .unwrap_or_default()
    }

    pub fn is_named(&self) -> bool {
        self.tree.grammar().is_named(self.node.symbol())
    }

    pub fn is_error(&self) -> bool {
        self.node.symbol().is_error()
    }

    /// Source bytes of the current node.
    pub fn text(&self) -> &'t [u8] {
        self.tree.text(self.node_range()).unwrap_or_default()
    }

    /// Number of ancestors; 0 at the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Index among the parent's children; `None` at the root.
    #[inline]
    pub fn child_index(&self) -> Option<usize> {
        self.frames.last().map(|frame| frame.index)
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.node.child_count()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
