//! Position-independent syntax nodes.
//!
//! A node stores its length and its children's offsets relative to its own
//! start, never an absolute position. That is what lets an incremental
//! reparse splice an unchanged subtree into a new tree by `Arc` even when
//! text before it grew or shrank: only the offset stored in the new parent
//! changes.
//!
//! Absolute ranges are computed on the way down, by cursors and by the diff
//! engine.

use std::sync::Arc;

use arbor_ir::SymbolId;

/// A child slot: the child node and its start relative to the parent's start.
#[derive(Clone, Debug)]
pub struct Child {
    offset: u32,
    node: Arc<Node>,
}

impl Child {
    #[inline]
    pub fn new(offset: u32, node: Arc<Node>) -> Self {
        Child { offset, node }
    }

    /// Start of the child relative to its parent's start.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// End of the child relative to its parent's start.
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.node.len
    }
}

/// An immutable syntax node.
///
/// Children are ordered by offset and do not overlap. Bytes between
/// children (whitespace, comments) belong to the parent but to no child.
#[derive(Debug)]
pub struct Node {
    symbol: SymbolId,
    /// Set on copies made by the edit engine; never set in parsed trees.
    damaged: bool,
    len: u32,
    /// Bytes past the end that were examined while deriving this node.
    lookahead: u32,
    children: Box<[Child]>,
}

impl Node {
    /// Create an interior node.
    pub fn new(symbol: SymbolId, len: u32, lookahead: u32, children: Vec<Child>) -> Self {
        debug_assert!(
            children.windows(2).all(|w| w[0].end() <= w[1].offset),
            "children must be ordered and disjoint"
        );
        debug_assert!(children.last().map_or(true, |c| c.end() <= len));
        Node {
            symbol,
            damaged: false,
            len,
            lookahead,
            children: children.into_boxed_slice(),
        }
    }

    /// Create a leaf.
    pub fn leaf(symbol: SymbolId, len: u32, lookahead: u32) -> Self {
        Node::new(symbol, len, lookahead, Vec::new())
    }

    /// Copy made by the edit engine: new length, new child slots, damaged.
    pub(crate) fn damaged_copy(&self, len: u32, children: Vec<Child>) -> Self {
        Node {
            symbol: self.symbol,
            damaged: true,
            len,
            lookahead: self.lookahead,
            children: children.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn lookahead(&self) -> u32 {
        self.lookahead
    }

    /// Whether an edit touched the bytes this node was derived from.
    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    #[inline]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&Child> {
        self.children.get(index)
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, this one included.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter().map(|child| &*child.node));
        }
        count
    }
}

/// Structural equality: symbol, length, lookahead, damage and the shape of
/// every descendant. Shared subtrees compare equal without being walked.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if std::ptr::eq(a, b) {
                continue;
            }
            if a.symbol != b.symbol
                || a.len != b.len
                || a.lookahead != b.lookahead
                || a.damaged != b.damaged
                || a.children.len() != b.children.len()
            {
                return false;
            }
            for (x, y) in a.children.iter().zip(b.children.iter()) {
                if x.offset != y.offset {
                    return false;
                }
                stack.push((&*x.node, &*y.node));
            }
        }
        true
    }
}

impl Eq for Node {}

/// Deeply nested trees would overflow the stack with the default recursive
/// drop; unlink uniquely owned children onto a heap stack instead.
impl Drop for Node {
    fn drop(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let mut pending: Vec<Arc<Node>> = std::mem::take(&mut self.children)
            .into_vec()
            .into_iter()
            .map(|child| child.node)
            .collect();
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                pending.extend(
                    std::mem::take(&mut node.children)
                        .into_vec()
                        .into_iter()
                        .map(|child| child.node),
                );
            }
        }
    }
}
