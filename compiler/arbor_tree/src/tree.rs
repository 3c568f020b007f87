//! Versioned syntax trees.

use std::fmt;
use std::sync::{Arc, Weak};

use arbor_grammar::Grammar;
use arbor_ir::{ChangeRange, Span};
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::diff;
use crate::error::UseAfterFreeError;
use crate::node::Node;

/// An immutable syntax tree together with the text and grammar it came from.
///
/// Cloning is cheap: every field is reference counted. Trees produced by an
/// incremental reparse share unchanged subtrees with their predecessor.
#[derive(Clone)]
pub struct Tree {
    root: Arc<Node>,
    grammar: Arc<dyn Grammar>,
    source: Arc<[u8]>,
    version: u64,
}

impl Tree {
    /// Assemble a tree. The root must span the whole source.
    pub fn new(root: Arc<Node>, grammar: Arc<dyn Grammar>, source: Arc<[u8]>, version: u64) -> Self {
        debug_assert_eq!(root.len() as usize, source.len());
        Tree {
            root,
            grammar,
            source,
            version,
        }
    }

    #[inline]
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    #[inline]
    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    #[inline]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub(crate) fn shared_source(&self) -> &Arc<[u8]> {
        &self.source
    }

    /// 0 for a fresh parse, one more than the predecessor's for a reparse.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.root.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Range of the root: always `0..len`.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(0, self.root.len())
    }

    /// Source bytes covered by `span`, or `None` if it is out of range.
    pub fn text(&self, span: Span) -> Option<&[u8]> {
        self.source.get(span.to_range())
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Whether both trees were built from the same grammar instance.
    pub fn same_grammar(&self, other: &Tree) -> bool {
        same_grammar(&self.grammar, &other.grammar)
    }

    /// A cursor positioned at the root.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Ranges of `new` whose structure differs from this tree.
    pub fn changed_ranges(&self, new: &Tree) -> Vec<ChangeRange> {
        diff::changed_ranges(self, new)
    }

    /// A non-owning handle.
    pub fn downgrade(&self) -> WeakTree {
        WeakTree {
            root: Arc::downgrade(&self.root),
            grammar: Arc::downgrade(&self.grammar),
            source: Arc::downgrade(&self.source),
            version: self.version,
        }
    }

    /// Render the named nodes as an S-expression, e.g.
    /// `(source_file (identifier))`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        // Depths of the named nodes whose parenthesis is still open
        let mut open: SmallVec<[usize; 32]> = SmallVec::new();
        let mut cursor = self.cursor();
        loop {
            let depth = cursor.depth();
            while open.last().is_some_and(|&d| d >= depth) {
                open.pop();
                out.push(')');
            }
            if cursor.is_named() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push('(');
                out.push_str(cursor.node_type());
                open.push(depth);
            }
            if !cursor.next() {
                break;
            }
        }
        out.extend(open.iter().map(|_| ')'));
        out
    }
}

/// Compare the data pointers only; vtable pointers of the same type may
/// differ between codegen units.
pub(crate) fn same_grammar(a: &Arc<dyn Grammar>, b: &Arc<dyn Grammar>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

#[allow(
    clippy::missing_fields_in_debug,
    reason = "the source and node contents are too large to print"
)]
impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("grammar", &self.grammar.name())
            .field("version", &self.version)
            .field("len", &self.root.len())
            .finish_non_exhaustive()
    }
}

/// A handle that does not keep a tree alive.
#[derive(Clone)]
pub struct WeakTree {
    root: Weak<Node>,
    grammar: Weak<dyn Grammar>,
    source: Weak<[u8]>,
    version: u64,
}

impl WeakTree {
    /// Get the tree back, if anything still holds it.
    pub fn upgrade(&self) -> Result<Tree, UseAfterFreeError> {
        let released = UseAfterFreeError {
            version: self.version,
        };
        let root = self.root.upgrade().ok_or(released)?;
        let grammar = self.grammar.upgrade().ok_or(released)?;
        let source = self.source.upgrade().ok_or(released)?;
        Ok(Tree {
            root,
            grammar,
            source,
            version: self.version,
        })
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl fmt::Debug for WeakTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakTree")
            .field("version", &self.version)
            .field("alive", &(self.root.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
