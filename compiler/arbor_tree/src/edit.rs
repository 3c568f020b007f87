//! The edit engine.
//!
//! Applying an edit never touches the original tree. It path-copies: every
//! node whose derivation could have been influenced by the edited bytes is
//! copied and marked damaged, and every other node is shared as-is. Shared
//! nodes after the edit keep their identity; only the offset stored in their
//! (copied) parent moves. The parser later reuses undamaged nodes wholesale.
//!
//! A node counts as influenced when the edited range overlaps the node's
//! bytes plus its lookahead (see [`ChangeMarker::affects`]).

use std::fmt;
use std::sync::Arc;

use arbor_grammar::Grammar;
use arbor_ir::{ChangeMarker, InputEdit, Span};

use crate::error::InvalidEditError;
use crate::node::{Child, Node};
use crate::tree::{same_grammar, Tree};

/// A tree with pending edits, waiting to be reparsed.
///
/// Produced by [`Tree::edit`] and consumed by the parser. Its node ranges
/// are in the coordinates of the edited text; its damaged nodes mark where
/// the parser has to derive again.
pub struct EditedTree {
    base: Tree,
    root: Arc<Node>,
    edits: Vec<InputEdit>,
}

impl Tree {
    /// Apply one edit.
    ///
    /// ```
    /// # use arbor_ir::InputEdit;
    /// # fn demo(tree: &arbor_tree::Tree) -> Result<(), arbor_tree::InvalidEditError> {
    /// // Remove "()" from "func hello() { sayHello() }"
    /// let edited = tree.edit(InputEdit::new(23, 25, 23))?;
    /// assert_eq!(edited.len(), tree.len() - 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn edit(&self, edit: InputEdit) -> Result<EditedTree, InvalidEditError> {
        EditedTree::new(self.clone()).edit(edit)
    }

    /// Apply edits in order. Each edit is expressed in the coordinates left by
    /// the edits before it. An empty slice yields an unchanged shell.
    pub fn edit_all(&self, edits: &[InputEdit]) -> Result<EditedTree, InvalidEditError> {
        edits
            .iter()
            .try_fold(EditedTree::new(self.clone()), |edited, &edit| edited.edit(edit))
    }
}

impl EditedTree {
    fn new(base: Tree) -> Self {
        EditedTree {
            root: Arc::clone(base.root()),
            base,
            edits: Vec::new(),
        }
    }

    /// Apply one more edit, in the coordinates left by the previous ones.
    pub fn edit(mut self, edit: InputEdit) -> Result<Self, InvalidEditError> {
        validate(self.len(), edit).inspect_err(|err| {
            tracing::debug!(%edit, error = %err, "rejected edit");
        })?;
        let marker = ChangeMarker::from_edit(&edit);
        // The root stays at 0 even when text is inserted in front of it
        self.root = copy_path(&self.root, 0, 0, &marker);
        self.edits.push(edit);
        tracing::debug!(
            %edit,
            new_len = self.root.len(),
            version = self.base.version(),
            "applied edit"
        );
        Ok(self)
    }

    /// Root of the edited shell.
    #[inline]
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Length of the text after all edits.
    #[inline]
    pub fn len(&self) -> u32 {
        self.root.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The tree the edits were applied to.
    #[inline]
    pub fn base(&self) -> &Tree {
        &self.base
    }

    /// Discard the edits.
    pub fn into_base(self) -> Tree {
        self.base
    }

    #[inline]
    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        self.base.grammar()
    }

    /// Version of the tree the edits were applied to.
    #[inline]
    pub fn version(&self) -> u64 {
        self.base.version()
    }

    /// Edits in the order they were applied.
    #[inline]
    pub fn edits(&self) -> &[InputEdit] {
        &self.edits
    }

    /// Whether no edit has been applied.
    #[inline]
    pub fn is_unchanged(&self) -> bool {
        self.edits.is_empty()
    }

    /// Source of the base tree, shared.
    pub fn base_source(&self) -> &Arc<[u8]> {
        self.base.shared_source()
    }

    /// Whether the base tree was parsed with this grammar instance.
    pub fn uses_grammar(&self, grammar: &Arc<dyn Grammar>) -> bool {
        same_grammar(self.base.grammar(), grammar)
    }
}

impl fmt::Debug for EditedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditedTree")
            .field("version", &self.base.version())
            .field("edits", &self.edits)
            .field("len", &self.root.len())
            .finish_non_exhaustive()
    }
}

fn validate(len: u32, edit: InputEdit) -> Result<(), InvalidEditError> {
    if edit.start > edit.old_end {
        return Err(InvalidEditError::StartAfterOldEnd {
            start: edit.start,
            old_end: edit.old_end,
        });
    }
    if edit.start > edit.new_end {
        return Err(InvalidEditError::StartAfterNewEnd {
            start: edit.start,
            new_end: edit.new_end,
        });
    }
    if edit.old_end > len {
        return Err(InvalidEditError::OutOfBounds {
            old_end: edit.old_end,
            len,
        });
    }
    let new_len = u64::from(len) - u64::from(edit.old_end) + u64::from(edit.new_end);
    // Sources of u32::MAX bytes or more cannot be parsed
    if new_len >= u64::from(u32::MAX) {
        return Err(InvalidEditError::TooLarge { new_len });
    }
    Ok(())
}

/// Copy `node`, which starts at `start` in the old text and at `new_start`
/// in the new text, with the edit applied.
///
/// Children the edit cannot have influenced are shared; the rest are copied
/// recursively. The returned node is always damaged.
fn copy_path(node: &Node, start: u32, new_start: u32, marker: &ChangeMarker) -> Arc<Node> {
    arbor_stack::ensure_sufficient_stack(|| {
        let new_end = marker.adjust_position(start + node.len());
        let children = node
            .children()
            .iter()
            .map(|child| {
                let child_start = start + child.offset();
                let new_child_start = marker.adjust_position(child_start);
                let span = Span::new(child_start, child_start + child.node().len());
                let shared = if marker.affects(span, child.node().lookahead()) {
                    copy_path(child.node(), child_start, new_child_start, marker)
                } else {
                    Arc::clone(child.node())
                };
                Child::new(new_child_start - new_start, shared)
            })
            .collect();
        Arc::new(node.damaged_copy(new_end - new_start, children))
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
