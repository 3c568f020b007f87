//! Incremental Parsing Support
//!
//! Types for describing text edits and determining which tree regions they affect.
//!
//! # Architecture
//!
//! Incremental reparsing works in two phases:
//!
//! 1. **Input Edit** - A byte-range replacement applied to an existing tree
//! 2. **Change Marker** - Decides, per node, whether the edit damaged it or
//!    merely moved it, and maps old positions to new ones
//!
//! The diff engine reports its results as [`ChangeRange`] values in the
//! coordinate space of the new tree.

use std::fmt;

use crate::Span;

/// A single pending edit: the bytes `[start, old_end)` of the old text are
/// replaced so that they occupy `[start, new_end)` in the new text.
///
/// # Examples
///
/// ```
/// use arbor_ir::InputEdit;
///
/// // Insert "hello" at position 10
/// let insert = InputEdit::insert(10, 5);
/// assert_eq!(insert.delta(), 5);
///
/// // Delete the two bytes "()" at position 23
/// let delete = InputEdit::delete(23, 2);
/// assert_eq!(delete, InputEdit::new(23, 25, 23));
/// assert_eq!(delete.delta(), -2);
///
/// // Replace "foo" (3 bytes) with "hello" (5 bytes) at position 0
/// let replace = InputEdit::replace(0, 3, 5);
/// assert_eq!(replace.delta(), 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputEdit {
    /// Start byte offset in old text.
    pub start: u32,
    /// End byte offset of the replaced region in old text (exclusive).
    pub old_end: u32,
    /// End byte offset of the replacement in new text (exclusive).
    pub new_end: u32,
}

impl InputEdit {
    /// Create a new edit from its three offsets.
    #[inline]
    pub const fn new(start: u32, old_end: u32, new_end: u32) -> Self {
        InputEdit {
            start,
            old_end,
            new_end,
        }
    }

    /// Create an insertion (no bytes removed).
    #[inline]
    pub const fn insert(at: u32, len: u32) -> Self {
        InputEdit {
            start: at,
            old_end: at,
            new_end: at + len,
        }
    }

    /// Create a deletion (no bytes inserted).
    #[inline]
    pub const fn delete(start: u32, len: u32) -> Self {
        InputEdit {
            start,
            old_end: start + len,
            new_end: start,
        }
    }

    /// Create a replacement.
    #[inline]
    pub const fn replace(start: u32, old_len: u32, new_len: u32) -> Self {
        InputEdit {
            start,
            old_end: start + old_len,
            new_end: start + new_len,
        }
    }

    /// Net change in document length (positive = grew, negative = shrank).
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_end) - i64::from(self.old_end)
    }

    /// Length of the removed region in the old text.
    #[inline]
    pub const fn old_len(&self) -> u32 {
        self.old_end.saturating_sub(self.start)
    }

    /// Length of the inserted region in the new text.
    #[inline]
    pub const fn new_len(&self) -> u32 {
        self.new_end.saturating_sub(self.start)
    }
}

impl fmt::Display for InputEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) -> [{}, {})",
            self.start, self.old_end, self.start, self.new_end
        )
    }
}

/// Classifies nodes against an edit and maps their positions.
///
/// A node is *affected* when the edited region touches any byte its
/// derivation depended on, i.e. `[start, end + lookahead)`. Lookahead matters
/// because a token can change meaning when the byte after it changes
/// (`=` followed by an inserted `=` becomes `==`). A pure insertion exactly
/// at a node's start does not affect it; the node just moves.
///
/// # Examples
///
/// ```
/// use arbor_ir::{ChangeMarker, InputEdit, Span};
///
/// let marker = ChangeMarker::from_edit(&InputEdit::new(100, 110, 115));
///
/// // Positions before the edit are unchanged
/// assert_eq!(marker.adjust_position(50), 50);
/// // Positions after the removed region shift by delta
/// assert_eq!(marker.adjust_position(200), 205);
///
/// // A node ending right before the edit is affected only through lookahead
/// assert!(!marker.affects(Span::new(90, 100), 0));
/// assert!(marker.affects(Span::new(90, 100), 1));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChangeMarker {
    /// Start of the edited region.
    pub start: u32,
    /// End of the removed region in the old text.
    pub old_end: u32,
    /// End of the inserted region in the new text.
    pub new_end: u32,
    /// Position adjustment for positions at or after `old_end`.
    pub delta: i64,
}

impl ChangeMarker {
    /// Create a marker for an edit.
    #[inline]
    pub fn from_edit(edit: &InputEdit) -> Self {
        ChangeMarker {
            start: edit.start,
            old_end: edit.old_end,
            new_end: edit.new_end,
            delta: edit.delta(),
        }
    }

    /// Check whether a node occupying `span` whose derivation examined
    /// `lookahead` bytes past its end is damaged by the edit.
    #[inline]
    pub fn affects(&self, span: Span, lookahead: u32) -> bool {
        let lookahead_end = u64::from(span.end) + u64::from(lookahead);
        u64::from(self.start) < lookahead_end && self.old_end > span.start
    }

    /// Adjust a position from old text to new text.
    ///
    /// - Strictly before the edit: unchanged
    /// - At or after the removed region's end: shifted by delta
    /// - Inside the removed region: clamped to the inserted region
    ///
    /// The mapping is monotone, so containment between nodes is preserved.
    #[inline]
    pub fn adjust_position(&self, pos: u32) -> u32 {
        if pos < self.start {
            pos
        } else if pos >= self.old_end {
            #[allow(
                clippy::cast_sign_loss,
                clippy::cast_possible_truncation,
                reason = "validated edits keep every shifted position within u32"
            )]
            {
                (i64::from(pos) + self.delta) as u32
            }
        } else {
            pos.min(self.new_end)
        }
    }
}

/// A byte interval of the new tree whose structure differs from the old tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeRange {
    pub start: u32,
    pub end: u32,
}

impl ChangeRange {
    /// Create a new change range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        ChangeRange { start, end }
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The range as a span.
    #[inline]
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl From<Span> for ChangeRange {
    fn from(span: Span) -> Self {
        ChangeRange::new(span.start, span.end)
    }
}

impl fmt::Display for ChangeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
