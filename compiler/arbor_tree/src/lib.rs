//! Arbor Tree - persistent syntax trees
//!
//! This crate owns everything that happens to a tree after it is parsed:
//! - [`Tree`]: immutable, versioned, cheap to clone and to share
//! - [`EditedTree`]: a path-copied tree with pending edits, ready for reparse
//! - [`Cursor`]: a zipper for walking a tree or any subtree of it, and
//!   [`ReducingCursor`], one that folds a value down its path
//! - [`changed_ranges`]: a structural diff between two versions
//!
//! # Structural sharing
//!
//! Nodes are position independent and reference counted. Editing copies the
//! path from the root down to the damaged region and shares everything
//! else; an incremental reparse shares every subtree it can reuse. Two
//! versions of a document therefore cost little more than one.

mod cursor;
mod diff;
mod edit;
mod error;
mod node;
mod tree;

pub use cursor::{Cursor, NodeFilter, ReducingCursor};
pub use diff::changed_ranges;
pub use edit::EditedTree;
pub use error::{InvalidEditError, UseAfterFreeError};
pub use node::{Child, Node};
pub use tree::{Tree, WeakTree};

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "fixtures are known to be well formed")]
mod testing;
