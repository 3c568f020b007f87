//! A cursor that folds a value down the path from its root.

use std::cell::OnceCell;
use std::fmt;

use smallvec::SmallVec;

use super::Cursor;

/// A [`Cursor`] that carries an accumulator for every node on its path.
///
/// The accumulator of a node is `reducer(parent's accumulator, cursor at the
/// node)`, with `init` standing in for the parent of the root. It is computed
/// on first request and kept while the cursor stays at or below the node, so
/// moving sideways or up never reruns the reducer for an ancestor.
///
/// Typical uses are nesting depth, the enclosing declaration, or the path of
/// node types leading to the current node.
pub struct ReducingCursor<'t, A, F> {
    cursor: Cursor<'t>,
    init: A,
    reducer: F,
    /// One slot per node on the path, root first.
    accs: SmallVec<[OnceCell<A>; 16]>,
}

impl<'t, A, F> ReducingCursor<'t, A, F>
where
    F: Fn(&A, &Cursor<'t>) -> A,
{
    /// Wrap `cursor`, which must be at its root.
    pub(crate) fn new(cursor: Cursor<'t>, init: A, reducer: F) -> Self {
        debug_assert_eq!(cursor.depth(), 0);
        let mut accs = SmallVec::new();
        accs.push(OnceCell::new());
        ReducingCursor {
            cursor,
            init,
            reducer,
            accs,
        }
    }

    /// The plain cursor at the same position.
    #[inline]
    pub fn cursor(&self) -> &Cursor<'t> {
        &self.cursor
    }

    /// Accumulator of the current node.
    pub fn acc(&self) -> &A {
        self.acc_at(self.accs.len() - 1)
    }

    fn acc_at(&self, depth: usize) -> &A {
        self.accs[depth].get_or_init(|| {
            let parent = match depth.checked_sub(1) {
                Some(above) => self.acc_at(above),
                None => &self.init,
            };
            (self.reducer)(parent, &self.cursor_at(depth))
        })
    }

    /// A copy of the cursor moved up to the ancestor at `depth`.
    fn cursor_at(&self, depth: usize) -> Cursor<'t> {
        let mut cursor = self.cursor.clone();
        if let Some(frame) = cursor.frames.get(depth).copied() {
            cursor.frames.truncate(depth);
            cursor.node = frame.parent;
            cursor.start = frame.parent_start;
        }
        cursor
    }

    pub fn down(&mut self) -> bool {
        if !self.cursor.down() {
            return false;
        }
        self.accs.push(OnceCell::new());
        true
    }

    pub fn right(&mut self) -> bool {
        let moved = self.cursor.right();
        if moved {
            self.reset_last();
        }
        moved
    }

    pub fn left(&mut self) -> bool {
        let moved = self.cursor.left();
        if moved {
            self.reset_last();
        }
        moved
    }

    /// Forget the accumulator of the sibling just left.
    fn reset_last(&mut self) {
        if let Some(last) = self.accs.last_mut() {
            *last = OnceCell::new();
        }
    }

    pub fn up(&mut self) -> bool {
        if !self.cursor.up() {
            return false;
        }
        self.accs.pop();
        true
    }

    /// Pre-order step, as [`Cursor::next`].
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
                self.cursor.exhausted = true;
                return false;
            }
        }
    }
}

impl<A: fmt::Debug, F> fmt::Debug for ReducingCursor<'_, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducingCursor")
            .field("cursor", &self.cursor)
            .field("init", &self.init)
            .field("accs", &self.accs)
            .finish_non_exhaustive()
    }
}
