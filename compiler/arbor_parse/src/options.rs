//! Parser configuration.

/// Knobs for a [`Parser`](crate::Parser).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reuse undamaged subtrees of an edited tree. When off, a previous
    /// tree only contributes its version number.
    pub incremental: bool,
    /// Remember the outcome of every visible non-terminal at every token.
    /// Turning this off can make backtracking grammars exponential.
    pub memoize: bool,
}

impl ParserOptions {
    #[must_use]
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    #[must_use]
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            incremental: true,
            memoize: true,
        }
    }
}
