//! Grammar symbol identifiers.

use std::fmt;

/// Index of a symbol in a grammar table.
///
/// Symbols are small integers handed out by the grammar builder in
/// declaration order. [`SymbolId::ERROR`] is reserved for error nodes the
/// parser produces while recovering from syntax errors; it is never assigned
/// to a declared symbol.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SymbolId(u16);

impl SymbolId {
    /// Symbol of error nodes.
    pub const ERROR: SymbolId = SymbolId(u16::MAX);

    /// Largest number of symbols a single grammar may declare.
    pub const MAX_SYMBOLS: usize = u16::MAX as usize;

    /// Create a new `SymbolId`.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        SymbolId(raw)
    }

    /// Get the index into the grammar's symbol table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Check if this is the error symbol.
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == u16::MAX
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            write!(f, "SymbolId::ERROR")
        } else {
            write!(f, "SymbolId({})", self.0)
        }
    }
}
