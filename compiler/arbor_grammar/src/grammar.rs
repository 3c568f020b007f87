//! The grammar capability consumed by the parser and the tree.

use std::fmt;

use arbor_ir::SymbolId;
use bitflags::bitflags;

use crate::lexer::{LexError, LexStep};
use crate::rule::Rule;

bitflags! {
    /// Per-symbol properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u8 {
        /// Produced by the lexer rather than by a rule.
        const TERMINAL = 1 << 0;
        /// Shows up in named-only traversals and S-expressions.
        const NAMED = 1 << 1;
        /// Never produces a node; its children are spliced into the parent.
        const HIDDEN = 1 << 2;
    }
}

/// Everything the parser needs to know about a language.
///
/// Implementations are immutable and shared between threads behind an
/// `Arc<dyn Grammar>`. Trees keep a handle to the grammar that built them,
/// which is how cursors resolve symbol names.
pub trait Grammar: Send + Sync + fmt::Debug {
    /// Language name, for diagnostics.
    fn name(&self) -> &str;

    /// Number of declared symbols (the error symbol is not counted).
    fn symbol_count(&self) -> usize;

    /// Name of a symbol. The error symbol is named `"ERROR"`.
    fn symbol_name(&self, symbol: SymbolId) -> Option<&str>;

    /// Flags of a symbol; empty for unknown ids.
    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags;

    /// Look up a symbol by name.
    fn symbol_for_name(&self, name: &str) -> Option<SymbolId>;

    /// Symbol of the tree root.
    fn root_symbol(&self) -> SymbolId;

    /// Rule of a non-terminal; `None` for terminals and unknown ids.
    ///
    /// The root's rule is `Rule::Repeat(item)`.
    fn rule(&self, symbol: SymbolId) -> Option<&Rule>;

    /// Skip extras at `pos` and lex one token.
    fn lex(&self, input: &[u8], pos: usize) -> Result<LexStep, LexError>;

    /// Whether `symbol` is named. The error symbol always is.
    fn is_named(&self, symbol: SymbolId) -> bool {
        symbol.is_error() || self.symbol_flags(symbol).contains(SymbolFlags::NAMED)
    }

    /// Whether `symbol` is a hidden non-terminal.
    fn is_hidden(&self, symbol: SymbolId) -> bool {
        self.symbol_flags(symbol).contains(SymbolFlags::HIDDEN)
    }

    /// Whether `symbol` is a terminal.
    fn is_terminal(&self, symbol: SymbolId) -> bool {
        self.symbol_flags(symbol).contains(SymbolFlags::TERMINAL)
    }
}

/// Name reported for [`SymbolId::ERROR`].
pub const ERROR_NAME: &str = "ERROR";
