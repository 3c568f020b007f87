//! The built grammar table.

use arbor_ir::SymbolId;
use rustc_hash::FxHashMap;

use crate::grammar::{Grammar, SymbolFlags, ERROR_NAME};
use crate::lexer::{lex_step, LexError, LexStep};
use crate::pattern::TokenPattern;
use crate::rule::Rule;

/// Name and flags of one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub flags: SymbolFlags,
}

/// An immutable grammar, produced by [`GrammarBuilder`](crate::GrammarBuilder).
#[derive(Clone, Debug)]
pub struct GrammarTable {
    pub(crate) name: String,
    pub(crate) symbols: Vec<SymbolInfo>,
    pub(crate) by_name: FxHashMap<String, SymbolId>,
    /// Indexed by symbol; `None` for terminals.
    pub(crate) rules: Vec<Option<Rule>>,
    /// Token patterns in lexing priority order.
    pub(crate) tokens: Vec<(SymbolId, TokenPattern)>,
    pub(crate) extras: Vec<TokenPattern>,
    pub(crate) root: SymbolId,
}

impl GrammarTable {
    /// All symbols, indexed by `SymbolId::index`.
    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.symbols
    }

    /// Patterns skipped between tokens.
    pub fn extras(&self) -> &[TokenPattern] {
        &self.extras
    }

    fn info(&self, symbol: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(symbol.index())
    }
}

impl Grammar for GrammarTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        if symbol.is_error() {
            return Some(ERROR_NAME);
        }
        self.info(symbol).map(|info| info.name.as_str())
    }

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags {
        if symbol.is_error() {
            return SymbolFlags::NAMED;
        }
        self.info(symbol).map_or(SymbolFlags::empty(), |info| info.flags)
    }

    fn symbol_for_name(&self, name: &str) -> Option<SymbolId> {
        if name == ERROR_NAME {
            return Some(SymbolId::ERROR);
        }
        self.by_name.get(name).copied()
    }

    fn root_symbol(&self) -> SymbolId {
        self.root
    }

    fn rule(&self, symbol: SymbolId) -> Option<&Rule> {
        self.rules.get(symbol.index()).and_then(Option::as_ref)
    }

    fn lex(&self, input: &[u8], pos: usize) -> Result<LexStep, LexError> {
        lex_step(&self.tokens, &self.extras, input, pos)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
