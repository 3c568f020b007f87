//! Arbor Grammar - grammar tables and table-driven lexing
//!
//! A grammar is an opaque capability handed to the parser as
//! `Arc<dyn Grammar>`. It answers three kinds of questions:
//! - Symbols: names, flags (terminal, named, hidden), the root
//! - Rules: the expression a non-terminal derives
//! - Lexing: which token starts at a position, and how far the lexer had to
//!   look to decide
//!
//! [`GrammarTable`] is the in-memory implementation, assembled by
//! [`GrammarBuilder`] from named declarations.

mod builder;
mod grammar;
mod lexer;
mod pattern;
mod rule;
mod table;

pub use builder::{GrammarBuilder, GrammarError};
pub use grammar::{Grammar, SymbolFlags, ERROR_NAME};
pub use lexer::{tokenize, LexError, LexStep, Token, TokenList};
pub use pattern::{Scan, TokenPattern};
pub use rule::{choice, lit, optional, repeat, repeat1, seq, sym, Rule, RuleExpr};
pub use table::{GrammarTable, SymbolInfo};
