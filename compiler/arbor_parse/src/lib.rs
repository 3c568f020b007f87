//! Arbor Parse - incremental parser
//!
//! Turns bytes into a [`Tree`](arbor_tree::Tree) under any
//! [`Grammar`](arbor_grammar::Grammar):
//!
//! 1. The whole buffer is tokenized; no pattern matching is the only way a
//!    parse fails ([`ParseError::UnexpectedByte`]).
//! 2. The grammar's rules run as parsing expressions over the tokens, with
//!    packrat memoization of visible non-terminals.
//! 3. Tokens that fit nowhere are wrapped in `ERROR` nodes; parsing goes on.
//!
//! # Incremental reparse
//!
//! ```text
//! let tree = parser.parse(b"func hello() { sayHello() }", None)?;
//! let edited = tree.edit(InputEdit::new(23, 25, 23))?;
//! let new_tree = parser.parse(b"func hello() { sayHello }", Some(edited))?;
//! tree.changed_ranges(&new_tree); // [15..23]
//! ```
//!
//! Given an edited tree, the parser consults the [`ReuseCursor`] before
//! running a rule and splices in any undamaged node it finds, sharing it
//! with the previous tree. [`Parser::stats`] reports how much was reused.

mod derive;
mod error;
mod incremental;
mod options;
mod parser;

pub use error::{Error, ParseError};
pub use incremental::{CursorStats, IncrementalStats, ReuseCursor};
pub use options::ParserOptions;
pub use parser::{parse, Parser};
