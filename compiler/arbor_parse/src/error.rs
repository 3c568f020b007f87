//! Parser error types.

use arbor_grammar::{GrammarError, LexError};
use arbor_tree::{InvalidEditError, UseAfterFreeError};
use thiserror::Error;

/// The parser could not produce a tree at all.
///
/// Syntax errors are not reported here: they become `ERROR` nodes inside an
/// otherwise normal tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum ParseError {
    /// No token pattern matches at `offset`.
    #[error("unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { offset: u32, byte: u8 },

    #[error("source of {len} bytes exceeds the maximum of {max}")]
    SourceTooLarge { len: usize, max: u32 },

    /// The grammar's root symbol has no rule to derive it from.
    #[error("grammar `{grammar}` has no rule for its root symbol")]
    MissingRootRule { grammar: String },
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::UnexpectedByte {
            offset: err.offset,
            byte: err.byte,
        }
    }
}

/// Any error an Arbor operation can report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    InvalidEdit(#[from] InvalidEditError),

    #[error(transparent)]
    UseAfterFree(#[from] UseAfterFreeError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
