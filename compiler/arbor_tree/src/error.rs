//! Error types for tree operations.

use thiserror::Error;

/// An edit that cannot be applied to the current text.
///
/// Edits are validated before anything is copied; a rejected edit leaves no
/// trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum InvalidEditError {
    #[error("edit start {start} is after its old end {old_end}")]
    StartAfterOldEnd { start: u32, old_end: u32 },

    #[error("edit start {start} is after its new end {new_end}")]
    StartAfterNewEnd { start: u32, new_end: u32 },

    #[error("edit ends at byte {old_end} but the text is only {len} bytes long")]
    OutOfBounds { old_end: u32, len: u32 },

    #[error("edit would grow the text to {new_len} bytes")]
    TooLarge { new_len: u64 },

    /// The text handed to the parser is not the length the edits produce.
    #[error("edited tree expects {expected} bytes of text but {actual} were supplied")]
    LengthMismatch { expected: u32, actual: usize },
}

/// A weak tree handle was used after every strong handle was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("syntax tree version {version} was released while still in use")]
pub struct UseAfterFreeError {
    pub version: u64,
}
