//! Arbor IR - shared value types
//!
//! This crate contains the small `Copy` types every other Arbor crate speaks:
//! - Spans for byte ranges
//! - Symbol ids for grammar symbols
//! - Pending edits and change markers for incremental reparsing
//! - Change ranges produced by tree diffing
//!
//! # Design Philosophy
//!
//! - **Byte offsets everywhere**: all positions are `u32` byte offsets
//! - **Small and `Copy`**: every type here fits in a register or two
//! - **No policy**: validation of edits against a concrete tree lives in
//!   `arbor_tree`; this crate only does the arithmetic

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod incremental;
mod span;
mod symbol;

pub use incremental::{ChangeMarker, ChangeRange, InputEdit};
pub use span::Span;
pub use symbol::SymbolId;
