//! Stack growth for recursive tree algorithms.
//!
//! Minified or machine-generated sources nest arbitrarily deep, and three
//! Arbor algorithms recurse once per nesting level: rule evaluation in the
//! parser, path copying in the edit engine, and grammar analysis at build
//! time. Each recursive entry point goes through [`ensure_sufficient_stack`],
//! which moves execution onto a freshly allocated stack segment when the
//! current one runs low.
//!
//! Cursor movement and tree diffing use explicit frame stacks instead and do
//! not need this guard.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker::maybe_grow`
//! - **WASM targets**: direct call
//!
//! # Configuration
//!
//! - **Red zone**: 128KB left on the current segment triggers growth
//! - **Segment size**: 2MB per new segment

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one has
/// less than the red zone left.
///
/// ```text
/// fn copy_path(&self, node: &Node, depth: usize) -> Arc<Node> {
///     ensure_sufficient_stack(|| {
///         // ... recurse into damaged children ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
