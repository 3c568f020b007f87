//! Structural diff between two versions of a tree.
//!
//! Both trees are walked in lockstep from the root with an explicit work
//! stack. A pair of nodes is:
//! - skipped when it is the same `Arc` (shared by an incremental reparse) or
//!   two leaves with the same symbol and text
//! - reported, as the new node's range, when symbols or child counts differ
//! - descended into pairwise otherwise
//!
//! Results are in the new tree's coordinates, sorted, with overlapping and
//! adjacent ranges merged and empty ranges dropped.

use std::sync::Arc;

use arbor_ir::{ChangeRange, Span};

use crate::node::Node;
use crate::tree::Tree;

/// Byte ranges of `new` whose structure differs from `old`.
pub fn changed_ranges(old: &Tree, new: &Tree) -> Vec<ChangeRange> {
    if !old.same_grammar(new) {
        tracing::debug!(
            old = old.grammar().name(),
            new = new.grammar().name(),
            "grammars differ; whole tree changed"
        );
        let end = old.len().max(new.len());
        return if end == 0 {
            Vec::new()
        } else {
            vec![ChangeRange::new(0, end)]
        };
    }

    let mut changed = Vec::new();
    let mut stack: Vec<(&Arc<Node>, &Arc<Node>, u32, u32)> = vec![(old.root(), new.root(), 0, 0)];

    while let Some((a, b, a_start, b_start)) = stack.pop() {
        if Arc::ptr_eq(a, b) {
            continue;
        }
        let b_span = Span::new(b_start, b_start + b.len());
        if a.symbol() != b.symbol() || a.child_count() != b.child_count() {
            changed.push(b_span);
            continue;
        }
        if a.is_leaf() {
            let a_span = Span::new(a_start, a_start + a.len());
            if a.len() != b.len() || old.text(a_span) != new.text(b_span) {
                changed.push(b_span);
            }
            continue;
        }
        // Reverse so pairs pop in source order
        for (x, y) in a.children().iter().zip(b.children()).rev() {
            stack.push((x.node(), y.node(), a_start + x.offset(), b_start + y.offset()));
        }
    }

    let ranges = merge(changed);
    tracing::debug!(
        old_version = old.version(),
        new_version = new.version(),
        ranges = ranges.len(),
        "diffed trees"
    );
    ranges
}

fn merge(mut spans: Vec<Span>) -> Vec<ChangeRange> {
    spans.retain(|span| !span.is_empty());
    spans.sort_unstable_by_key(|span| span.start);
    let mut merged: Vec<ChangeRange> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(ChangeRange::from(span)),
        }
    }
    merged
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
