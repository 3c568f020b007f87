//! Rule evaluation.
//!
//! Rules are run as parsing expressions over the token list: sequences
//! backtrack as a whole, choices commit to the first alternative that
//! matches, repetitions are greedy. Every evaluation returns the index of
//! the next unconsumed token, or `None` on failure.
//!
//! Nodes under construction live on a shared scratch stack. A successful
//! evaluation leaves its nodes on top of the stack; a failed one leaves the
//! stack exactly as it found it.
//!
//! Alongside the stack the evaluator tracks the furthest byte any lexing or
//! matching decision depended on. Each node stores how far past its end
//! that reached, which is what lets an edit tell whether the node could be
//! derived differently now.

use std::sync::Arc;

use arbor_grammar::{Grammar, Rule, Token, TokenList};
use arbor_ir::SymbolId;
use arbor_tree::{Child, Node};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::incremental::ReuseCursor;

/// A finished node and its absolute start, waiting for its parent.
#[derive(Clone, Debug)]
pub(crate) struct Pending {
    start: u32,
    node: Arc<Node>,
}

/// Result of running a visible non-terminal at a token.
#[derive(Clone, Debug)]
pub(crate) enum Outcome {
    Fail {
        examined: u32,
    },
    Match {
        next: usize,
        examined: u32,
        /// `None` when the rule matched no tokens.
        node: Option<Pending>,
    },
}

pub(crate) type Memo = FxHashMap<(SymbolId, usize), Outcome>;

/// The root node plus what is needed to account for it.
pub(crate) struct Derived<'old> {
    pub root: Arc<Node>,
    pub reused: FxHashSet<*const Node>,
    pub cursor: Option<ReuseCursor<'old>>,
}

pub(crate) struct Derivation<'a, 'old> {
    grammar: &'a dyn Grammar,
    tokens: &'a TokenList,
    reuse: Option<ReuseCursor<'old>>,
    memoize: bool,
    scratch: &'a mut Vec<Pending>,
    memo: &'a mut Memo,
    /// Furthest byte examined by the innermost node being derived.
    examined: u32,
    reused: FxHashSet<*const Node>,
}

impl<'a, 'old> Derivation<'a, 'old> {
    pub(crate) fn new(
        grammar: &'a dyn Grammar,
        tokens: &'a TokenList,
        reuse: Option<ReuseCursor<'old>>,
        memoize: bool,
        scratch: &'a mut Vec<Pending>,
        memo: &'a mut Memo,
    ) -> Self {
        scratch.clear();
        memo.clear();
        Derivation {
            grammar,
            tokens,
            reuse,
            memoize,
            scratch,
            memo,
            examined: 0,
            reused: FxHashSet::default(),
        }
    }

    /// Derive the whole buffer as repetitions of `item`.
    ///
    /// Tokens where `item` cannot match are collected into `ERROR` nodes,
    /// one per run of consecutive failures, and matching resumes at the
    /// next token.
    pub(crate) fn root(mut self, symbol: SymbolId, item: &Rule) -> Derived<'old> {
        let count = self.tokens.len();
        let mut pos = 0;
        let mut error_from = None;
        while pos < count {
            let mark = self.scratch.len();
            match self.eval(item, pos) {
                Some(next) if next > pos => {
                    if let Some(first) = error_from.take() {
                        self.insert_error(mark, first, pos);
                    }
                    pos = next;
                }
                _ => {
                    self.scratch.truncate(mark);
                    error_from.get_or_insert(pos);
                    pos += 1;
                }
            }
        }
        if let Some(first) = error_from {
            self.insert_error(self.scratch.len(), first, count);
        }

        let len = self.tokens.source_len();
        let lookahead = self.tokens.eof_examined().saturating_sub(len);
        let children = self
            .scratch
            .drain(..)
            .map(|pending| Child::new(pending.start, pending.node))
            .collect();
        Derived {
            root: Arc::new(Node::new(symbol, len, lookahead, children)),
            reused: self.reused,
            cursor: self.reuse,
        }
    }

    /// Wrap tokens `first..end` into an `ERROR` node placed at `at` on the
    /// scratch stack.
    fn insert_error(&mut self, at: usize, first: usize, end: usize) {
        let start = self.tokens[first].span.start;
        let last = self.tokens[end - 1];
        let children = (first..end)
            .map(|index| {
                let token = self.tokens[index];
                Child::new(token.span.start - start, self.leaf(token))
            })
            .collect();
        let node = Node::new(
            SymbolId::ERROR,
            last.span.end - start,
            last.examined_end.saturating_sub(last.span.end),
            children,
        );
        trace!(start, end = last.span.end, "wrapped unexpected tokens");
        self.scratch.insert(
            at,
            Pending {
                start,
                node: Arc::new(node),
            },
        );
    }

    fn eval(&mut self, rule: &Rule, pos: usize) -> Option<usize> {
        arbor_stack::ensure_sufficient_stack(|| match rule {
            Rule::Symbol(symbol) => self.symbol(*symbol, pos),
            Rule::Seq(items) => {
                let mark = self.scratch.len();
                let mut next = pos;
                for item in &**items {
                    if let Some(after) = self.eval(item, next) {
                        next = after;
                    } else {
                        self.scratch.truncate(mark);
                        return None;
                    }
                }
                Some(next)
            }
            Rule::Choice(alternatives) => alternatives
                .iter()
                .find_map(|alternative| self.eval(alternative, pos)),
            Rule::Repeat(item) => {
                let mut next = pos;
                loop {
                    let mark = self.scratch.len();
                    match self.eval(item, next) {
                        Some(after) if after > next => next = after,
                        Some(_) => {
                            self.scratch.truncate(mark);
                            break;
                        }
                        None => break,
                    }
                }
                Some(next)
            }
            Rule::Optional(item) => self.eval(item, pos).or(Some(pos)),
        })
    }

    fn symbol(&mut self, symbol: SymbolId, pos: usize) -> Option<usize> {
        let grammar = self.grammar;
        if grammar.is_terminal(symbol) {
            return self.terminal(symbol, pos);
        }
        let rule = grammar.rule(symbol)?;
        if grammar.is_hidden(symbol) {
            return self.eval(rule, pos);
        }

        let key = (symbol, pos);
        if self.memoize {
            if let Some(outcome) = self.memo.get(&key).cloned() {
                return self.apply(outcome);
            }
        }
        let outcome = match self.reusable(symbol, pos) {
            Some(outcome) => outcome,
            None => self.derive(symbol, rule, pos),
        };
        if self.memoize {
            self.memo.insert(key, outcome.clone());
        }
        self.apply(outcome)
    }

    fn terminal(&mut self, symbol: SymbolId, pos: usize) -> Option<usize> {
        self.examine(self.tokens.examined_end(pos));
        let token = *self.tokens.get(pos)?;
        if token.symbol != symbol {
            return None;
        }
        let node = self.leaf(token);
        self.scratch.push(Pending {
            start: token.span.start,
            node,
        });
        Some(pos + 1)
    }

    /// The leaf for `token`, shared with the previous tree when possible.
    fn leaf(&mut self, token: Token) -> Arc<Node> {
        let len = token.span.len();
        match self.find_reusable(token.symbol, token.span.start) {
            Some(leaf) if leaf.len() == len => {
                self.reused.insert(Arc::as_ptr(&leaf));
                leaf
            }
            _ => Arc::new(Node::leaf(
                token.symbol,
                len,
                token.examined_end.saturating_sub(token.span.end),
            )),
        }
    }

    fn find_reusable(&mut self, symbol: SymbolId, start: u32) -> Option<Arc<Node>> {
        self.reuse
            .as_mut()?
            .find(symbol, start)
            .map(Arc::clone)
    }

    /// An undamaged node of the previous tree for `symbol` at token `pos`,
    /// provided the new tokens still break where it ends.
    fn reusable(&mut self, symbol: SymbolId, pos: usize) -> Option<Outcome> {
        let start = self.tokens.get(pos)?.span.start;
        let node = self.find_reusable(symbol, start)?;
        let end = start + node.len();
        let Some(next) = self.tokens.index_after_end(end) else {
            trace!(?symbol, start, end, "no token boundary at end of candidate");
            return None;
        };
        trace!(?symbol, start, end, "reusing subtree");
        self.reused.insert(Arc::as_ptr(&node));
        Some(Outcome::Match {
            next,
            examined: end + node.lookahead(),
            node: Some(Pending { start, node }),
        })
    }

    /// Run the rule of a visible non-terminal and build its node.
    fn derive(&mut self, symbol: SymbolId, rule: &Rule, pos: usize) -> Outcome {
        let outer = std::mem::replace(&mut self.examined, 0);
        let mark = self.scratch.len();
        let result = self.eval(rule, pos);
        let examined = std::mem::replace(&mut self.examined, outer);

        match result {
            None => Outcome::Fail { examined },
            // Matched nothing: no node, nothing on the stack
            Some(next) if next == pos => {
                self.scratch.truncate(mark);
                Outcome::Match {
                    next,
                    examined,
                    node: None,
                }
            }
            Some(next) => {
                let start = self.tokens[pos].span.start;
                let end = self.tokens[next - 1].span.end;
                let children = self
                    .scratch
                    .drain(mark..)
                    .map(|pending| Child::new(pending.start - start, pending.node))
                    .collect();
                let node = Node::new(symbol, end - start, examined.saturating_sub(end), children);
                Outcome::Match {
                    next,
                    examined,
                    node: Some(Pending {
                        start,
                        node: Arc::new(node),
                    }),
                }
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Option<usize> {
        match outcome {
            Outcome::Fail { examined } => {
                self.examine(examined);
                None
            }
            Outcome::Match {
                next,
                examined,
                node,
            } => {
                self.examine(examined);
                self.scratch.extend(node);
                Some(next)
            }
        }
    }

    #[inline]
    fn examine(&mut self, end: u32) {
        self.examined = self.examined.max(end);
    }
}
