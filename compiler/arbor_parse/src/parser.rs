//! The parser entry points.

use std::sync::Arc;

use arbor_grammar::{tokenize, Grammar, Rule};
use arbor_tree::{EditedTree, InvalidEditError, Tree};
use tracing::debug;

use crate::derive::{Derivation, Memo, Pending};
use crate::error::{Error, ParseError};
use crate::incremental::{IncrementalStats, ReuseCursor};
use crate::options::ParserOptions;

/// Largest source the parser accepts. Offsets must fit in a `u32` with room
/// for the end-of-input lookahead byte.
const MAX_SOURCE_LEN: u32 = u32::MAX - 1;

/// A parser for one grammar.
///
/// Keeps its scratch memory between parses, so parsing many versions of a
/// document with the same `Parser` allocates less.
pub struct Parser {
    grammar: Arc<dyn Grammar>,
    options: ParserOptions,
    stats: IncrementalStats,
    scratch: Vec<Pending>,
    memo: Memo,
}

impl Parser {
    pub fn new(grammar: Arc<dyn Grammar>) -> Self {
        Parser::with_options(grammar, ParserOptions::default())
    }

    pub fn with_options(grammar: Arc<dyn Grammar>, options: ParserOptions) -> Self {
        Parser {
            grammar,
            options,
            stats: IncrementalStats::default(),
            scratch: Vec::new(),
            memo: Memo::default(),
        }
    }

    #[inline]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    #[inline]
    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    /// Statistics of the last successful parse.
    #[inline]
    pub fn stats(&self) -> &IncrementalStats {
        &self.stats
    }

    /// Parse `source`, reusing what survives of `previous`.
    ///
    /// `previous` must describe exactly the edits that turn its base text
    /// into `source`; a length mismatch is reported as
    /// [`InvalidEditError::LengthMismatch`]. Syntax errors do not fail the
    /// parse, they show up as `ERROR` nodes.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(grammar = self.grammar.name(), len = source.len())
    )]
    pub fn parse(&mut self, source: &[u8], previous: Option<EditedTree>) -> Result<Tree, Error> {
        let len = u32::try_from(source.len())
            .ok()
            .filter(|&len| len <= MAX_SOURCE_LEN)
            .ok_or(ParseError::SourceTooLarge {
                len: source.len(),
                max: MAX_SOURCE_LEN,
            })?;
        if let Some(shell) = &previous {
            if shell.len() != len {
                return Err(InvalidEditError::LengthMismatch {
                    expected: shell.len(),
                    actual: source.len(),
                }
                .into());
            }
        }

        let version = previous.as_ref().map_or(0, |shell| shell.version() + 1);
        let previous = previous.filter(|shell| {
            let usable = self.options.incremental && shell.uses_grammar(&self.grammar);
            if !usable {
                debug!(
                    version = shell.version(),
                    "previous tree not reusable; parsing from scratch"
                );
            }
            usable
        });

        if let Some(shell) = previous {
            if shell.is_unchanged() && shell.base_source().as_ref() == source {
                debug!(version = shell.version(), "no edits; returning previous tree");
                self.stats = IncrementalStats {
                    reused_count: 1,
                    reparsed_count: 0,
                };
                return Ok(shell.into_base());
            }
            self.run(source, Some(&shell), version)
        } else {
            self.run(source, None, version)
        }
    }

    fn run(
        &mut self,
        source: &[u8],
        previous: Option<&EditedTree>,
        version: u64,
    ) -> Result<Tree, Error> {
        let grammar = Arc::clone(&self.grammar);
        debug!(
            version,
            incremental = previous.is_some(),
            edits = previous.map_or(0, |shell| shell.edits().len()),
            "parse start"
        );

        let tokens = tokenize(grammar.as_ref(), source).map_err(ParseError::from)?;
        let root_symbol = grammar.root_symbol();
        let root_rule = grammar
            .rule(root_symbol)
            .ok_or_else(|| ParseError::MissingRootRule {
                grammar: grammar.name().to_owned(),
            })?;
        let item = match root_rule {
            Rule::Repeat(item) => item.as_ref(),
            other => other,
        };

        let derived = Derivation::new(
            grammar.as_ref(),
            &tokens,
            previous.map(ReuseCursor::new),
            self.options.memoize,
            &mut self.scratch,
            &mut self.memo,
        )
        .root(root_symbol, item);
        // Keep the capacity, drop the nodes
        self.memo.clear();

        // Counted while `previous` keeps the reused nodes alive
        self.stats = IncrementalStats::of_tree(&derived.root, &derived.reused);
        if let Some(cursor) = &derived.cursor {
            debug!(stats = ?cursor.stats(), "reuse lookups");
        }
        debug!(
            version,
            tokens = tokens.len(),
            reused = self.stats.reused_count,
            reparsed = self.stats.reparsed_count,
            "parse done"
        );
        Ok(Tree::new(derived.root, grammar, Arc::from(source), version))
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar.name())
            .field("options", &self.options)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Parse with a throwaway [`Parser`].
pub fn parse(
    grammar: &Arc<dyn Grammar>,
    source: &[u8],
    previous: Option<EditedTree>,
) -> Result<Tree, Error> {
    Parser::new(Arc::clone(grammar)).parse(source, previous)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
