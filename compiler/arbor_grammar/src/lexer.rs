//! Table-driven lexing.
//!
//! Lexing is context free: the token starting at a position depends only on
//! the bytes from that position on. The parser relies on this when it splices
//! an old subtree into a new tree, so nothing here may carry state between
//! tokens.

use std::ops::Index;

use arbor_ir::{Span, SymbolId};
use thiserror::Error;

use crate::grammar::Grammar;
use crate::pattern::TokenPattern;

/// A lexed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: SymbolId,
    pub span: Span,
    /// One past the furthest byte examined while lexing this token,
    /// including extras skipped right before it.
    pub examined_end: u32,
}

arbor_ir::static_assert_size!(Token, 16);

/// Result of a single lexing step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexStep {
    Token(Token),
    /// Only extras remained. `examined_end` is past the end of input.
    End { examined_end: u32 },
}

/// No token pattern matches at `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("unexpected byte 0x{byte:02x} at offset {offset}")]
pub struct LexError {
    pub offset: u32,
    pub byte: u8,
}

/// All tokens of a buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
    /// Examined end of the final, token-less step.
    eof_examined: u32,
    /// Length of the lexed buffer.
    source_len: u32,
}

impl TokenList {
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// How far lexing looked when it found no more tokens.
    #[inline]
    pub fn eof_examined(&self) -> u32 {
        self.eof_examined
    }

    /// Length of the buffer these tokens came from.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Examined end of the token at `index`, or of end-of-input when
    /// `index` is past the last token.
    #[inline]
    pub fn examined_end(&self, index: usize) -> u32 {
        self.tokens
            .get(index)
            .map_or(self.eof_examined, |token| token.examined_end)
    }

    /// Index of the token following the one that ends exactly at `end`.
    ///
    /// `None` when no token ends there, i.e. `end` is not a token boundary.
    pub fn index_after_end(&self, end: u32) -> Option<usize> {
        let index = self.tokens.partition_point(|token| token.span.end < end);
        match self.tokens.get(index) {
            Some(token) if token.span.end == end => Some(index + 1),
            _ => None,
        }
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[inline]
fn offset(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Tokenize a whole buffer.
///
/// The caller is responsible for rejecting buffers of `u32::MAX` bytes or
/// more; offsets are stored as `u32`.
pub fn tokenize(grammar: &dyn Grammar, input: &[u8]) -> Result<TokenList, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    loop {
        match grammar.lex(input, pos)? {
            LexStep::Token(token) => {
                pos = token.span.end as usize;
                tokens.push(token);
            }
            LexStep::End { examined_end } => {
                tracing::trace!(count = tokens.len(), "tokenized");
                return Ok(TokenList {
                    tokens,
                    eof_examined: examined_end,
                    source_len: offset(input.len()),
                });
            }
        }
    }
}

/// One lexing step over an ordered pattern table.
///
/// Extras are skipped first. Then every token pattern is tried: the longest
/// match wins, a literal beats a non-literal of the same length, and
/// otherwise the earlier declaration wins. Every pattern's examined extent
/// counts toward the token's `examined_end`, since each of them took part in
/// the decision.
pub(crate) fn lex_step(
    tokens: &[(SymbolId, TokenPattern)],
    extras: &[TokenPattern],
    input: &[u8],
    start: usize,
) -> Result<LexStep, LexError> {
    let mut pos = start;
    let mut examined = start;

    loop {
        let mut advanced = false;
        for extra in extras {
            let scan = extra.scan(input, pos);
            examined = examined.max(pos + scan.examined as usize);
            if let Some(len) = scan.len.filter(|&len| len > 0) {
                pos += len as usize;
                advanced = true;
                break;
            }
        }
        if !advanced {
            break;
        }
    }

    if pos >= input.len() {
        return Ok(LexStep::End {
            examined_end: offset(examined.max(input.len() + 1)),
        });
    }

    // (length, index into `tokens`)
    let mut best: Option<(u32, usize)> = None;
    for (index, (_, pattern)) in tokens.iter().enumerate() {
        let scan = pattern.scan(input, pos);
        examined = examined.max(pos + scan.examined as usize);
        let Some(len) = scan.len.filter(|&len| len > 0) else {
            continue;
        };
        let wins = match best {
            None => true,
            Some((best_len, best_index)) => {
                len > best_len
                    || (len == best_len && pattern.is_literal() && !tokens[best_index].1.is_literal())
            }
        };
        if wins {
            best = Some((len, index));
        }
    }

    match best {
        Some((len, index)) => {
            let token_start = offset(pos);
            Ok(LexStep::Token(Token {
                symbol: tokens[index].0,
                span: Span::new(token_start, token_start + len),
                examined_end: offset(examined),
            }))
        }
        None => Err(LexError {
            offset: offset(pos),
            byte: input[pos],
        }),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
