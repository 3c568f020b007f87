//! Lexical patterns.
//!
//! Each pattern scans forward from a position and reports two things: how
//! many bytes it matched, and how many bytes it had to look at to decide.
//! The second number is what makes incremental reparsing sound. A token's
//! meaning can depend on bytes past its end (`func` vs `funcs`), so an edit
//! touching any examined byte must invalidate the token.
//!
//! "Looking at" the end of input counts as examining one byte past it; an
//! append at the end of the buffer then invalidates everything that peeked
//! at EOF.

use std::fmt;

/// A lexical rule.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TokenPattern {
    /// An exact byte sequence, e.g. a keyword or punctuation.
    Literal(Box<[u8]>),
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Identifier,
    /// `[0-9]+(\.[0-9]+)?`
    Number,
    /// Text between two `delimiter` bytes, with backslash escapes.
    QuotedString(u8),
    /// `[ \t\r\n]+`
    Whitespace,
    /// `prefix` up to (not including) the next newline.
    LineComment(Box<[u8]>),
}

/// Outcome of scanning one pattern at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scan {
    /// Matched length in bytes; `None` when the pattern does not match.
    pub len: Option<u32>,
    /// Bytes examined from the scan position, including any EOF probe.
    pub examined: u32,
}

impl Scan {
    #[inline]
    fn matched(len: usize, examined: usize) -> Self {
        Scan {
            len: Some(to_u32(len)),
            examined: to_u32(examined),
        }
    }

    #[inline]
    fn failed(examined: usize) -> Self {
        Scan {
            len: None,
            examined: to_u32(examined),
        }
    }
}

/// Sources are capped below `u32::MAX` bytes before lexing starts.
#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Length of the run of bytes satisfying `pred` at the start of `rest`.
#[inline]
fn run_len(rest: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    rest.iter().take_while(|&&b| pred(b)).count()
}

impl TokenPattern {
    /// Literal pattern for a string.
    pub fn literal(text: &str) -> Self {
        TokenPattern::Literal(text.as_bytes().into())
    }

    /// Line comment starting with `prefix`.
    pub fn line_comment(prefix: &str) -> Self {
        TokenPattern::LineComment(prefix.as_bytes().into())
    }

    /// Whether this is an exact-text pattern.
    ///
    /// Literals win ties against other patterns of the same length, so that
    /// keywords beat identifiers.
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenPattern::Literal(_))
    }

    /// Scan this pattern at `pos`.
    ///
    /// `pos` must be `<= input.len()`.
    pub fn scan(&self, input: &[u8], pos: usize) -> Scan {
        let rest = &input[pos..];
        match self {
            TokenPattern::Literal(text) => scan_literal(text, rest),
            TokenPattern::Identifier => match rest.first() {
                Some(&b) if is_ident_start(b) => {
                    let len = 1 + run_len(&rest[1..], is_ident_continue);
                    Scan::matched(len, len + 1)
                }
                _ => Scan::failed(1),
            },
            TokenPattern::Number => scan_number(rest),
            TokenPattern::QuotedString(delimiter) => scan_quoted(*delimiter, rest),
            TokenPattern::Whitespace => {
                let len = run_len(rest, is_space);
                if len == 0 {
                    Scan::failed(1)
                } else {
                    Scan::matched(len, len + 1)
                }
            }
            TokenPattern::LineComment(prefix) => {
                let prefix_scan = scan_literal(prefix, rest);
                if prefix_scan.len.is_none() {
                    return prefix_scan;
                }
                let body = &rest[prefix.len()..];
                let len = prefix.len() + memchr::memchr(b'\n', body).unwrap_or(body.len());
                Scan::matched(len, len + 1)
            }
        }
    }
}

fn scan_literal(text: &[u8], rest: &[u8]) -> Scan {
    for (i, &expected) in text.iter().enumerate() {
        match rest.get(i) {
            Some(&b) if b == expected => {}
            _ => return Scan::failed(i + 1),
        }
    }
    Scan::matched(text.len(), text.len())
}

fn scan_number(rest: &[u8]) -> Scan {
    let int_len = run_len(rest, |b| b.is_ascii_digit());
    if int_len == 0 {
        return Scan::failed(1);
    }
    if rest.get(int_len) != Some(&b'.') {
        return Scan::matched(int_len, int_len + 1);
    }
    let frac_len = run_len(&rest[int_len + 1..], |b| b.is_ascii_digit());
    if frac_len == 0 {
        // "12." is the number 12 followed by a dot; we looked one past the dot
        Scan::matched(int_len, int_len + 2)
    } else {
        let len = int_len + 1 + frac_len;
        Scan::matched(len, len + 1)
    }
}

fn scan_quoted(delimiter: u8, rest: &[u8]) -> Scan {
    if rest.first() != Some(&delimiter) {
        return Scan::failed(1);
    }
    let mut i = 1;
    while let Some(found) = memchr::memchr2(delimiter, b'\\', &rest[i..]) {
        let at = i + found;
        if rest[at] == delimiter {
            return Scan::matched(at + 1, at + 1);
        }
        // Backslash: skip the escaped byte
        i = at + 2;
        if i > rest.len() {
            break;
        }
    }
    // Unterminated: the scan ran into end of input
    Scan::failed(rest.len() + 1)
}

impl fmt::Debug for TokenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPattern::Literal(text) => write!(f, "Literal({:?})", String::from_utf8_lossy(text)),
            TokenPattern::Identifier => write!(f, "Identifier"),
            TokenPattern::Number => write!(f, "Number"),
            TokenPattern::QuotedString(d) => write!(f, "QuotedString({:?})", char::from(*d)),
            TokenPattern::Whitespace => write!(f, "Whitespace"),
            TokenPattern::LineComment(prefix) => {
                write!(f, "LineComment({:?})", String::from_utf8_lossy(prefix))
            }
        }
    }
}

#[cfg(test)]
mod tests;
