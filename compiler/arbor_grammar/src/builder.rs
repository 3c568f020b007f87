//! Assembling grammar tables from named declarations.
//!
//! # Symbol numbering
//!
//! Ids are handed out in this order:
//! 1. Tokens and keywords, in declaration order
//! 2. The root
//! 3. Rules, in declaration order
//! 4. Literals first seen inside rule expressions, in order of appearance
//!
//! Lexing priority follows the same order for terminals.
//!
//! # Validation
//!
//! `build` rejects grammars the parser could not run: unknown or duplicate
//! names, a missing or hidden root, and left recursion. Left recursion would
//! make the recursive-descent parser loop forever, so it is found up front by
//! computing which rules can match the empty string and then looking for a
//! cycle among the rules each rule can invoke before consuming a token.

use arbor_ir::SymbolId;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::grammar::{SymbolFlags, ERROR_NAME};
use crate::pattern::TokenPattern;
use crate::rule::{Rule, RuleExpr};
use crate::table::{GrammarTable, SymbolInfo};

/// Why a grammar could not be built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum GrammarError {
    #[error("unknown symbol `{name}` referenced by `{referenced_by}`")]
    UnknownSymbol { name: String, referenced_by: String },

    #[error("symbol `{name}` is declared more than once")]
    DuplicateSymbol { name: String },

    #[error("`{name}` is reserved for error nodes")]
    ReservedName { name: String },

    #[error("token `{name}` has an empty literal")]
    EmptyLiteral { name: String },

    #[error("grammar `{grammar}` has no root rule")]
    NoRoot { grammar: String },

    #[error("root rule `{name}` cannot be hidden")]
    HiddenRoot { name: String },

    #[error("grammar declares {count} symbols; at most {max} are supported")]
    TooManySymbols { count: usize, max: usize },

    #[error("rule `{name}` is left recursive")]
    LeftRecursion { name: String },
}

#[derive(Clone, Debug)]
enum TokenDecl {
    Keyword(String),
    Named(String, TokenPattern),
}

/// Builder for [`GrammarTable`].
///
/// ```
/// use arbor_grammar::{lit, seq, sym, Grammar, GrammarBuilder, TokenPattern};
///
/// let grammar = GrammarBuilder::new("assignments")
///     .token("identifier", TokenPattern::Identifier)
///     .token("number", TokenPattern::Number)
///     .extra(TokenPattern::Whitespace)
///     .root("program", sym("assignment"))
///     .rule("assignment", seq([sym("identifier"), lit("="), sym("number")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(grammar.symbol_name(grammar.root_symbol()), Some("program"));
/// ```
#[derive(Clone, Debug)]
pub struct GrammarBuilder {
    name: String,
    tokens: Vec<TokenDecl>,
    extras: Vec<TokenPattern>,
    root: Option<(String, RuleExpr)>,
    rules: Vec<(String, RuleExpr)>,
}

impl GrammarBuilder {
    pub fn new(name: &str) -> Self {
        GrammarBuilder {
            name: name.to_owned(),
            tokens: Vec::new(),
            extras: Vec::new(),
            root: None,
            rules: Vec::new(),
        }
    }

    /// Declare an anonymous literal terminal ahead of the pattern tokens
    /// declared after it.
    #[must_use]
    pub fn keyword(mut self, text: &str) -> Self {
        self.tokens.push(TokenDecl::Keyword(text.to_owned()));
        self
    }

    /// Declare a named terminal.
    #[must_use]
    pub fn token(mut self, name: &str, pattern: TokenPattern) -> Self {
        self.tokens.push(TokenDecl::Named(name.to_owned(), pattern));
        self
    }

    /// Declare a pattern that is skipped between tokens.
    #[must_use]
    pub fn extra(mut self, pattern: TokenPattern) -> Self {
        self.extras.push(pattern);
        self
    }

    /// Declare the root, which matches `item` zero or more times.
    #[must_use]
    pub fn root(mut self, name: &str, item: RuleExpr) -> Self {
        self.root = Some((name.to_owned(), item));
        self
    }

    /// Declare a non-terminal. Names starting with `_` are hidden.
    #[must_use]
    pub fn rule(mut self, name: &str, expr: RuleExpr) -> Self {
        self.rules.push((name.to_owned(), expr));
        self
    }

    pub fn build(self) -> Result<GrammarTable, GrammarError> {
        let (root_name, root_item) = self.root.ok_or_else(|| GrammarError::NoRoot {
            grammar: self.name.clone(),
        })?;
        if root_name.starts_with('_') {
            return Err(GrammarError::HiddenRoot { name: root_name });
        }

        let mut symbols = Symbols::default();
        let mut tokens = Vec::new();

        for decl in &self.tokens {
            let (name, pattern, flags) = match decl {
                TokenDecl::Keyword(text) => (
                    text.as_str(),
                    TokenPattern::literal(text),
                    SymbolFlags::TERMINAL,
                ),
                TokenDecl::Named(name, pattern) => (
                    name.as_str(),
                    pattern.clone(),
                    SymbolFlags::TERMINAL | SymbolFlags::NAMED,
                ),
            };
            if matches!(&pattern, TokenPattern::Literal(text) if text.is_empty()) {
                return Err(GrammarError::EmptyLiteral {
                    name: name.to_owned(),
                });
            }
            let id = symbols.declare(name, flags)?;
            tokens.push((id, pattern));
        }

        let root = symbols.declare(&root_name, SymbolFlags::NAMED)?;
        let mut nonterminals = vec![(root, &root_item)];
        for (name, expr) in &self.rules {
            let flags = if name.starts_with('_') {
                SymbolFlags::HIDDEN
            } else {
                SymbolFlags::NAMED
            };
            let id = symbols.declare(name, flags)?;
            nonterminals.push((id, expr));
        }

        // Literals used inline become anonymous terminals
        let mut literal_error = None;
        for (_, expr) in &nonterminals {
            expr.for_each_literal(&mut |text| {
                if literal_error.is_some() {
                    return;
                }
                if let Some(&id) = symbols.by_name.get(text) {
                    if symbols.infos[id.index()].flags != SymbolFlags::TERMINAL {
                        literal_error = Some(GrammarError::DuplicateSymbol {
                            name: text.to_owned(),
                        });
                    }
                    return;
                }
                if text.is_empty() {
                    literal_error = Some(GrammarError::EmptyLiteral {
                        name: String::new(),
                    });
                    return;
                }
                match symbols.declare(text, SymbolFlags::TERMINAL) {
                    Ok(id) => tokens.push((id, TokenPattern::literal(text))),
                    Err(err) => literal_error = Some(err),
                }
            });
        }
        if let Some(err) = literal_error {
            return Err(err);
        }

        let mut rules: Vec<Option<Rule>> = vec![None; symbols.infos.len()];
        for &(id, expr) in &nonterminals {
            let owner = &symbols.infos[id.index()].name;
            let rule = resolve(expr, &symbols, owner)?;
            rules[id.index()] = Some(if id == root {
                Rule::Repeat(Box::new(rule))
            } else {
                rule
            });
        }

        check_left_recursion(&symbols.infos, &rules)?;

        tracing::debug!(
            grammar = %self.name,
            symbols = symbols.infos.len(),
            tokens = tokens.len(),
            "built grammar table"
        );

        Ok(GrammarTable {
            name: self.name,
            symbols: symbols.infos,
            by_name: symbols.by_name,
            rules,
            tokens,
            extras: self.extras,
            root,
        })
    }
}

#[derive(Default)]
struct Symbols {
    infos: Vec<SymbolInfo>,
    by_name: FxHashMap<String, SymbolId>,
}

impl Symbols {
    fn declare(&mut self, name: &str, flags: SymbolFlags) -> Result<SymbolId, GrammarError> {
        if name == ERROR_NAME {
            return Err(GrammarError::ReservedName {
                name: name.to_owned(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(GrammarError::DuplicateSymbol {
                name: name.to_owned(),
            });
        }
        // The last id is SymbolId::ERROR
        let raw = u16::try_from(self.infos.len())
            .ok()
            .filter(|&raw| raw != u16::MAX)
            .ok_or(GrammarError::TooManySymbols {
                count: self.infos.len() + 1,
                max: SymbolId::MAX_SYMBOLS,
            })?;
        let id = SymbolId::new(raw);
        self.infos.push(SymbolInfo {
            name: name.to_owned(),
            flags,
        });
        self.by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    fn lookup(&self, name: &str, owner: &str) -> Result<SymbolId, GrammarError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UnknownSymbol {
                name: name.to_owned(),
                referenced_by: owner.to_owned(),
            })
    }
}

fn resolve(expr: &RuleExpr, symbols: &Symbols, owner: &str) -> Result<Rule, GrammarError> {
    arbor_stack::ensure_sufficient_stack(|| {
        Ok(match expr {
            RuleExpr::Sym(name) | RuleExpr::Lit(name) => Rule::Symbol(symbols.lookup(name, owner)?),
            RuleExpr::Seq(items) => Rule::Seq(resolve_all(items, symbols, owner)?),
            RuleExpr::Choice(items) => Rule::Choice(resolve_all(items, symbols, owner)?),
            RuleExpr::Repeat(inner) => Rule::Repeat(Box::new(resolve(inner, symbols, owner)?)),
            RuleExpr::Optional(inner) => Rule::Optional(Box::new(resolve(inner, symbols, owner)?)),
        })
    })
}

fn resolve_all(
    items: &[RuleExpr],
    symbols: &Symbols,
    owner: &str,
) -> Result<Box<[Rule]>, GrammarError> {
    items.iter().map(|item| resolve(item, symbols, owner)).collect()
}

/// Whether `rule` can match without consuming a token, given which
/// non-terminals are known to be nullable so far.
fn is_nullable(rule: &Rule, nullable: &[bool]) -> bool {
    arbor_stack::ensure_sufficient_stack(|| match rule {
        Rule::Symbol(id) => nullable[id.index()],
        Rule::Seq(items) => items.iter().all(|item| is_nullable(item, nullable)),
        Rule::Choice(items) => items.iter().any(|item| is_nullable(item, nullable)),
        Rule::Repeat(_) | Rule::Optional(_) => true,
    })
}

/// Collect the non-terminals `rule` may invoke at its start position.
fn leading_calls(rule: &Rule, nullable: &[bool], rules: &[Option<Rule>], out: &mut Vec<SymbolId>) {
    arbor_stack::ensure_sufficient_stack(|| match rule {
        Rule::Symbol(id) => {
            if rules[id.index()].is_some() {
                out.push(*id);
            }
        }
        Rule::Seq(items) => {
            for item in &**items {
                leading_calls(item, nullable, rules, out);
                if !is_nullable(item, nullable) {
                    break;
                }
            }
        }
        Rule::Choice(items) => {
            for item in &**items {
                leading_calls(item, nullable, rules, out);
            }
        }
        Rule::Repeat(inner) | Rule::Optional(inner) => leading_calls(inner, nullable, rules, out),
    });
}

fn check_left_recursion(infos: &[SymbolInfo], rules: &[Option<Rule>]) -> Result<(), GrammarError> {
    let mut nullable = vec![false; rules.len()];
    loop {
        let mut changed = false;
        for (index, rule) in rules.iter().enumerate() {
            if let Some(rule) = rule {
                if !nullable[index] && is_nullable(rule, &nullable) {
                    nullable[index] = true;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let edges: Vec<Vec<SymbolId>> = rules
        .iter()
        .map(|rule| {
            let mut out = Vec::new();
            if let Some(rule) = rule {
                leading_calls(rule, &nullable, rules, &mut out);
            }
            out
        })
        .collect();

    // Iterative DFS with three colors: 0 unvisited, 1 on the stack, 2 done
    let mut color = vec![0u8; rules.len()];
    for start in 0..rules.len() {
        if color[start] != 0 {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        color[start] = 1;
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if let Some(&target) = edges[node].get(frame.1) {
                frame.1 += 1;
                match color[target.index()] {
                    0 => {
                        color[target.index()] = 1;
                        stack.push((target.index(), 0));
                    }
                    1 => {
                        return Err(GrammarError::LeftRecursion {
                            name: infos[target.index()].name.clone(),
                        });
                    }
                    _ => {}
                }
            } else {
                color[node] = 2;
                stack.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
