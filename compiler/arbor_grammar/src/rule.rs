//! Rule expressions.
//!
//! [`RuleExpr`] is what grammar authors write: it refers to symbols by name.
//! [`GrammarBuilder::build`](crate::GrammarBuilder::build) resolves it into a
//! [`Rule`], which refers to symbols by id and is what the parser runs.
//!
//! Choice is ordered: the first alternative that matches wins, and later
//! alternatives are never consulted.

/// A resolved rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Symbol(arbor_ir::SymbolId),
    Seq(Box<[Rule]>),
    Choice(Box<[Rule]>),
    /// Zero or more. Stops as soon as an iteration consumes nothing.
    Repeat(Box<Rule>),
    Optional(Box<Rule>),
}

/// An unresolved rule, referring to symbols by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleExpr {
    /// A named symbol, declared with `token` or `rule`.
    Sym(String),
    /// An anonymous literal terminal, registered on first use.
    Lit(String),
    Seq(Vec<RuleExpr>),
    Choice(Vec<RuleExpr>),
    Repeat(Box<RuleExpr>),
    Optional(Box<RuleExpr>),
}

impl RuleExpr {
    /// Visit every literal in the expression, in order.
    pub(crate) fn for_each_literal<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        arbor_stack::ensure_sufficient_stack(|| match self {
            RuleExpr::Sym(_) => {}
            RuleExpr::Lit(text) => f(text),
            RuleExpr::Seq(items) | RuleExpr::Choice(items) => {
                for item in items {
                    item.for_each_literal(f);
                }
            }
            RuleExpr::Repeat(inner) | RuleExpr::Optional(inner) => inner.for_each_literal(f),
        });
    }
}

/// Reference a named symbol.
pub fn sym(name: &str) -> RuleExpr {
    RuleExpr::Sym(name.to_owned())
}

/// Match literal text.
pub fn lit(text: &str) -> RuleExpr {
    RuleExpr::Lit(text.to_owned())
}

/// Match all of `items` in order.
pub fn seq(items: impl IntoIterator<Item = RuleExpr>) -> RuleExpr {
    RuleExpr::Seq(items.into_iter().collect())
}

/// Match the first of `items` that matches.
pub fn choice(items: impl IntoIterator<Item = RuleExpr>) -> RuleExpr {
    RuleExpr::Choice(items.into_iter().collect())
}

/// Match `inner` zero or more times.
pub fn repeat(inner: RuleExpr) -> RuleExpr {
    RuleExpr::Repeat(Box::new(inner))
}

/// Match `inner` one or more times.
pub fn repeat1(inner: RuleExpr) -> RuleExpr {
    seq([inner.clone(), repeat(inner)])
}

/// Match `inner` or nothing.
pub fn optional(inner: RuleExpr) -> RuleExpr {
    RuleExpr::Optional(Box::new(inner))
}
