//! Fixture grammars for Arbor's test suites.
//!
//! - [`mini_go`]: functions, calls, declarations and binary expressions in a
//!   Go-like syntax; node names follow the usual tree-sitter Go names
//! - [`json`]: JSON values
//!
//! Both are built fresh on every call. Trees only compare equal across
//! parses that share a grammar *instance*, so keep the returned `Arc` around.

use std::sync::{Arc, Once};

use arbor_grammar::{
    choice, lit, optional, repeat, seq, sym, Grammar, GrammarBuilder, GrammarError, RuleExpr,
    TokenPattern,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests.
///
/// Does nothing unless `RUST_LOG` is set. Output is an indented tree of
/// spans, so a parse shows up nested inside the test that ran it.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// `first (sep first)*`, possibly empty.
fn separated(item: RuleExpr, separator: &str) -> RuleExpr {
    optional(seq([item.clone(), repeat(seq([lit(separator), item]))]))
}

/// A small Go-like language.
///
/// ```text
/// func hello() { sayHello() }
/// func add(a int, b int) { var c = a + b
///   return c }
/// ```
pub fn mini_go() -> Result<Arc<dyn Grammar>, GrammarError> {
    let table = GrammarBuilder::new("mini_go")
        .keyword("func")
        .keyword("var")
        .keyword("return")
        .token("identifier", TokenPattern::Identifier)
        .token("int_literal", TokenPattern::Number)
        .token("interpreted_string_literal", TokenPattern::QuotedString(b'"'))
        .extra(TokenPattern::Whitespace)
        .extra(TokenPattern::line_comment("//"))
        .root("source_file", sym("_top_level"))
        .rule(
            "_top_level",
            choice([sym("function_declaration"), sym("var_declaration")]),
        )
        .rule(
            "function_declaration",
            seq([
                lit("func"),
                sym("identifier"),
                sym("parameter_list"),
                sym("block"),
            ]),
        )
        .rule(
            "parameter_list",
            seq([lit("("), separated(sym("parameter_declaration"), ","), lit(")")]),
        )
        .rule(
            "parameter_declaration",
            seq([sym("identifier"), sym("identifier")]),
        )
        .rule("block", seq([lit("{"), repeat(sym("_statement")), lit("}")]))
        .rule(
            "_statement",
            choice([
                sym("return_statement"),
                sym("var_declaration"),
                sym("_expression"),
            ]),
        )
        .rule(
            "var_declaration",
            seq([lit("var"), sym("identifier"), lit("="), sym("_expression")]),
        )
        .rule(
            "return_statement",
            seq([lit("return"), optional(sym("_expression"))]),
        )
        .rule(
            "_expression",
            choice([sym("binary_expression"), sym("_operand")]),
        )
        .rule(
            "binary_expression",
            seq([
                sym("_operand"),
                choice([lit("+"), lit("-"), lit("*"), lit("/"), lit("==")]),
                sym("_expression"),
            ]),
        )
        .rule(
            "_operand",
            choice([
                sym("call_expression"),
                sym("parenthesized_expression"),
                sym("identifier"),
                sym("int_literal"),
                sym("interpreted_string_literal"),
            ]),
        )
        .rule(
            "parenthesized_expression",
            seq([lit("("), sym("_expression"), lit(")")]),
        )
        .rule(
            "call_expression",
            seq([sym("identifier"), sym("argument_list")]),
        )
        .rule(
            "argument_list",
            seq([lit("("), separated(sym("_expression"), ","), lit(")")]),
        )
        .build()?;
    Ok(Arc::new(table))
}

/// JSON values. Several top-level values may follow each other.
pub fn json() -> Result<Arc<dyn Grammar>, GrammarError> {
    let table = GrammarBuilder::new("json")
        .token("string", TokenPattern::QuotedString(b'"'))
        .token("number", TokenPattern::Number)
        .token("true", TokenPattern::literal("true"))
        .token("false", TokenPattern::literal("false"))
        .token("null", TokenPattern::literal("null"))
        .extra(TokenPattern::Whitespace)
        .root("document", sym("_value"))
        .rule(
            "_value",
            choice([
                sym("object"),
                sym("array"),
                sym("string"),
                sym("number"),
                sym("true"),
                sym("false"),
                sym("null"),
            ]),
        )
        .rule(
            "object",
            seq([lit("{"), separated(sym("pair"), ","), lit("}")]),
        )
        .rule("pair", seq([sym("string"), lit(":"), sym("_value")]))
        .rule(
            "array",
            seq([lit("["), separated(sym("_value"), ","), lit("]")]),
        )
        .build()?;
    Ok(Arc::new(table))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
