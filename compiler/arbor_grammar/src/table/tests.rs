use super::*;
use crate::{lit, seq, sym, tokenize, GrammarBuilder};

fn grammar() -> GrammarTable {
    GrammarBuilder::new("calls")
        .token("identifier", TokenPattern::Identifier)
        .extra(TokenPattern::Whitespace)
        .root("source_file", sym("_statement"))
        .rule("_statement", sym("call"))
        .rule("call", seq([sym("identifier"), lit("("), lit(")")]))
        .build()
        .unwrap()
}

#[test]
fn test_error_symbol_queries() {
    let grammar = grammar();
    assert_eq!(grammar.symbol_name(SymbolId::ERROR), Some("ERROR"));
    assert_eq!(grammar.symbol_for_name("ERROR"), Some(SymbolId::ERROR));
    assert!(grammar.is_named(SymbolId::ERROR));
    assert!(!grammar.is_terminal(SymbolId::ERROR));
    assert_eq!(grammar.rule(SymbolId::ERROR), None);
}

#[test]
fn test_unknown_symbol_queries() {
    let grammar = grammar();
    let unknown = SymbolId::new(999);
    assert_eq!(grammar.symbol_name(unknown), None);
    assert_eq!(grammar.symbol_flags(unknown), SymbolFlags::empty());
    assert_eq!(grammar.symbol_for_name("missing"), None);
}

#[test]
fn test_name_and_counts() {
    let grammar = grammar();
    assert_eq!(grammar.name(), "calls");
    // identifier, source_file, _statement, call, "(", ")"
    assert_eq!(grammar.symbol_count(), 6);
    assert_eq!(grammar.symbol_name(grammar.root_symbol()), Some("source_file"));
    assert_eq!(grammar.extras(), &[TokenPattern::Whitespace]);
}

#[test]
fn test_trait_helpers() {
    let grammar = grammar();
    let id = |name| grammar.symbol_for_name(name).unwrap();
    assert!(grammar.is_hidden(id("_statement")));
    assert!(!grammar.is_named(id("_statement")));
    assert!(grammar.is_terminal(id("(")));
    assert!(!grammar.is_named(id("(")));
    assert!(grammar.rule(id("call")).is_some());
    assert!(grammar.rule(id("identifier")).is_none());
}

#[test]
fn test_lex_through_trait_object() {
    let grammar: std::sync::Arc<dyn Grammar> = std::sync::Arc::new(grammar());
    let tokens = tokenize(grammar.as_ref(), b"f ( )").unwrap();
    let names: Vec<&str> = tokens
        .iter()
        .filter_map(|token| grammar.symbol_name(token.symbol))
        .collect();
    assert_eq!(names, vec!["identifier", "(", ")"]);
}
