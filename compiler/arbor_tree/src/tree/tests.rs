use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{build, calls_grammar, hello_tree, n, t, HELLO};

#[test]
fn test_tree_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tree>();
    assert_send_sync::<WeakTree>();
}

#[test]
fn test_root_spans_source() {
    let tree = hello_tree(&calls_grammar());
    assert_eq!(tree.span(), Span::new(0, 27));
    assert_eq!(tree.len() as usize, HELLO.len());
    assert_eq!(tree.version(), 0);
    assert_eq!(tree.node_count(), 15);
    assert_eq!(tree.text(Span::new(15, 23)), Some(&b"sayHello"[..]));
    assert_eq!(tree.text(Span::new(20, 40)), None);
}

#[test]
fn test_to_sexp_lists_named_nodes() {
    let tree = hello_tree(&calls_grammar());
    assert_eq!(
        tree.to_sexp(),
        "(source_file (function_declaration (identifier) (parameter_list) \
         (block (call_expression (identifier) (argument_list)))))"
    );
}

#[test]
fn test_to_sexp_shows_error_nodes() {
    let grammar = calls_grammar();
    let tree = build(
        &grammar,
        "x {",
        &n("source_file", 0, 3, vec![n(
            "ERROR",
            0,
            3,
            vec![t("identifier", 0, 1), t("{", 2, 3)],
        )]),
    );
    assert_eq!(tree.to_sexp(), "(source_file (ERROR (identifier)))");
}

#[test]
fn test_weak_tree_round_trip() {
    let tree = hello_tree(&calls_grammar());
    let weak = tree.downgrade();
    let again = weak.upgrade().unwrap();
    assert!(Arc::ptr_eq(again.root(), tree.root()));
    assert_eq!(weak.version(), 0);
}

#[test]
fn test_weak_tree_after_release() {
    let weak = hello_tree(&calls_grammar()).downgrade();
    let err = weak.upgrade().unwrap_err();
    assert_eq!(err, UseAfterFreeError { version: 0 });
    assert_eq!(
        err.to_string(),
        "syntax tree version 0 was released while still in use"
    );
}

#[test]
fn test_same_grammar_is_by_instance() {
    let grammar = calls_grammar();
    let a = hello_tree(&grammar);
    let b = hello_tree(&grammar);
    let c = hello_tree(&calls_grammar());
    assert!(a.same_grammar(&b));
    assert!(!a.same_grammar(&c));
}

#[test]
fn test_debug_is_compact() {
    let tree = hello_tree(&calls_grammar());
    assert_eq!(
        format!("{tree:?}"),
        r#"Tree { grammar: "calls", version: 0, len: 27, .. }"#
    );
}

#[test]
fn test_weak_debug_reports_liveness() {
    let tree = hello_tree(&calls_grammar());
    let weak = tree.downgrade();
    assert_eq!(
        format!("{weak:?}"),
        "WeakTree { version: 0, alive: true, .. }"
    );
    drop(tree);
    assert_eq!(
        format!("{weak:?}"),
        "WeakTree { version: 0, alive: false, .. }"
    );
}
