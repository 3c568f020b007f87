//! Hand-built trees for unit tests.

use std::sync::Arc;

use arbor_grammar::{choice, lit, repeat, seq, sym, Grammar, GrammarBuilder, TokenPattern};
use arbor_ir::SymbolId;

use crate::node::{Child, Node};
use crate::tree::Tree;

/// Shape of a node with absolute positions.
pub(crate) struct Shape {
    name: &'static str,
    start: u32,
    end: u32,
    lookahead: u32,
    children: Vec<Shape>,
}

/// Interior node.
pub(crate) fn n(name: &'static str, start: u32, end: u32, children: Vec<Shape>) -> Shape {
    Shape {
        name,
        start,
        end,
        lookahead: 1,
        children,
    }
}

/// Leaf.
pub(crate) fn t(name: &'static str, start: u32, end: u32) -> Shape {
    n(name, start, end, Vec::new())
}

pub(crate) fn calls_grammar() -> Arc<dyn Grammar> {
    let table = GrammarBuilder::new("calls")
        .keyword("func")
        .token("identifier", TokenPattern::Identifier)
        .extra(TokenPattern::Whitespace)
        .root("source_file", sym("function_declaration"))
        .rule(
            "function_declaration",
            seq([lit("func"), sym("identifier"), sym("parameter_list"), sym("block")]),
        )
        .rule("parameter_list", seq([lit("("), lit(")")]))
        .rule("block", seq([lit("{"), repeat(sym("_statement")), lit("}")]))
        .rule("_statement", choice([sym("call_expression"), sym("identifier")]))
        .rule("call_expression", seq([sym("identifier"), sym("argument_list")]))
        .rule("argument_list", seq([lit("("), lit(")")]))
        .build()
        .unwrap();
    Arc::new(table)
}

fn symbol(grammar: &dyn Grammar, name: &str) -> SymbolId {
    grammar.symbol_for_name(name).unwrap()
}

fn to_node(grammar: &dyn Grammar, shape: &Shape) -> Arc<Node> {
    let children = shape
        .children
        .iter()
        .map(|child| Child::new(child.start - shape.start, to_node(grammar, child)))
        .collect();
    Arc::new(Node::new(
        symbol(grammar, shape.name),
        shape.end - shape.start,
        shape.lookahead,
        children,
    ))
}

pub(crate) fn build(grammar: &Arc<dyn Grammar>, source: &str, shape: &Shape) -> Tree {
    let root = to_node(grammar.as_ref(), shape);
    Tree::new(root, Arc::clone(grammar), source.as_bytes().into(), 0)
}

pub(crate) const HELLO: &str = "func hello() { sayHello() }";

pub(crate) fn hello_shape() -> Shape {
    n("source_file", 0, 27, vec![n(
        "function_declaration",
        0,
        27,
        vec![
            t("func", 0, 4),
            t("identifier", 5, 10),
            n("parameter_list", 10, 12, vec![t("(", 10, 11), t(")", 11, 12)]),
            n("block", 13, 27, vec![
                t("{", 13, 14),
                n("call_expression", 15, 25, vec![
                    t("identifier", 15, 23),
                    n("argument_list", 23, 25, vec![t("(", 23, 24), t(")", 24, 25)]),
                ]),
                t("}", 26, 27),
            ]),
        ],
    )])
}

pub(crate) fn hello_tree(grammar: &Arc<dyn Grammar>) -> Tree {
    build(grammar, HELLO, &hello_shape())
}

/// `"func hello() { sayHello }"` built from scratch, sharing nothing.
pub(crate) fn hello_without_call(grammar: &Arc<dyn Grammar>) -> Tree {
    let shape = n("source_file", 0, 25, vec![n(
        "function_declaration",
        0,
        25,
        vec![
            t("func", 0, 4),
            t("identifier", 5, 10),
            n("parameter_list", 10, 12, vec![t("(", 10, 11), t(")", 11, 12)]),
            n("block", 13, 25, vec![
                t("{", 13, 14),
                t("identifier", 15, 23),
                t("}", 24, 25),
            ]),
        ],
    )]);
    build(grammar, "func hello() { sayHello }", &shape)
}

/// Symbol names in pre-order.
pub(crate) fn preorder_types(tree: &Tree) -> Vec<String> {
    let mut cursor = tree.cursor();
    let mut types = vec![cursor.node_type().to_owned()];
    while cursor.next() {
        types.push(cursor.node_type().to_owned());
    }
    types
}
