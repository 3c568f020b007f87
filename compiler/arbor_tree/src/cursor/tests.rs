use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{calls_grammar, hello_tree, preorder_types};

const HELLO_PREORDER: &str = "source_file function_declaration func identifier parameter_list ( ) \
                              block { call_expression identifier argument_list ( ) }";

#[test]
fn test_preorder_walk() {
    let tree = hello_tree(&calls_grammar());
    assert_eq!(preorder_types(&tree).join(" "), HELLO_PREORDER);
}

#[test]
fn test_navigation_path_to_call() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    assert!(cursor.down());
    assert!(cursor.down());
    assert!(cursor.right());
    assert!(cursor.right());
    assert!(cursor.right());
    assert!(cursor.down());
    assert!(cursor.right());
    assert_eq!(cursor.node_type(), "call_expression");
    assert_eq!(cursor.node_range(), Span::new(15, 25));
    assert_eq!(cursor.text(), b"sayHello()");
    assert_eq!(cursor.depth(), 3);
    assert_eq!(cursor.child_index(), Some(1));
    assert_eq!(cursor.child_count(), 2);
}

#[test]
fn test_root_position() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    assert_eq!(cursor.node_range(), Span::new(0, 27));
    assert_eq!(cursor.depth(), 0);
    assert_eq!(cursor.child_index(), None);
    assert!(!cursor.up());
    assert!(!cursor.right());
    assert!(!cursor.left());
    assert!(!cursor.prev());
    assert!(cursor.is_named());
    assert!(!cursor.is_error());
}

#[test]
fn test_failed_moves_do_not_move() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.down();
    cursor.down();
    // "func" is a leaf and the first child
    assert!(!cursor.down());
    assert!(!cursor.left());
    assert_eq!(cursor.node_type(), "func");
    assert_eq!(cursor.node_range(), Span::new(0, 4));
    assert!(!cursor.is_named());
}

#[test]
fn test_up_restores_parent_range() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.down();
    cursor.down();
    cursor.right();
    cursor.right();
    cursor.right();
    assert_eq!(cursor.node_type(), "block");
    assert!(cursor.up());
    assert_eq!(cursor.node_type(), "function_declaration");
    assert_eq!(cursor.node_range(), Span::new(0, 27));
}

#[test]
fn test_exhausted_cursor_refuses_to_move() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    let mut visited = 1;
    while cursor.next() {
        visited += 1;
    }
    assert_eq!(visited, tree.node_count());
    assert!(cursor.is_exhausted());
    assert!(!cursor.next());
    assert!(!cursor.down());
    assert!(!cursor.right());
    assert!(!cursor.left());
    assert!(!cursor.up());
    assert!(!cursor.prev());
    assert_eq!(cursor.goto_first_child_for_byte(0), None);

    // A fresh cursor starts over
    let mut fresh = tree.cursor();
    assert!(fresh.next());
}

#[test]
fn test_prev_reverses_next() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    // Last node in pre-order: the block's "}"
    cursor.down();
    cursor.down();
    for _ in 0..3 {
        cursor.right();
    }
    cursor.down();
    cursor.right();
    cursor.right();
    assert_eq!(cursor.node_type(), "}");

    let mut backwards = vec![cursor.node_type()];
    while cursor.prev() {
        backwards.push(cursor.node_type());
    }
    backwards.reverse();
    assert_eq!(backwards.join(" "), HELLO_PREORDER);
}

#[test]
fn test_next_matching_named() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    let mut named = Vec::new();
    while cursor.next_matching(NodeFilter::NamedNode) {
        named.push(cursor.node_type());
    }
    assert_eq!(
        named,
        vec![
            "function_declaration",
            "identifier",
            "parameter_list",
            "block",
            "call_expression",
            "identifier",
            "argument_list",
        ]
    );
}

#[test]
fn test_next_matching_symbol() {
    let tree = hello_tree(&calls_grammar());
    let identifier = tree.grammar().symbol_for_name("identifier").unwrap();
    let mut cursor = tree.cursor();
    let mut texts = Vec::new();
    while cursor.next_matching(NodeFilter::WithSymbol(identifier)) {
        texts.push(String::from_utf8_lossy(cursor.text()).into_owned());
    }
    assert_eq!(texts, vec!["hello", "sayHello"]);
}

#[test]
fn test_next_matching_any_is_next() {
    let tree = hello_tree(&calls_grammar());
    let mut a = tree.cursor();
    let mut b = tree.cursor();
    while a.next() {
        assert!(b.next_matching(NodeFilter::AnyNode));
        assert_eq!(a.node_range(), b.node_range());
        assert_eq!(a.node_symbol(), b.node_symbol());
    }
    assert!(!b.next_matching(NodeFilter::AnyNode));
}

#[test]
fn test_goto_first_child_for_byte() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    assert_eq!(cursor.goto_first_child_for_byte(16), Some(0));
    assert_eq!(cursor.goto_first_child_for_byte(16), Some(3));
    assert_eq!(cursor.node_type(), "block");
    // Between "{" and the call: the call is the first child ending after 14
    assert_eq!(cursor.goto_first_child_for_byte(14), Some(1));
    assert_eq!(cursor.node_type(), "call_expression");
    assert!(cursor.up());
    assert_eq!(cursor.goto_first_child_for_byte(100), None);
    assert_eq!(cursor.node_type(), "block");
}

#[test]
fn test_cursors_are_independent() {
    let tree = hello_tree(&calls_grammar());
    let mut a = tree.cursor();
    a.down();
    let mut b = a.clone();
    b.down();
    b.right();
    assert_eq!(a.node_type(), "function_declaration");
    assert_eq!(b.node_type(), "identifier");
    assert_eq!(a.depth(), 1);
    assert_eq!(b.depth(), 2);
}

#[test]
fn test_subtree_handle_is_shared() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.down();
    cursor.down();
    for _ in 0..3 {
        cursor.right();
    }
    let block = cursor.subtree();
    let in_tree = tree.root().child(0).unwrap().node().child(3).unwrap().node();
    assert!(Arc::ptr_eq(&block, in_tree));
    assert_eq!(block.child_count(), 3);
}

#[test]
fn test_subtree_outlives_tree() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.down();
    cursor.down();
    cursor.right();
    cursor.right();
    let params = cursor.subtree();
    drop(cursor);
    drop(tree);
    assert_eq!(params.len(), 2);
    assert_eq!(params.child_count(), 2);
}

#[test]
fn test_subtree_cursor_walks_only_the_subtree() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.down();
    cursor.down();
    for _ in 0..3 {
        cursor.right();
    }
    cursor.down();
    cursor.right();
    assert_eq!(cursor.node_type(), "call_expression");

    let mut call = cursor.subtree_cursor();
    assert_eq!(call.depth(), 0);
    assert_eq!(call.child_index(), None);
    assert_eq!(call.node_range(), Span::new(15, 25));
    assert!(!call.up());
    assert!(!call.right());

    let mut types = vec![call.node_type()];
    while call.next() {
        types.push(call.node_type());
    }
    assert_eq!(types.join(" "), "call_expression identifier argument_list ( )");
    assert!(call.is_exhausted());

    // The cursor it came from is where it was
    assert_eq!(cursor.node_type(), "call_expression");
    assert_eq!(cursor.depth(), 3);
    assert!(cursor.right());
    assert_eq!(cursor.node_type(), "}");
}

#[test]
fn test_subtree_cursor_text_stays_in_tree_coordinates() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor();
    cursor.goto_first_child_for_byte(16);
    cursor.goto_first_child_for_byte(16);
    let mut block = cursor.subtree_cursor();
    assert_eq!(block.text(), b"{ sayHello() }");
    assert!(block.down());
    assert!(block.right());
    assert_eq!(block.text(), b"sayHello()");
    assert_eq!(block.goto_first_child_for_byte(23), Some(1));
    assert_eq!(block.node_range(), Span::new(23, 25));
}

#[test]
fn test_reducing_cursor_accumulates_path() {
    let tree = hello_tree(&calls_grammar());
    let mut cursor = tree.cursor().reducing(String::new(), |path: &String, at: &Cursor<'_>| {
        if path.is_empty() {
            at.node_type().to_owned()
        } else {
            format!("{path}/{}", at.node_type())
        }
    });
    assert_eq!(cursor.acc(), "source_file");

    assert!(cursor.down());
    assert!(cursor.down());
    assert_eq!(cursor.acc(), "source_file/function_declaration/func");
    assert!(cursor.right());
    assert_eq!(cursor.acc(), "source_file/function_declaration/identifier");
    assert!(cursor.right());
    assert!(cursor.right());
    assert!(cursor.down());
    assert!(cursor.right());
    assert!(cursor.down());
    assert_eq!(
        cursor.acc(),
        "source_file/function_declaration/block/call_expression/identifier"
    );
    assert!(!cursor.left());
    assert!(cursor.up());
    assert!(cursor.up());
    assert_eq!(cursor.acc(), "source_file/function_declaration/block");
    assert_eq!(cursor.cursor().node_range(), Span::new(13, 27));
}

#[test]
fn test_reducing_cursor_runs_reducer_lazily_once_per_node() {
    use std::cell::Cell;

    let tree = hello_tree(&calls_grammar());
    let calls = Cell::new(0);
    let mut cursor = tree.cursor().reducing(0usize, |depth: &usize, _: &Cursor<'_>| {
        calls.set(calls.get() + 1);
        depth + 1
    });

    // Moving alone computes nothing
    let mut steps = 0;
    while steps < 9 && cursor.next() {
        steps += 1;
    }
    assert_eq!(calls.get(), 0);
    // Ninth node in pre-order: the call expression at depth 3
    assert_eq!(cursor.cursor().node_type(), "call_expression");
    assert_eq!(*cursor.acc(), 4);
    assert_eq!(calls.get(), 4);

    // Ancestors are cached; the new node is the only new call
    assert!(cursor.down());
    assert_eq!(*cursor.acc(), 5);
    assert_eq!(calls.get(), 5);
    assert!(cursor.right());
    assert_eq!(*cursor.acc(), 5);
    assert_eq!(calls.get(), 6);
    assert!(cursor.up());
    assert_eq!(*cursor.acc(), 4);
    assert_eq!(calls.get(), 6);
}

#[test]
fn test_reducing_cursor_from_a_subtree() {
    let tree = hello_tree(&calls_grammar());
    let mut plain = tree.cursor();
    plain.down();
    plain.down();
    plain.right();
    plain.right();
    let mut cursor = plain.reducing(10u32, |parent: &u32, at: &Cursor<'_>| {
        parent + at.node().len()
    });
    // parameter_list is 2 bytes long
    assert_eq!(*cursor.acc(), 12);
    assert!(!cursor.up());
    assert!(cursor.down());
    assert_eq!(*cursor.acc(), 13);
    let mut visited = 1;
    while cursor.next() {
        visited += 1;
    }
    assert_eq!(visited, 2);
    assert!(cursor.cursor().is_exhausted());
    assert_eq!(cursor.cursor().depth(), 0);
    assert_eq!(*cursor.acc(), 12);
}
