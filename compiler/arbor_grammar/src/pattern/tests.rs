use super::*;

fn scan(pattern: &TokenPattern, input: &str) -> (Option<u32>, u32) {
    let scan = pattern.scan(input.as_bytes(), 0);
    (scan.len, scan.examined)
}

#[test]
fn test_literal_does_not_peek_past_itself() {
    let func = TokenPattern::literal("func");
    assert_eq!(scan(&func, "funcs"), (Some(4), 4));
    assert_eq!(scan(&func, "fun"), (None, 4));
    assert_eq!(scan(&func, "fax"), (None, 2));
}

#[test]
fn test_identifier_peeks_one_past() {
    assert_eq!(scan(&TokenPattern::Identifier, "funcs("), (Some(5), 6));
    assert_eq!(scan(&TokenPattern::Identifier, "_x1"), (Some(3), 4));
    assert_eq!(scan(&TokenPattern::Identifier, "1x"), (None, 1));
}

#[test]
fn test_identifier_at_end_of_input_probes_eof() {
    assert_eq!(scan(&TokenPattern::Identifier, "abc"), (Some(3), 4));
    assert_eq!(scan(&TokenPattern::Identifier, ""), (None, 1));
}

#[test]
fn test_number_forms() {
    assert_eq!(scan(&TokenPattern::Number, "12"), (Some(2), 3));
    assert_eq!(scan(&TokenPattern::Number, "12.5x"), (Some(4), 5));
    // The dot is left for the next token, but it was looked at
    assert_eq!(scan(&TokenPattern::Number, "12.x"), (Some(2), 4));
    assert_eq!(scan(&TokenPattern::Number, "x"), (None, 1));
}

#[test]
fn test_quoted_string_with_escape() {
    let string = TokenPattern::QuotedString(b'"');
    assert_eq!(scan(&string, r#""a\"b" rest"#), (Some(6), 6));
    assert_eq!(scan(&string, r#""""#), (Some(2), 2));
}

#[test]
fn test_quoted_string_unterminated() {
    let string = TokenPattern::QuotedString(b'"');
    assert_eq!(scan(&string, r#""abc"#), (None, 5));
    assert_eq!(scan(&string, r#""a\"#), (None, 4));
    assert_eq!(scan(&string, r#""a\""#), (None, 5));
}

#[test]
fn test_whitespace_run() {
    assert_eq!(scan(&TokenPattern::Whitespace, "  \n\tx"), (Some(4), 5));
    assert_eq!(scan(&TokenPattern::Whitespace, "x"), (None, 1));
}

#[test]
fn test_line_comment_stops_before_newline() {
    let comment = TokenPattern::line_comment("//");
    assert_eq!(scan(&comment, "// hi\nx"), (Some(5), 6));
    assert_eq!(scan(&comment, "// hi"), (Some(5), 6));
    assert_eq!(scan(&comment, "/x"), (None, 2));
}

#[test]
fn test_scan_from_offset() {
    let scan = TokenPattern::Identifier.scan(b"  ab", 2);
    assert_eq!(scan.len, Some(2));
    assert_eq!(scan.examined, 3);
}

#[test]
fn test_pattern_debug() {
    assert_eq!(format!("{:?}", TokenPattern::literal("==")), r#"Literal("==")"#);
    assert_eq!(format!("{:?}", TokenPattern::QuotedString(b'\'')), r"QuotedString('\'')");
}
