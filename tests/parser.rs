use lagoon_compiler::ast::{Expr, ExprKind, Literal};
use lagoon_compiler::error::CompileError;
use lagoon_compiler::parser::*;

fn parse(source: &str) -> Expr {
    parse_program(source).unwrap()
}

fn parse_error(source: &str) -> ParseError {
    match parse_program(source) {
        Err(CompileError::Parse(err)) => err,
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_equal_precedence_is_left_associative() {
    insta::assert_snapshot!(parse("3 + 4 - 2"), @"(- (+ 3 4) 2)");
    insta::assert_snapshot!(parse("2 - 3 - 1"), @"(- (- 2 3) 1)");
    insta::assert_snapshot!(parse("20 / 4 * 2"), @"(* (/ 20 4) 2)");
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    insta::assert_snapshot!(parse("2 + 3 * 4"), @"(+ 2 (* 3 4))");
    insta::assert_snapshot!(parse("2 * 3 + 4"), @"(+ (* 2 3) 4)");
    insta::assert_snapshot!(parse("1 - 6 / 2 + 8"), @"(+ (- 1 (/ 6 2)) 8)");
}

#[test]
fn test_parentheses_override_precedence() {
    insta::assert_snapshot!(parse("(2 + 3) * 4"), @"(* (+ 2 3) 4)");
    insta::assert_snapshot!(parse("2 - (3 - 1)"), @"(- 2 (- 3 1))");
    insta::assert_snapshot!(parse("((7))"), @"7");
}

#[test]
fn test_literals() {
    let expr = parse("42");
    assert_eq!(expr.kind, ExprKind::Literal(Literal::Integer(42)));
    assert!(!matches!(expr.kind, ExprKind::Literal(lit) if lit.is_float()));

    let expr = parse("2.5");
    assert_eq!(expr.kind, ExprKind::Literal(Literal::Float(2.5)));
    insta::assert_snapshot!(parse("1 + 2.5"), @"(+ 1 2.5)");
}

#[test]
fn test_variable_reference() {
    let expr = parse("x");
    assert_eq!(expr.kind, ExprKind::Variable("x".to_string()));
    assert_eq!(expr.span, 0..1);
}

#[test]
fn test_calls() {
    insta::assert_snapshot!(parse("f()"), @"(call f)");
    insta::assert_snapshot!(parse("max(1, x * 2)"), @"(call max 1 (* x 2))");
    insta::assert_snapshot!(parse("f(g(1), 2) + y"), @"(+ (call f (call g 1) 2) y)");
}

#[test]
fn test_call_span_covers_closing_paren() {
    let expr = parse("  f(1, 2) ");
    assert_eq!(expr.span, 2..9);
    match expr.kind {
        ExprKind::Call { callee, args } => {
            assert_eq!(callee, "f");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_binary_span_covers_both_operands() {
    let expr = parse("1 + 2 * 3");
    assert_eq!(expr.span, 0..9);
}

#[test]
fn test_comments_inside_expression() {
    insta::assert_snapshot!(parse("1 + # one\n 2 # two"), @"(+ 1 2)");
}

#[test]
fn test_empty_input_expects_expression_at_zero() {
    let err = parse_error("");
    assert_eq!(err.span, 0..0);
    assert_eq!(err.found(), Some("end of input"));
    assert!(err.expected().contains(&"integer literal"));
    assert!(err.expected().contains(&"identifier"));
    assert!(err.expected().contains(&"`(`"));
}

#[test]
fn test_whitespace_only_input() {
    let err = parse_error("   ");
    assert_eq!(err.found(), Some("end of input"));
    assert_eq!(err.span, 3..3);
}

#[test]
fn test_missing_closing_paren() {
    let err = parse_error("(1 + 2");
    assert_eq!(err.expected(), ["`)`"]);
    assert_eq!(err.found(), Some("end of input"));
    assert_eq!(err.span, 6..6);
}

#[test]
fn test_missing_right_operand() {
    let err = parse_error("1 +");
    assert_eq!(err.found(), Some("end of input"));
    assert_eq!(err.span.start, 3);
}

#[test]
fn test_bad_argument_separator() {
    let err = parse_error("f(1 2)");
    assert_eq!(err.expected(), ["`,`", "`)`"]);
    assert_eq!(err.found(), Some("`2`"));
    assert_eq!(err.span, 4..5);
}

#[test]
fn test_trailing_comma_in_call() {
    let err = parse_error("f(1,)");
    assert_eq!(err.found(), Some("`)`"));
    assert_eq!(err.span, 4..5);
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse_error("1 2");
    assert!(err.expected().contains(&"end of input"));
    assert_eq!(err.found(), Some("`2`"));
    assert_eq!(err.span, 2..3);
}

#[test]
fn test_keywords_are_not_expressions() {
    let err = parse_error("def");
    assert_eq!(err.found(), Some("keyword `def`"));
    assert_eq!(err.span, 0..3);

    let err = parse_error("1 + extern");
    assert_eq!(err.found(), Some("keyword `extern`"));
}

#[test]
fn test_parse_error_message() {
    let err = parse_error("(1");
    insta::assert_snapshot!(err.to_string(), @"expected `)` but found end of input at offset 2");

    let err = parse_error("*");
    insta::assert_snapshot!(
        err.to_string(),
        @"expected one of integer literal, float literal, identifier or `(` but found `*` at offset 0"
    );
}

#[test]
fn test_lex_errors_surface_through_the_parser() {
    match parse_program("1 + ?") {
        Err(CompileError::Lex(err)) => assert_eq!(err.offset, 4),
        other => panic!("expected a lex error, got {:?}", other),
    }
}

fn nested_parens(levels: usize) -> String {
    format!("{}1{}", "(".repeat(levels), ")".repeat(levels))
}

fn sum_chain(operators: usize) -> String {
    format!("1{}", "+1".repeat(operators))
}

#[test]
fn test_nesting_up_to_the_limit_parses() {
    assert_eq!(parse(&nested_parens(MAX_NESTING - 1)).to_string(), "1");

    let expr = parse(&sum_chain(MAX_NESTING - 1));
    assert_eq!(expr.span, 0..2 * MAX_NESTING - 1);
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let err = parse_error(&nested_parens(MAX_NESTING));
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
    assert_eq!(err.span, MAX_NESTING..MAX_NESTING + 1);
    assert!(err.expected().is_empty());
    assert_eq!(err.found(), None);

    // far past the limit still fails cleanly
    let err = parse_error(&nested_parens(200_000));
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
}

#[test]
fn test_long_operator_chains_are_rejected() {
    let err = parse_error(&sum_chain(MAX_NESTING));
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
    // the operator that would add the extra level
    let offset = 2 * MAX_NESTING - 1;
    assert_eq!(err.span, offset..offset + 1);

    let err = parse_error(&sum_chain(500_000));
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
}

#[test]
fn test_nested_calls_count_toward_the_limit() {
    let source = format!("{}1{}", "f(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    let err = parse_error(&source);
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
}

#[test]
fn test_nesting_error_message() {
    let err = parse_error(&nested_parens(MAX_NESTING));
    insta::assert_snapshot!(
        err.to_string(),
        @"expression nested deeper than 256 levels at offset 256"
    );
}
