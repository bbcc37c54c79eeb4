use inkwell::context::Context;
use lagoon_compiler::compiler::CompilationContext;
use lagoon_compiler::error::{line_col, CompileError};

fn compile_error(source: &str) -> CompileError {
    let context = Context::create();
    let mut ctx = CompilationContext::new(&context, "test");
    ctx.declare_extern("f", 1).unwrap();
    match ctx.compile_source(source) {
        Err(err) => err,
        Ok(_) => panic!("`{}` should not compile", source),
    }
}

#[test]
fn test_each_stage_reports_kind_and_position() {
    let cases = [
        ("1 + $", "LexError", 4..5),
        ("1 +", "ParseError", 3..3),
        ("", "ParseError", 0..0),
        ("x * 2", "UnknownSymbol", 0..1),
        ("g(1)", "UnknownFunction", 0..4),
        ("f(1, 2)", "ArityMismatch", 0..7),
    ];

    for (source, kind, span) in cases {
        let err = compile_error(source);
        assert_eq!(err.kind_name(), kind, "source: {:?}", source);
        assert_eq!(err.span(), Some(span), "source: {:?}", source);
    }
}

#[test]
fn test_error_messages() {
    insta::assert_snapshot!(compile_error("x").to_string(), @"unknown symbol `x`");
    insta::assert_snapshot!(compile_error("g()").to_string(), @"unknown function `g`");
    insta::assert_snapshot!(
        compile_error("f()").to_string(),
        @"`f` expects 1 argument(s) but 0 were supplied"
    );
    insta::assert_snapshot!(
        compile_error("3.").to_string(),
        @"malformed number '3.' at offset 0"
    );
}

#[test]
fn test_line_col() {
    let source = "1 +\n  x\n";
    assert_eq!(line_col(source, 0), (1, 1));
    assert_eq!(line_col(source, 2), (1, 3));
    assert_eq!(line_col(source, 6), (2, 3));
    assert_eq!(line_col(source, 100), (3, 1));
}

#[test]
fn test_rendered_report_names_kind_and_location() {
    let source = "1 +\n  x";
    let err = compile_error(source);
    let report = err.render(source, "input.bl");

    assert!(report.contains("UnknownSymbol: unknown symbol `x`"), "{}", report);
    assert!(report.contains("input.bl"), "{}", report);
    assert!(report.contains("at input.bl:2:3"), "{}", report);
}

#[test]
fn test_rendered_report_for_end_of_input() {
    let source = "(1 + 2";
    let err = compile_error(source);
    let report = err.render(source, "input.bl");
    assert!(report.contains("ParseError: expected `)`"), "{}", report);
    assert!(report.contains("at input.bl:1:7"), "{}", report);
}

#[test]
fn test_rendered_report_for_empty_source() {
    let err = compile_error("");
    let report = err.render("", "empty.bl");
    assert!(report.contains("ParseError"), "{}", report);
    assert!(report.contains("at offset 0"), "{}", report);
}
