// tests/parser_tests.rs

use fern_lang::ast::{NodeKind, NodeTag, Value};
use fern_lang::module::MAIN;
use fern_lang::parser::{Parser, parse_module};
use fern_lang::print::print;
use pretty_assertions::assert_eq;

/// Parse `code` and print its `__main__` expression.
fn print_main(code: &str) -> String {
    let (module, diagnostics) = parse_module(code);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    print(module.main().expect("no top-level expression"))
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_literal_addition_folds() {
    let (module, _) = parse_module("2 + 3");
    assert_eq!(module.main().unwrap().as_value(), Some(&Value::I64(5)));
}

#[test]
fn test_round_trip_with_folding() {
    let printed = print_main("((2 + 2) + (2 + 2)) + x");
    assert_eq!(printed, "(8 + x)");

    // printing the result and parsing it again is stable
    assert_eq!(print_main(&printed), "(8 + x)");
}

#[test]
fn test_zero_is_dropped() {
    assert_eq!(print_main("0 + x"), "x");
    assert_eq!(print_main("x + 0.0"), "x");
}

#[test]
fn test_operators_chain_left_to_right() {
    assert_eq!(print_main("1 + 2 + x"), "(3 + x)");
    assert_eq!(print_main("a * b + c"), "((a * b) + c)");
    assert_eq!(print_main("a * (b + c)"), "(a * (b + c))");
    assert_eq!(print_main("10 - 3 - 2"), "((10 - 3) - 2)");
    assert_eq!(print_main("8 / 4 / 2"), "((8 / 4) / 2)");
}

#[test]
fn test_float_literals_round_trip() {
    let cases = [
        ("100000000000000000.0 + x", "(100000000000000000.0 + x)"),
        ("0.00001 + x", "(0.00001 + x)"),
        // overflowing sum falls back to f64
        ("(9223372036854775807 + 1) + x", "(9223372036854776000.0 + x)"),
    ];

    for (code, expected) in cases {
        let printed = print_main(code);
        assert_eq!(printed, expected);
        assert_eq!(print_main(&printed), expected);
    }
}

#[test]
fn test_negative_literals() {
    assert_eq!(print_main("-3.0 * y"), "(-3.0 * y)");
    assert_eq!(print_main("(-3.0 * y)"), "(-3.0 * y)");
    assert_eq!(print_main("a - -2"), "(a - -2)");

    let (module, _) = parse_module("-7");
    assert_eq!(module.main().unwrap().as_value(), Some(&Value::I64(-7)));
}

#[test]
fn test_minus_without_number() {
    let (_, diagnostics) = parse_module("- x");
    assert!(!diagnostics.is_empty());
    assert!(diagnostics[0].message.starts_with("expected a number after '-'"));
}

#[test]
fn test_named_operators_are_prefix() {
    assert_eq!(print_main("sqrt 4.0"), "(sqrt 4.0)");
    assert_eq!(print_main("sqrt (x + 1)"), "(sqrt (x + 1))");
}

#[test]
fn test_function_call() {
    let (module, _) = parse_module("f(1, x)");
    let main = module.main().unwrap();

    assert_eq!(main.tag(), NodeTag::FunctionCall);
    assert_eq!(main.callee_name(), Some("f"));
    assert_eq!(print(main), "f(1, x)");
}

#[test]
fn test_call_without_arguments() {
    assert_eq!(print_main("f()"), "f()");
}

// ============================================================================
// Definitions
// ============================================================================

#[test]
fn test_function_without_signature() {
    let (module, diagnostics) = parse_module("def sqr(x):\n    x * x\n");
    assert!(diagnostics.is_empty());

    let node = module.get("sqr").unwrap();
    let function = node.as_function().unwrap();
    assert_eq!(function.params, vec!["x".to_string()]);
    assert!(function.signature.is_none());
    assert_eq!(print(node), "def sqr(x):\n    (x * x)");
}

#[test]
fn test_function_with_signature() {
    let code = "def sqr(x: f64) -> f64:\n    x * x\n";
    let (module, diagnostics) = parse_module(code);
    assert!(diagnostics.is_empty());

    let node = module.get("sqr").unwrap();
    let signature = node.as_function().unwrap().signature.as_ref().unwrap();
    assert_eq!(signature.tag(), NodeTag::FunctionType);
    assert_eq!(print(signature), "(f64) -> f64");

    let printed = print(node);
    assert_eq!(printed, "def sqr(x: f64) -> f64:\n    (x * x)");

    // the printed form parses back to the same tree
    let (again, _) = parse_module(&printed);
    assert!(again.get("sqr").unwrap().structurally_eq(node));
}

#[test]
fn test_partially_typed_parameters() {
    let (module, _) = parse_module("def f(x, y: i32):\n    x + y\n");
    let node = module.get("f").unwrap();

    assert_eq!(print(node), "def f(x, y: i32):\n    (x + y)");
}

#[test]
fn test_macro_definition() {
    let (module, diagnostics) = parse_module("macro twice(e):\n    e + e\n");
    assert!(diagnostics.is_empty());

    let node = module.get("twice").unwrap();
    assert_eq!(node.tag(), NodeTag::MacroDef);
    assert!(node.is_def());
}

#[test]
fn test_docstring_in_body_is_skipped() {
    let code = "def one():\n    \"\"\"Always one.\"\"\"\n    1\n";
    let (module, diagnostics) = parse_module(code);
    assert!(diagnostics.is_empty());

    let body = &module.get("one").unwrap().as_function().unwrap().body;
    assert_eq!(body.as_value(), Some(&Value::I64(1)));
}

#[test]
fn test_struct_with_trailing_attribute() {
    // no newline after the last attribute
    let (module, diagnostics) = parse_module("struct Point:\n    x: f64\n    y: f64");
    assert!(diagnostics.is_empty());

    let record = module.get("Point").unwrap().as_record().unwrap();
    let names: Vec<&str> = record.attributes.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_union_with_meta_types() {
    let code = "union Maybe(T: Type):\n    some: T\n    none: i8\n";
    let (module, diagnostics) = parse_module(code);
    assert!(diagnostics.is_empty());

    let node = module.get("Maybe").unwrap();
    assert_eq!(node.tag(), NodeTag::UnionDef);
    assert_eq!(
        print(node),
        "union Maybe(T: Type):\n    some: T\n    none: i8"
    );
}

#[test]
fn test_declarations_keep_source_order() {
    let code = "def f(x):\n    x\n\nstruct S:\n    a: i8\n\nf(1)\n";
    let (module, diagnostics) = parse_module(code);
    assert!(diagnostics.is_empty());

    let names: Vec<&str> = module.names().collect();
    assert_eq!(names, vec!["f", "S", MAIN]);
}

#[test]
fn test_duplicate_declaration_keeps_first() {
    let code = "def f():\n    1\n\ndef f():\n    2\n";
    let (module, _) = parse_module(code);

    assert_eq!(module.len(), 1);
    let body = &module.get("f").unwrap().as_function().unwrap().body;
    assert_eq!(body.as_value(), Some(&Value::I64(1)));
}

// ============================================================================
// Error Tolerance
// ============================================================================

#[test]
fn test_missing_closing_paren_in_parameters() {
    let mut parser = Parser::from_code("def f(x\n    x\n");
    let module = parser.parse_declarations();

    let diagnostics = parser.diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics[0].message.starts_with("expected ')'"));

    // the definition is still there
    let function = module.get("f").unwrap().as_function().unwrap();
    assert_eq!(function.params, vec!["x".to_string()]);
}

#[test]
fn test_missing_comma_between_parameters() {
    let (module, diagnostics) = parse_module("def f(a b):\n    a\n");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.starts_with("expected ','"));

    let function = module.get("f").unwrap().as_function().unwrap();
    assert_eq!(function.params, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_missing_closing_paren_in_expression() {
    let (module, diagnostics) = parse_module("(1 + x");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(print(module.main().unwrap()), "(1 + x)");
}

#[test]
fn test_error_node_fills_the_gap() {
    let (module, diagnostics) = parse_module("1 + )");
    assert!(!diagnostics.is_empty());

    let main = module.main().unwrap();
    let NodeKind::BinaryCall(call) = main.kind() else {
        panic!("expected a binary call, got {}", main.tag());
    };
    assert_eq!(call.rhs.tag(), NodeTag::ErrorType);
}

#[test]
fn test_malformed_number() {
    let (module, diagnostics) = parse_module("1.2.3");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(module.main().unwrap().tag(), NodeTag::ErrorType);
}

#[test]
fn test_extra_body_lines_are_skipped() {
    let code = "def f():\n    1\n    2\nf()";
    let (module, diagnostics) = parse_module(code);

    assert!(
        diagnostics
            .iter()
            .any(|d| d.message.starts_with("expected dedent"))
    );
    assert!(module.contains("f"));
    assert_eq!(print(module.main().unwrap()), "f()");
}

#[test]
fn test_garbage_terminates() {
    let (_, diagnostics) = parse_module(") , : -> \n    \"s\" ( def\nstruct :");
    assert!(!diagnostics.is_empty());
}

#[test]
fn test_diagnostic_positions() {
    let (_, diagnostics) = parse_module("x\ndef 1");
    assert_eq!(diagnostics[0].position.line, 2);
    assert_eq!(diagnostics[0].position.column, 5);
    assert_eq!(diagnostics[0].to_string().split(": ").next(), Some("2:5"));
}
