// tests/visitor_tests.rs

use std::rc::Rc;

use fern_lang::ast::{NodeKind, NodeRef, NodeTag, UnaryCall, Value};
use fern_lang::builder::Builder;
use fern_lang::environment::Environment;
use fern_lang::evaluator::{EvalError, full_eval};
use fern_lang::free::{Free, free};
use fern_lang::operators::OperatorRegistry;
use fern_lang::output::{to_json, to_json_string};
use fern_lang::parser::parse_module;
use fern_lang::partial::PartialEval;
use fern_lang::print::print;
use fern_lang::visitor::Visitor;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Free
// ============================================================================

#[test]
fn test_free_releases_every_owned_node() {
    let builder = Builder::new();
    // fun, lhs, rhs and the call itself
    let tree = builder.add(builder.placeholder("x"), builder.placeholder("y"));
    assert_eq!(free(tree), 4);
}

#[test]
fn test_free_skips_borrow_targets() {
    let builder = Builder::new();
    let target = builder.value(1.0);
    let tree = builder.add(builder.borrow(target.node()), builder.placeholder("y"));

    assert_eq!(free(tree), 4);
    assert_eq!(Rc::strong_count(target.node()), 1);
    assert_eq!(print(target.node()), "1.0");
}

#[test]
fn test_free_owned_and_borrowed_in_one_tree() {
    let builder = Builder::new();
    let x = builder.placeholder("x");
    let borrow = builder.borrow(x.node());
    let weak = Rc::downgrade(x.node());

    // x is owned by the left branch and borrowed by the right one
    let tree = builder.add(x, borrow);
    assert_eq!(weak.strong_count(), 1);

    // fun, x, the borrow and the call; x counted once
    assert_eq!(free(tree), 4);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_free_leaves_shared_nodes_alive() {
    let builder = Builder::new();
    let tree = builder.add(builder.placeholder("x"), builder.placeholder("y"));

    let NodeKind::BinaryCall(call) = tree.node().kind() else {
        panic!("expected a binary call");
    };
    let kept = NodeRef::clone(&call.lhs);
    assert!(kept.parent().is_some());

    let mut visitor = Free::new();
    let node = tree.into_node();
    assert_eq!(visitor.traverse(&node, ()), 3);
    assert_eq!(visitor.shared(), 1);

    // still usable, no longer attached
    assert!(kept.parent().is_none());
    assert_eq!(print(&kept), "x");
}

#[test]
fn test_dangling_borrow() {
    let builder = Builder::new();
    let borrow = {
        let target = builder.value(1.0);
        builder.borrow(target.node())
    };

    assert_eq!(print(borrow.node()), "<dangling>");
    assert_eq!(borrow.node().resolve_tag(), NodeTag::Borrow);
    assert_eq!(
        full_eval(Environment::new(), borrow.node()),
        Err(EvalError::DanglingBorrow)
    );
}

// ============================================================================
// Visitor Defaults
// ============================================================================

/// Counts unary calls and nothing else.
struct UnaryCounter;

impl Visitor for UnaryCounter {
    type Output = usize;
    type Args = ();

    fn unhandled(&mut self, _node: &NodeRef, _: ()) -> usize {
        0
    }

    fn visit_unary_call(&mut self, _node: &NodeRef, call: &UnaryCall, _: ()) -> usize {
        1 + self.traverse(&call.arg, ())
    }
}

#[test]
fn test_unhandled_fallback() {
    let builder = Builder::new();
    let tree = builder.unary("sqrt", builder.unary("ln", builder.placeholder("x")));
    assert_eq!(UnaryCounter.traverse(tree.node(), ()), 2);

    let sum = builder.add(builder.placeholder("a"), builder.placeholder("b"));
    assert_eq!(UnaryCounter.traverse(sum.node(), ()), 0);
}

// ============================================================================
// JSON Export
// ============================================================================

#[test]
fn test_json_value() {
    let builder = Builder::new();
    let tree = builder.value(Value::I64(5));

    assert_eq!(
        to_json(tree.node()),
        json!({ "tag": "value", "kind": "i64", "value": 5 })
    );
}

#[test]
fn test_json_binary_call() {
    let builder = Builder::new();
    let tree = builder.add(builder.placeholder("x"), builder.value(1.0));

    assert_eq!(
        to_json(tree.node()),
        json!({
            "tag": "binary_call",
            "fun": { "tag": "placeholder", "name": "+", "type": null },
            "lhs": { "tag": "placeholder", "name": "x", "type": null },
            "rhs": { "tag": "value", "kind": "f64", "value": 1.0 },
        })
    );
}

#[test]
fn test_json_function() {
    let (module, _) = parse_module("def sqr(x: f64) -> f64:\n    x * x\n");
    let json = to_json(module.get("sqr").unwrap());

    assert_eq!(json["tag"], "function_def");
    assert_eq!(json["name"], "sqr");
    assert_eq!(json["params"], json!(["x"]));
    assert_eq!(json["signature"]["tag"], "function_type");
    assert_eq!(json["signature"]["ret"]["name"], "f64");
    assert_eq!(json["body"]["tag"], "binary_call");
}

#[test]
fn test_json_struct() {
    let (module, _) = parse_module("struct P:\n    x: f64\n");
    let json = to_json(module.get("P").unwrap());

    assert_eq!(json["tag"], "struct_def");
    assert_eq!(
        json["attributes"],
        json!([{ "name": "x", "type": { "tag": "builtin_type", "name": "f64" } }])
    );
}

#[test]
fn test_json_string_formats() {
    let builder = Builder::new();
    let tree = builder.placeholder("x");

    let compact = to_json_string(tree.node(), false).unwrap();
    let pretty = to_json_string(tree.node(), true).unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));

    let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(reparsed, to_json(tree.node()));
}

// ============================================================================
// Partial Evaluation
// ============================================================================

fn partial(code: &str, vars: &[(&str, f64)]) -> String {
    let (module, _) = parse_module(code);
    let env: Environment = vars.iter().map(|(n, v)| (n.to_string(), *v)).collect();
    let registry = OperatorRegistry::standard();

    let (_, node) = module.iter().next().expect("nothing parsed");
    let folded = PartialEval::new(&registry, &env).eval(node);
    print(folded.node())
}

#[test]
fn test_partial_substitutes_and_folds() {
    assert_eq!(partial("(a - 1) * b", &[("a", 3.0)]), "(2.0 * b)");
    assert_eq!(partial("sqrt (a * a)", &[("a", 3.0)]), "3.0");
}

#[test]
fn test_partial_negative_result_reparses() {
    let printed = partial("(a - 5) * y", &[("a", 2.0)]);
    assert_eq!(printed, "(-3.0 * y)");

    let (module, diagnostics) = parse_module(&printed);
    assert!(diagnostics.is_empty());
    assert_eq!(print(module.main().unwrap()), printed);
}

#[test]
fn test_partial_keeps_unbound_names() {
    assert_eq!(partial("x + y", &[]), "(x + y)");
}

#[test]
fn test_partial_leaves_calls_alone() {
    assert_eq!(partial("f(a)", &[("a", 1.0)]), "f(a)");
}

#[test]
fn test_partial_respects_parameters() {
    let code = "def f(x):\n    x + a\n";
    assert_eq!(
        partial(code, &[("x", 5.0), ("a", 1.0)]),
        "def f(x):\n    (x + 1.0)"
    );
}

#[test]
fn test_partial_result_is_independent() {
    let builder = Builder::new();
    let tree = builder.add(builder.placeholder("x"), builder.placeholder("y"));
    let env = Environment::new();
    let registry = OperatorRegistry::standard();

    let folded = PartialEval::new(&registry, &env).eval(tree.node());
    assert!(folded.node().structurally_eq(tree.node()));
    assert!(!Rc::ptr_eq(folded.node(), tree.node()));
}
