// tests/cli_tests.rs

#![cfg(feature = "cli")]

use fern_lang::cli::{self, CliError, Command, EvalOptions, Source};
use pretty_assertions::assert_eq;

fn code(text: &str) -> Source {
    Source::Code(text.to_string())
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_tokens_command() {
    let output = cli::run(&Command::Tokens, code("def f")).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("def"));
    assert!(lines[1].contains("identifier"));
    assert!(lines[2].contains("eof"));
}

#[test]
fn test_print_command() {
    let output = cli::run(&Command::Print, code("def f(x):\n    x + 0\n\n2 + 2")).unwrap();
    assert_eq!(output, "def f(x):\n    x\n\n4");
}

#[test]
fn test_eval_command() {
    let options = EvalOptions {
        entry: None,
        vars: vec![("y".to_string(), 3.0)],
    };
    let source = code("def twice(x):\n    x + x\n\ntwice(y)");

    let output = cli::run(&Command::Eval(options), source).unwrap();
    assert_eq!(output, "6");
}

#[test]
fn test_eval_unknown_entry() {
    let options = EvalOptions {
        entry: Some("nope".to_string()),
        vars: Vec::new(),
    };

    let result = cli::run(&Command::Eval(options), code("1 + 1"));
    assert!(matches!(result, Err(CliError::UnknownEntry(name)) if name == "nope"));
}

#[test]
fn test_eval_error_is_reported() {
    let result = cli::run(&Command::Eval(EvalOptions::default()), code("x"));
    assert!(matches!(result, Err(CliError::Eval(_))));
}

#[test]
fn test_json_command() {
    let output = cli::run(&Command::Json { pretty: false }, code("x")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json[0]["name"], "__main__");
    assert_eq!(json[0]["node"]["tag"], "placeholder");
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_file_source() {
    let path = std::env::temp_dir().join(format!("fern_cli_test_{}.fern", std::process::id()));
    std::fs::write(&path, "def sqr(x):\n    x * x\n\nsqr(5)\n").unwrap();

    let output = cli::run(&Command::Eval(EvalOptions::default()), Source::File(path.clone()));
    std::fs::remove_file(&path).unwrap();

    assert_eq!(output.unwrap(), "25");
}

#[test]
fn test_missing_file() {
    let source = Source::File("/nonexistent/dir/missing.fern".into());
    let result = cli::run(&Command::Print, source);
    assert!(matches!(result, Err(CliError::Buffer(_))));
}

#[test]
fn test_parse_binding() {
    assert_eq!(cli::parse_binding(" n = 4 ").unwrap(), ("n".to_string(), 4.0));
    assert!(cli::parse_binding("n:4").is_err());
}
