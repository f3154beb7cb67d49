//! The `tokens`, `print`, `eval` and `json` commands

use std::rc::Rc;

use serde_json::{Value as Json, json};

use super::{CliError, Command};
use crate::buffer::CharSource;
use crate::environment::Environment;
use crate::evaluator::FullEval;
use crate::lexer::Lexer;
use crate::module::MAIN;
use crate::output::to_json;
use crate::parser::Parser;
use crate::print::print;

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Declaration to evaluate, `__main__` when absent
    pub entry: Option<String>,
    /// Extra number bindings
    pub vars: Vec<(String, f64)>,
}

pub fn execute<S: CharSource>(command: &Command, lexer: Lexer<S>) -> Result<String, CliError> {
    match command {
        Command::Tokens => Ok(dump_tokens(lexer)),
        Command::Print => Ok(print_declarations(lexer)),
        Command::Eval(options) => run_eval(lexer, options).map(|x| x.to_string()),
        Command::Json { pretty } => export_json(lexer, *pretty),
    }
}

/// One line per token: position, kind and text.
pub fn dump_tokens<S: CharSource>(mut lexer: Lexer<S>) -> String {
    lexer
        .tokenize()
        .iter()
        .map(|lexeme| lexeme.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every declaration printed back in source form, separated by blank lines.
pub fn print_declarations<S: CharSource>(lexer: Lexer<S>) -> String {
    let module = Parser::new(lexer).parse_declarations();
    module
        .iter()
        .map(|(_, node)| print(node))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Evaluate the entry expression with every declaration in scope.
pub fn run_eval<S: CharSource>(lexer: Lexer<S>, options: &EvalOptions) -> Result<f64, CliError> {
    let mut parser = Parser::new(lexer);
    let module = parser.parse_declarations();

    let entry = options.entry.as_deref().unwrap_or(MAIN);
    let node = module
        .get(entry)
        .ok_or_else(|| CliError::UnknownEntry(entry.to_string()))?;

    let mut env = Environment::from_module(&module);
    for (name, value) in &options.vars {
        env.bind_number(name.clone(), *value);
    }

    let result = FullEval::new(parser.registry()).eval(node, Rc::new(env))?;
    Ok(result)
}

/// Declarations as a JSON array of `{"name": ..., "node": ...}` in source order.
pub fn export_json<S: CharSource>(lexer: Lexer<S>, pretty: bool) -> Result<String, CliError> {
    let module = Parser::new(lexer).parse_declarations();
    let declarations: Vec<Json> = module
        .iter()
        .map(|(name, node)| json!({ "name": name, "node": to_json(node) }))
        .collect();

    let json = Json::Array(declarations);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}
