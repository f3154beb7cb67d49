pub mod ast;
pub mod buffer;
pub mod builder;
pub mod copy;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod free;
pub mod lexer;
pub mod module;
pub mod operators;
pub mod output;
pub mod parser;
pub mod partial;
pub mod print;
pub mod root;
pub mod visitor;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Lexeme, Node, NodeKind, NodeRef, NodeTag, Position, Token, Value};
pub use buffer::{Buffer, BufferError, CharSource};
pub use builder::{Builder, BuilderOptions};
pub use environment::{Binding, Environment};
pub use error::{Either, EitherError, EmptyOption};
pub use evaluator::{EvalError, FullEval, full_eval};
pub use lexer::{Lexer, LexerOptions};
pub use module::Module;
pub use operators::{OperatorRegistry, RegistryError};
pub use output::{to_json, to_json_string};
pub use parser::{Diagnostic, Parser, parse_module};
pub use print::print;
pub use root::Root;
pub use visitor::Visitor;
