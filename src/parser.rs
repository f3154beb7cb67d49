//! Recursive-descent parser.
//!
//! The parser never fails. Every mismatch is logged, recorded as a
//! [`Diagnostic`] and skipped over, and spots that cannot be parsed at all get an
//! error node, so malformed input still yields a tree that can be printed or
//! inspected.
//!
//! Grammar, roughly:
//!
//! ```text
//! declaration := function | macro | record | expression
//! function    := ("def" | "macro") name "(" [param ("," param)*] ")" ["->" type] ":"
//!                NEWLINE INDENT expression DEDENT
//! param       := name [":" type]
//! record      := ("struct" | "union") name ["(" name ":" type ("," ...)* ")"] ":"
//!                NEWLINE INDENT (name ":" type NEWLINE)* DEDENT
//! expression  := primary (binary-symbol primary)*
//! primary     := "(" expression ")" | ["-"] int | ["-"] float
//!              | unary-op expression | binary-op primary primary
//!              | name "(" [expression ("," expression)*] ")" | name
//! type        := name | "(" [type ("," type)*] ")" "->" type
//! ```
//!
//! Symbolic binary operators chain left to right with no precedence:
//! `a * b + c` is `(a * b) + c` and `a - b * c` is `(a - b) * c`.

use std::fmt;
use std::mem;

use crate::ast::{Lexeme, Position, Token, Value};
use crate::buffer::{CharSource, StringSource};
use crate::builder::Builder;
use crate::lexer::Lexer;
use crate::module::{MAIN, Module};
use crate::operators::OperatorRegistry;
use crate::root::Root;

/// A problem found while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Struct,
    Union,
}

pub struct Parser<S = StringSource> {
    lexer: Lexer<S>,
    current: Lexeme,
    builder: Builder,
    registry: OperatorRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl Parser<StringSource> {
    pub fn from_code(code: &str) -> Self {
        Parser::new(Lexer::new(code))
    }
}

impl<S: CharSource> Parser<S> {
    pub fn new(lexer: Lexer<S>) -> Self {
        Parser::with_registry(lexer, OperatorRegistry::standard())
    }

    pub fn with_registry(mut lexer: Lexer<S>, registry: OperatorRegistry) -> Self {
        let current = lexer.next_lexeme();
        Parser {
            lexer,
            current,
            builder: Builder::new(),
            registry,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_builder(mut self, builder: Builder) -> Self {
        self.builder = builder;
        self
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_lexeme();
    }

    fn token(&self) -> &Token {
        &self.current.token
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(self.token()) == mem::discriminant(token)
    }

    /// Consume `expected` if it is the current token, report `message` otherwise.
    fn expect(&mut self, expected: Token, message: &str) -> bool {
        if self.check(&expected) {
            self.advance();
            true
        } else {
            self.error(message);
            false
        }
    }

    fn error(&mut self, message: &str) {
        let message = format!("{message}, got `{}`", self.token());
        log::error!(
            "{}:{}: {}",
            self.lexer.file_name(),
            self.current.position,
            message
        );
        self.diagnostics.push(Diagnostic {
            position: self.current.position,
            message,
        });
    }

    fn enter(&self, depth: usize, rule: &str) {
        log::trace!("{:indent$}{rule} at {}", "", self.current.position, indent = depth * 2);
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    /// Drop whatever is left on the current line, newline included.
    fn finish_line(&mut self) {
        let mut reported = false;
        loop {
            match self.token() {
                Token::Eof => return,
                Token::Newline => {
                    self.advance();
                    return;
                }
                _ => {
                    if !reported {
                        self.error("expected end of line");
                        reported = true;
                    }
                    self.advance();
                }
            }
        }
    }

    /// Skip to the end of the current block, its closing dedent included.
    fn recover_block(&mut self) {
        let mut nesting = 0usize;
        loop {
            match self.token() {
                Token::Eof => return,
                Token::Indent => nesting += 1,
                Token::Dedent if nesting == 0 => {
                    self.advance();
                    return;
                }
                Token::Dedent => nesting -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Parse every top-level declaration until end of input.
    ///
    /// Declarations are keyed by name; bare expressions go under `__main__`.
    pub fn parse_declarations(&mut self) -> Module {
        let mut module = Module::new();

        loop {
            self.skip_newlines();
            match self.token() {
                Token::Eof => break,
                Token::Indent | Token::Dedent | Token::RParen | Token::Comma | Token::Colon
                | Token::Arrow => {
                    self.error("unexpected token at top level");
                    self.advance();
                }
                _ => {
                    let (name, root) = self.parse_declaration(0);
                    module.insert(name, root);
                }
            }
        }

        module
    }

    pub fn parse_declaration(&mut self, depth: usize) -> (String, Root) {
        self.enter(depth, "declaration");

        match self.token() {
            Token::Def => self.parse_function(depth + 1, false),
            Token::Macro => self.parse_function(depth + 1, true),
            Token::Struct => self.parse_record(depth + 1, RecordKind::Struct),
            Token::Union => self.parse_record(depth + 1, RecordKind::Union),
            _ => {
                let expr = self.parse_expression(depth + 1);
                self.finish_line();
                (MAIN.to_string(), expr)
            }
        }
    }

    fn parse_name(&mut self, what: &str) -> String {
        match self.token() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                name
            }
            _ => {
                self.error(&format!("expected {what} name"));
                String::new()
            }
        }
    }

    fn parse_function(&mut self, depth: usize, is_macro: bool) -> (String, Root) {
        self.enter(depth, if is_macro { "macro" } else { "function" });
        self.advance(); // def / macro

        let name = self.parse_name("function");
        let (params, arg_types) = self.parse_args(depth + 1);

        let ret = if self.check(&Token::Arrow) {
            self.advance();
            Some(self.parse_type(depth + 1))
        } else {
            None
        };

        let signature = if ret.is_some() || arg_types.iter().any(Option::is_some) {
            let args = arg_types
                .into_iter()
                .map(|ty| ty.unwrap_or_else(|| self.builder.unknown()))
                .collect();
            let ret = ret.unwrap_or_else(|| self.builder.unknown());
            Some(self.builder.arrow(args, ret))
        } else {
            None
        };

        self.expect(Token::Colon, "':' expected");
        self.expect(Token::Newline, "new line expected");
        self.skip_newlines();
        let indented = self.expect(Token::Indent, "indent expected");

        if let Token::Docstring(doc) = self.token() {
            log::debug!("`{name}`: {doc}");
            self.advance();
            self.skip_newlines();
        }

        let body = self.parse_expression(depth + 1);
        self.close_block(indented);

        let root = if is_macro {
            self.builder.macro_def(name.clone(), params, signature, body)
        } else {
            self.builder.function(name.clone(), params, signature, body)
        };
        (name, root)
    }

    fn close_block(&mut self, indented: bool) {
        self.skip_newlines();
        if !indented {
            return;
        }
        if self.check(&Token::Dedent) {
            self.advance();
        } else {
            self.error("expected dedent");
            self.recover_block();
        }
    }

    /// `(name [: type], ...)`. Stops without consuming at a token that cannot
    /// belong to the list, so a missing `)` is reported once.
    fn parse_args(&mut self, depth: usize) -> (Vec<String>, Vec<Option<Root>>) {
        self.enter(depth, "args");

        let mut names = Vec::new();
        let mut types = Vec::new();

        if !self.expect(Token::LParen, "expected '('") {
            return (names, types);
        }

        loop {
            match self.token() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Identifier(name) => {
                    names.push(name.clone());
                    self.advance();

                    // type annotation is optional
                    let ty = if self.check(&Token::Colon) {
                        self.advance();
                        Some(self.parse_type(depth + 1))
                    } else {
                        None
                    };
                    types.push(ty);

                    match self.token() {
                        Token::Comma => self.advance(),
                        Token::Identifier(_) => self.error("expected ',' between parameters"),
                        _ => {}
                    }
                }
                Token::Eof
                | Token::Newline
                | Token::Colon
                | Token::Indent
                | Token::Dedent
                | Token::Arrow => {
                    self.error("expected ')'");
                    break;
                }
                _ => {
                    self.error("unexpected token in argument list");
                    self.advance();
                }
            }
        }

        (names, types)
    }

    fn parse_type(&mut self, depth: usize) -> Root {
        self.enter(depth, "type");

        match self.token() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                self.builder.builtin(name)
            }
            Token::LParen => {
                self.advance();
                let mut args = Vec::new();
                while !matches!(self.token(), Token::RParen | Token::Eof | Token::Newline) {
                    args.push(self.parse_type(depth + 1));
                    if !self.check(&Token::Comma) {
                        break;
                    }
                    self.advance();
                }
                self.expect(Token::RParen, "expected ')' closing argument types");
                self.expect(Token::Arrow, "expected '->' in function type");
                let ret = self.parse_type(depth + 1);
                self.builder.arrow(args, ret)
            }
            _ => {
                self.error("expected type name");
                self.builder.error("expected type name", None)
            }
        }
    }

    fn parse_record(&mut self, depth: usize, kind: RecordKind) -> (String, Root) {
        self.enter(depth, "record");
        self.advance(); // struct / union

        let name = self.parse_name("record");

        let meta_types = if self.check(&Token::LParen) {
            self.parse_meta_types(depth + 1)
        } else {
            Vec::new()
        };

        self.expect(Token::Colon, "':' expected");
        self.expect(Token::Newline, "new line expected");
        self.skip_newlines();
        let indented = self.expect(Token::Indent, "indent expected");

        let attributes = if indented {
            self.parse_attributes(depth + 1)
        } else {
            Vec::new()
        };
        self.close_block(indented);

        let root = match kind {
            RecordKind::Struct => self.builder.struct_def(name.clone(), meta_types, attributes),
            RecordKind::Union => self.builder.union_def(name.clone(), meta_types, attributes),
        };
        (name, root)
    }

    fn parse_meta_types(&mut self, depth: usize) -> Vec<(String, Root)> {
        self.enter(depth, "meta types");
        self.advance(); // (

        let mut meta = Vec::new();
        loop {
            match self.token() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Identifier(name) => {
                    let name = name.clone();
                    self.advance();
                    let ty = if self.expect(Token::Colon, "expected ':' after meta type name") {
                        self.parse_type(depth + 1)
                    } else {
                        self.builder.unknown()
                    };
                    meta.push((name, ty));

                    if self.check(&Token::Comma) {
                        self.advance();
                    }
                }
                Token::Eof | Token::Newline | Token::Colon | Token::Indent => {
                    self.error("expected ')'");
                    break;
                }
                _ => {
                    self.error("unexpected token in meta type list");
                    self.advance();
                }
            }
        }
        meta
    }

    /// `name: type` lines up to the closing dedent.
    fn parse_attributes(&mut self, depth: usize) -> Vec<(String, Root)> {
        self.enter(depth, "attributes");

        let mut attributes = Vec::new();
        let mut pending: Option<(String, Root)> = None;

        loop {
            match self.token() {
                Token::Dedent | Token::Eof => break,
                Token::Newline => {
                    self.advance();
                    attributes.extend(pending.take());
                }
                Token::Identifier(name) if pending.is_none() => {
                    let name = name.clone();
                    self.advance();
                    let ty = if self.expect(Token::Colon, "expected ':' after attribute name") {
                        self.parse_type(depth + 1)
                    } else {
                        self.builder.error("missing attribute type", None)
                    };
                    pending = Some((name, ty));
                }
                _ => {
                    self.error("unexpected token in attribute list");
                    self.advance();
                }
            }
        }

        // last attribute without a trailing newline
        attributes.extend(pending);
        attributes
    }

    pub fn parse_expression(&mut self, depth: usize) -> Root {
        self.enter(depth, "expression");

        let lhs = self.parse_primary(depth + 1);
        self.parse_infix(depth + 1, lhs)
    }

    fn parse_infix(&mut self, depth: usize, mut lhs: Root) -> Root {
        while let Token::Symbol(c) = self.token() {
            let op = c.to_string();
            if !self.registry.is_binary(&op) {
                break;
            }
            self.advance();
            let rhs = self.parse_primary(depth + 1);
            lhs = self.builder.binary(&op, lhs, rhs);
        }

        match self.token() {
            Token::Eof
            | Token::RParen
            | Token::Comma
            | Token::Newline
            | Token::Dedent
            | Token::Colon => lhs,
            _ => {
                self.error("not a correct operator");
                lhs
            }
        }
    }

    fn parse_primary(&mut self, depth: usize) -> Root {
        self.enter(depth, "primary");

        match self.token().clone() {
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression(depth + 1);
                self.expect(Token::RParen, "expected closing parenthesis");
                expr
            }
            Token::Integer(n) => {
                self.advance();
                self.builder.value(Value::I64(n))
            }
            Token::Float(x) => {
                self.advance();
                self.builder.value(Value::F64(x))
            }
            Token::Identifier(name) => {
                self.advance();
                self.parse_identifier(depth + 1, name)
            }
            Token::Symbol(c) if self.registry.is_unary(&c.to_string()) => {
                self.advance();
                self.parse_operator(depth + 1, c.to_string())
            }
            // negative literal
            Token::Symbol('-') => {
                self.advance();
                match self.token().clone() {
                    Token::Integer(n) => {
                        self.advance();
                        self.builder.value(Value::I64(-n))
                    }
                    Token::Float(x) => {
                        self.advance();
                        self.builder.value(Value::F64(-x))
                    }
                    _ => {
                        self.error("expected a number after '-'");
                        self.builder.error("expected a number after '-'", None)
                    }
                }
            }
            Token::Incorrect(text) => {
                self.error("malformed token");
                self.advance();
                self.builder.error(format!("malformed token `{text}`"), None)
            }
            Token::Eof
            | Token::Newline
            | Token::Dedent
            | Token::Indent
            | Token::RParen
            | Token::Comma
            | Token::Colon => {
                self.error("expected expression");
                self.builder.error("expected expression", None)
            }
            other => {
                self.error("unexpected token in expression");
                self.advance();
                self.builder.error(format!("unexpected `{other}`"), None)
            }
        }
    }

    fn parse_identifier(&mut self, depth: usize, name: String) -> Root {
        if self.registry.contains(&name) {
            return self.parse_operator(depth, name);
        }

        if self.check(&Token::LParen) {
            let args = self.parse_call_args(depth + 1);
            return self.builder.call(&name, args);
        }

        self.builder.placeholder(name)
    }

    /// Prefix application of a named operator.
    fn parse_operator(&mut self, depth: usize, op: String) -> Root {
        self.enter(depth, "operator");

        if self.registry.is_binary(&op) {
            let lhs = self.parse_primary(depth + 1);
            let rhs = self.parse_primary(depth + 1);
            return self.builder.binary(&op, lhs, rhs);
        }

        let arg = self.parse_expression(depth + 1);
        self.builder.unary(&op, arg)
    }

    fn parse_call_args(&mut self, depth: usize) -> Vec<Root> {
        self.advance(); // (

        let mut args = Vec::new();
        if self.check(&Token::RParen) {
            self.advance();
            return args;
        }

        loop {
            args.push(self.parse_expression(depth + 1));
            match self.token() {
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                _ => {
                    self.error("expected ',' or ')' in call");
                    break;
                }
            }
        }
        args
    }
}

/// Parse `code` into a module, along with the diagnostics found on the way.
pub fn parse_module(code: &str) -> (Module, Vec<Diagnostic>) {
    let mut parser = Parser::from_code(code);
    let module = parser.parse_declarations();
    (module, parser.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_position() {
        let mut parser = Parser::from_code("def (x):\n    x\n");
        parser.parse_declarations();

        let diagnostics = parser.diagnostics();
        assert!(!diagnostics.is_empty());
        assert_eq!(diagnostics[0].position, Position { line: 1, column: 5 });
        assert!(diagnostics[0].message.starts_with("expected function name"));
    }
}
