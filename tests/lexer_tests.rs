// tests/lexer_tests.rs

use fern_lang::ast::{Position, Token};
use fern_lang::buffer::StringBuffer;
use fern_lang::lexer::{Lexer, LexerOptions};
use pretty_assertions::assert_eq;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input)
        .tokenize()
        .into_iter()
        .map(|lexeme| lexeme.token)
        .collect()
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

// ============================================================================
// Punctuation and Symbols
// ============================================================================

#[test]
fn test_punctuation() {
    assert_eq!(
        tokens("( ) : ,"),
        vec![
            Token::LParen,
            Token::RParen,
            Token::Colon,
            Token::Comma,
            Token::Eof
        ]
    );
}

#[test]
fn test_arrow_and_minus() {
    assert_eq!(
        tokens("a - b -> c"),
        vec![
            ident("a"),
            Token::Symbol('-'),
            ident("b"),
            Token::Arrow,
            ident("c"),
            Token::Eof
        ]
    );
}

#[test]
fn test_operator_symbols() {
    assert_eq!(
        tokens("1 + 2 * 3"),
        vec![
            Token::Integer(1),
            Token::Symbol('+'),
            Token::Integer(2),
            Token::Symbol('*'),
            Token::Integer(3),
            Token::Eof
        ]
    );
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifier_characters() {
    assert_eq!(
        tokens("empty? set! x-1 snake_case"),
        vec![
            ident("empty?"),
            ident("set!"),
            ident("x-1"),
            ident("snake_case"),
            Token::Eof
        ]
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("12 3.5 0.25"),
        vec![
            Token::Integer(12),
            Token::Float(3.5),
            Token::Float(0.25),
            Token::Eof
        ]
    );
}

#[test]
fn test_incorrect_numbers() {
    assert_eq!(
        tokens("1.2.3 12abc"),
        vec![
            Token::Incorrect("1.2.3".to_string()),
            Token::Incorrect("12abc".to_string()),
            Token::Eof
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_strings() {
    assert_eq!(
        tokens(r#""" "abc""#),
        vec![
            Token::String(String::new()),
            Token::String("abc".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_docstring_keeps_inner_quotes() {
    assert_eq!(
        tokens(r#""""doc "quoted" text""""#),
        vec![
            Token::Docstring(r#"doc "quoted" text"#.to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        tokens(r#""abc"#),
        vec![Token::Incorrect(r#""abc"#.to_string()), Token::Eof]
    );
}

// ============================================================================
// Indentation
// ============================================================================

#[test]
fn test_indent_and_dedent() {
    assert_eq!(
        tokens("def f():\n    x\ny"),
        vec![
            Token::Def,
            ident("f"),
            Token::LParen,
            Token::RParen,
            Token::Colon,
            Token::Newline,
            Token::Indent,
            ident("x"),
            Token::Newline,
            Token::Dedent,
            ident("y"),
            Token::Eof
        ]
    );
}

#[test]
fn test_one_dedent_per_level() {
    assert_eq!(
        tokens("a\n    b\n        c\nd"),
        vec![
            ident("a"),
            Token::Newline,
            Token::Indent,
            ident("b"),
            Token::Newline,
            Token::Indent,
            ident("c"),
            Token::Newline,
            Token::Dedent,
            Token::Dedent,
            ident("d"),
            Token::Eof
        ]
    );
}

#[test]
fn test_three_levels_close_at_once() {
    let tokens = tokens("a\n    b\n        c\n            d\ne");
    let dedents = tokens.iter().filter(|t| **t == Token::Dedent).count();
    let indents = tokens.iter().filter(|t| **t == Token::Indent).count();

    assert_eq!(indents, 3);
    assert_eq!(dedents, 3);
    assert_eq!(
        &tokens[tokens.len() - 5..],
        &[
            Token::Dedent,
            Token::Dedent,
            Token::Dedent,
            ident("e"),
            Token::Eof
        ]
    );
}

#[test]
fn test_end_of_input_closes_blocks() {
    assert_eq!(
        tokens("a\n    b"),
        vec![
            ident("a"),
            Token::Newline,
            Token::Indent,
            ident("b"),
            Token::Dedent,
            Token::Eof
        ]
    );
}

#[test]
fn test_blank_lines_keep_level() {
    assert_eq!(
        tokens("a\n\n   \nb"),
        vec![
            ident("a"),
            Token::Newline,
            Token::Newline,
            Token::Newline,
            ident("b"),
            Token::Eof
        ]
    );
}

#[test]
fn test_indent_width_option() {
    let buffer = StringBuffer::from_code("a\n  b");
    let mut lexer = Lexer::with_options(buffer, LexerOptions { indent_width: 2 });

    let tokens: Vec<Token> = lexer.tokenize().into_iter().map(|l| l.token).collect();
    assert_eq!(
        tokens,
        vec![
            ident("a"),
            Token::Newline,
            Token::Indent,
            ident("b"),
            Token::Dedent,
            Token::Eof
        ]
    );
}

#[test]
fn test_partial_indent_is_ignored() {
    // two spaces is less than one level at the default width
    assert_eq!(
        tokens("a\n  b"),
        vec![ident("a"), Token::Newline, ident("b"), Token::Eof]
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_lexeme_positions() {
    let lexemes = Lexer::new("def f:\n    x").tokenize();

    assert_eq!(lexemes[0].position, Position { line: 1, column: 1 });
    assert_eq!(lexemes[1].position, Position { line: 1, column: 5 });
    // Indent, then x
    assert_eq!(lexemes[4].token, Token::Indent);
    assert_eq!(lexemes[5].token, ident("x"));
    assert_eq!(lexemes[5].position, Position { line: 2, column: 5 });
}

#[test]
fn test_tokenize_ends_with_eof() {
    let lexemes = Lexer::new("").tokenize();
    assert_eq!(lexemes.len(), 1);
    assert_eq!(lexemes[0].token, Token::Eof);
}
