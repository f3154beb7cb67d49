use crate::ast::{Lexeme, Position, Token};
use crate::buffer::{Buffer, CharSource, StringSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Spaces per indentation level.
    pub indent_width: u32,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions { indent_width: 4 }
    }
}

pub struct Lexer<S = StringSource> {
    buffer: Buffer<S>,
    options: LexerOptions,
    /// Indentation level of the current logical line, in units.
    level: u32,
    pending_indents: u32,
    pending_dedents: u32,
    at_line_start: bool,
}

impl Lexer<StringSource> {
    pub fn new(input: &str) -> Self {
        Lexer::from_buffer(Buffer::from_code(input))
    }
}

impl<S: CharSource> Lexer<S> {
    pub fn from_buffer(buffer: Buffer<S>) -> Self {
        Lexer::with_options(buffer, LexerOptions::default())
    }

    pub fn with_options(buffer: Buffer<S>, options: LexerOptions) -> Self {
        Lexer {
            buffer,
            options,
            level: 0,
            pending_indents: 0,
            pending_dedents: 0,
            at_line_start: true,
        }
    }

    pub fn file_name(&self) -> &str {
        self.buffer.file_name()
    }

    fn current_char(&self) -> Option<char> {
        self.buffer.peek()
    }

    fn advance(&mut self) {
        self.buffer.consume();
    }

    fn position(&self) -> Position {
        Position {
            line: self.buffer.line(),
            column: self.buffer.col() + 1,
        }
    }

    fn is_identifier(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '?' | '!' | '-')
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.current_char() {
            self.advance();
        }
    }

    /// Measure the leading spaces of a fresh line and queue the indents or
    /// dedents needed to reach its level. Blank lines leave the level alone.
    fn read_indentation(&mut self) {
        while self.current_char() == Some(' ') {
            self.advance();
        }

        if matches!(self.current_char(), None | Some('\n') | Some('\r')) {
            return;
        }

        let spaces = self.buffer.indent();
        let width = self.options.indent_width.max(1);
        if spaces % width != 0 {
            log::warn!(
                "{}:{}: indentation of {} spaces is not a multiple of {}",
                self.file_name(),
                self.buffer.line(),
                spaces,
                width
            );
        }

        let level = spaces / width;
        if level > self.level {
            self.pending_indents = level - self.level;
        } else {
            self.pending_dedents = self.level - level;
        }
        self.level = level;
    }

    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_identifier(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::keyword(&ident).unwrap_or(Token::Identifier(ident))
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut dots = 0;
        let mut malformed = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
            } else if ch == '.' {
                dots += 1;
                number.push(ch);
            } else if ch.is_alphanumeric() || ch == '_' {
                // 12abc
                malformed = true;
                number.push(ch);
            } else {
                break;
            }
            self.advance();
        }

        // 1.2.3
        if malformed || dots > 1 {
            log::warn!(
                "{}:{}: malformed number `{}`",
                self.file_name(),
                self.buffer.line(),
                number
            );
            return Token::Incorrect(number);
        }

        let token = if dots == 1 {
            number.parse::<f64>().ok().map(Token::Float)
        } else {
            number.parse::<i64>().ok().map(Token::Integer)
        };
        token.unwrap_or(Token::Incorrect(number))
    }

    /// Read `"..."` or `"""..."""`. Quote runs shorter than the closing run are
    /// part of the content.
    fn read_string(&mut self) -> Token {
        self.advance(); // opening quote

        let mut closing = 1;
        if self.current_char() == Some('"') {
            self.advance();
            if self.current_char() != Some('"') {
                return Token::String(String::new());
            }
            self.advance();
            closing = 3;
        }

        let mut content = String::new();
        let mut run = 0;
        loop {
            match self.current_char() {
                None => {
                    log::warn!(
                        "{}:{}: unterminated string",
                        self.file_name(),
                        self.buffer.line()
                    );
                    let quotes = "\"".repeat(closing);
                    return Token::Incorrect(format!("{quotes}{content}"));
                }
                Some('"') => {
                    run += 1;
                    self.advance();
                    if run == closing {
                        break;
                    }
                }
                Some(ch) => {
                    for _ in 0..run {
                        content.push('"');
                    }
                    run = 0;
                    content.push(ch);
                    self.advance();
                }
            }
        }

        if closing == 1 {
            Token::String(content)
        } else {
            Token::Docstring(content)
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.next_lexeme().token
    }

    pub fn next_lexeme(&mut self) -> Lexeme {
        if self.at_line_start {
            self.at_line_start = false;
            self.read_indentation();
        }

        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            return self.make(Token::Dedent, self.position());
        }
        if self.pending_indents > 0 {
            self.pending_indents -= 1;
            return self.make(Token::Indent, self.position());
        }

        self.skip_whitespace();
        let position = self.position();

        let token = match self.current_char() {
            // close every open block before the end of input
            None if self.level > 0 => {
                self.level -= 1;
                Token::Dedent
            }
            None => Token::Eof,
            Some('\n') => {
                self.advance();
                self.at_line_start = true;
                Token::Newline
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some(':') => {
                self.advance();
                Token::Colon
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('-') => {
                self.advance();
                if self.current_char() == Some('>') {
                    self.advance();
                    Token::Arrow
                } else {
                    Token::Symbol('-')
                }
            }
            Some('"') => self.read_string(),
            Some(ch) if ch.is_alphabetic() => self.read_identifier(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                self.advance();
                Token::Symbol(ch)
            }
        };

        self.make(token, position)
    }

    fn make(&self, token: Token, position: Position) -> Lexeme {
        log::trace!("{}:{} {:?}", self.file_name(), position, token);
        Lexeme { token, position }
    }

    /// Drain the whole stream. The last lexeme is always `Eof`.
    pub fn tokenize(&mut self) -> Vec<Lexeme> {
        let mut out = Vec::new();
        loop {
            let lexeme = self.next_lexeme();
            let done = lexeme.token == Token::Eof;
            out.push(lexeme);
            if done {
                return out;
            }
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("def macro struct union define");
    assert_eq!(lexer.next_token(), Token::Def);
    assert_eq!(lexer.next_token(), Token::Macro);
    assert_eq!(lexer.next_token(), Token::Struct);
    assert_eq!(lexer.next_token(), Token::Union);
    assert_eq!(lexer.next_token(), Token::Identifier("define".to_string()));
    assert_eq!(lexer.next_token(), Token::Eof);
}

#[test]
fn test_signature() {
    let mut lexer = Lexer::new("def f(x: f64) -> f64:");
    assert_eq!(lexer.next_token(), Token::Def);
    assert_eq!(lexer.next_token(), Token::Identifier("f".to_string()));
    assert_eq!(lexer.next_token(), Token::LParen);
    assert_eq!(lexer.next_token(), Token::Identifier("x".to_string()));
    assert_eq!(lexer.next_token(), Token::Colon);
    assert_eq!(lexer.next_token(), Token::Identifier("f64".to_string()));
    assert_eq!(lexer.next_token(), Token::RParen);
    assert_eq!(lexer.next_token(), Token::Arrow);
    assert_eq!(lexer.next_token(), Token::Identifier("f64".to_string()));
    assert_eq!(lexer.next_token(), Token::Colon);
    assert_eq!(lexer.next_token(), Token::Eof);
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("a\n  bc");
    let a = lexer.next_lexeme();
    assert_eq!(a.position, Position { line: 1, column: 1 });
    lexer.next_lexeme(); // newline
    let bc = lexer.next_lexeme();
    assert_eq!(bc.token, Token::Identifier("bc".to_string()));
    assert_eq!(bc.position, Position { line: 2, column: 3 });
}
