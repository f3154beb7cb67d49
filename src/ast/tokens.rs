use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Integer(i64),

    /// Float literal, a digit run with exactly one `.`
    ///
    /// # Examples
    /// ```text
    /// 2.0
    /// 3.14
    /// ```
    Float(f64),

    /// Double-quoted string
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// ""
    /// ```
    String(String),

    /// Triple-quoted string
    ///
    /// # Examples
    /// ```text
    /// """Squares its argument"""
    /// ```
    Docstring(String),

    /// Name of a variable, function, type or named operator
    ///
    /// Starts with a letter and continues with letters, digits or `_ ? ! -`.
    ///
    /// # Examples
    /// ```text
    /// x
    /// sqrt
    /// empty?
    /// ```
    Identifier(String),

    // Keywords
    Def,
    Macro,
    Struct,
    Union,

    // Layout
    Newline,
    /// Leading whitespace grew by one indent unit
    Indent,
    /// Leading whitespace shrank by one indent unit
    Dedent,

    // Punctuation
    /// `->`
    Arrow,
    LParen,
    RParen,
    Colon,
    Comma,
    /// Any other single character, operators included
    ///
    /// # Examples
    /// ```text
    /// +
    /// *
    /// ```
    Symbol(char),

    /// Malformed token, carrying the offending text
    ///
    /// # Examples
    /// ```text
    /// 1.2.3
    /// 12abc
    /// ```
    Incorrect(String),

    Eof,
}

impl Token {
    pub fn keyword(ident: &str) -> Option<Token> {
        match ident {
            "def" => Some(Token::Def),
            "macro" => Some(Token::Macro),
            "struct" => Some(Token::Struct),
            "union" => Some(Token::Union),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Integer(_) => "int",
            Token::Float(_) => "float",
            Token::String(_) => "string",
            Token::Docstring(_) => "docstring",
            Token::Identifier(_) => "identifier",
            Token::Def => "def",
            Token::Macro => "macro",
            Token::Struct => "struct",
            Token::Union => "union",
            Token::Newline => "newline",
            Token::Indent => "indent",
            Token::Dedent => "dedent",
            Token::Arrow => "arrow",
            Token::LParen | Token::RParen | Token::Colon | Token::Comma | Token::Symbol(_) => {
                "symbol"
            }
            Token::Incorrect(_) => "incorrect",
            Token::Eof => "eof",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n:?}"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Docstring(s) => write!(f, "\"\"\"{s}\"\"\""),
            Token::Identifier(s) | Token::Incorrect(s) => f.write_str(s),
            Token::Def => f.write_str("def"),
            Token::Macro => f.write_str("macro"),
            Token::Struct => f.write_str("struct"),
            Token::Union => f.write_str("union"),
            Token::Newline => f.write_str("\\n"),
            Token::Indent => f.write_str("<indent>"),
            Token::Dedent => f.write_str("<dedent>"),
            Token::Arrow => f.write_str("->"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Colon => f.write_str(":"),
            Token::Comma => f.write_str(","),
            Token::Symbol(c) => write!(f, "{c}"),
            Token::Eof => f.write_str("<eof>"),
        }
    }
}

/// Where a token starts. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub position: Position,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}:{:<4} {:<10} {}",
            self.position.line,
            self.position.column,
            self.token.kind_name(),
            self.token
        )
    }
}
