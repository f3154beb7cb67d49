//! Character buffers feeding the lexer.
//!
//! A [`Buffer`] wraps a [`CharSource`] and keeps the bookkeeping the lexer needs:
//! current line and column, and how many leading spaces the current line has seen
//! so far. Three sources are provided:
//!
//! - [`FileSource`]: reads the whole file into memory when it is opened
//! - [`StringSource`]: in-memory code, can be reset or reloaded (handy in tests)
//! - [`ConsoleSource`]: interactive input read line by line from any `BufRead`

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while building a buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The file could not be opened or read.
    #[error("FileError: cannot read `{}`: {source}", path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Anything that can hand out characters one at a time.
pub trait CharSource {
    /// Next character, `None` once the source is exhausted.
    fn next_char(&mut self) -> Option<char>;

    /// Name used in diagnostics.
    fn file_name(&self) -> &str;
}

/// A peekable character stream that tracks line, column and indentation.
#[derive(Debug)]
pub struct Buffer<S> {
    source: S,
    next: Option<char>,
    line: u32,
    col: u32,
    indent: u32,
    empty_line: bool,
}

impl<S: CharSource> Buffer<S> {
    pub fn new(mut source: S) -> Self {
        let next = source.next_char();
        Buffer {
            source,
            next,
            line: 1,
            col: 0,
            indent: 0,
            empty_line: true,
        }
    }

    /// The character under the cursor, `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.next
    }

    /// Advance exactly one character.
    pub fn consume(&mut self) {
        let Some(c) = self.next else {
            return;
        };

        self.col += 1;

        match c {
            '\n' => {
                self.line += 1;
                self.col = 0;
                self.indent = 0;
                self.empty_line = true;
            }
            ' ' => {
                if self.empty_line {
                    self.indent += 1;
                }
            }
            _ => self.empty_line = false,
        }

        self.next = self.source.next_char();
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    /// Leading spaces consumed on the current line.
    pub fn indent(&self) -> u32 {
        self.indent
    }

    /// True until the first non-space character of the current line is consumed.
    pub fn empty_line(&self) -> bool {
        self.empty_line
    }

    pub fn file_name(&self) -> &str {
        self.source.file_name()
    }

    fn rewind(&mut self) {
        self.next = self.source.next_char();
        self.line = 1;
        self.col = 0;
        self.indent = 0;
        self.empty_line = true;
    }
}

/// Source reading a whole file up front.
#[derive(Debug)]
pub struct FileSource {
    name: String,
    data: Vec<char>,
    pos: usize,
}

impl CharSource for FileSource {
    fn next_char(&mut self) -> Option<char> {
        let c = self.data.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn file_name(&self) -> &str {
        &self.name
    }
}

pub type FileBuffer = Buffer<FileSource>;

impl Buffer<FileSource> {
    /// Open and fully read `path`.
    ///
    /// A missing or unreadable file is a [`BufferError::FileError`], never an empty buffer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BufferError::FileError {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("read {} bytes from {}", content.len(), path.display());

        Ok(Buffer::new(FileSource {
            name: path.display().to_string(),
            data: content.chars().collect(),
            pos: 0,
        }))
    }
}

/// In-memory source.
#[derive(Debug, Clone)]
pub struct StringSource {
    code: Vec<char>,
    pos: usize,
}

impl CharSource for StringSource {
    fn next_char(&mut self) -> Option<char> {
        let c = self.code.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn file_name(&self) -> &str {
        "<string>"
    }
}

pub type StringBuffer = Buffer<StringSource>;

impl Buffer<StringSource> {
    pub fn from_code(code: &str) -> Self {
        Buffer::new(StringSource {
            code: code.chars().collect(),
            pos: 0,
        })
    }

    /// Restart from the first character.
    pub fn reset(&mut self) {
        self.source.pos = 0;
        self.rewind();
    }

    /// Replace the code and restart.
    pub fn load_code(&mut self, code: &str) {
        self.source.code = code.chars().collect();
        self.reset();
    }

    /// Consume everything that is left.
    pub fn read_all(&mut self) {
        while self.peek().is_some() {
            self.consume();
        }
    }
}

/// Interactive source, pulls one line at a time from a reader.
#[derive(Debug)]
pub struct ConsoleSource<R> {
    reader: R,
    pending: VecDeque<char>,
}

impl<R: BufRead> ConsoleSource<R> {
    pub fn new(reader: R) -> Self {
        ConsoleSource {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> CharSource for ConsoleSource<R> {
    fn next_char(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self.pending.extend(line.chars()),
                Err(e) => {
                    log::error!("console read failed: {e}");
                    return None;
                }
            }
        }
        self.pending.pop_front()
    }

    fn file_name(&self) -> &str {
        "<console>"
    }
}

pub type ConsoleBuffer<R> = Buffer<ConsoleSource<R>>;

impl Buffer<ConsoleSource<StdinLock<'static>>> {
    pub fn stdin() -> Self {
        Buffer::new(ConsoleSource::new(io::stdin().lock()))
    }
}
