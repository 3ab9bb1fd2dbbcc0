//! Line reader and bracket scanners shared by the loaders
//!
//! Lines are read into growing buffers, so a matrix row is never cut at a
//! buffer boundary. A bracketed region may continue over several physical
//! lines; [`BracketBlock::collect`] keeps appending lines until it has seen
//! the opening `'['` and a later `']'`.

use std::io::{self, BufRead};
use thiserror::Error;

/// Structural errors found while scanning brackets and rows
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("missing '['")]
    MissingOpenBracket,

    #[error("']' appears before '['")]
    SwappedBrackets,

    #[error("'[' is never closed")]
    UnclosedBracket,

    #[error("')' without matching '('")]
    UnmatchedRowClose,

    #[error("'(' inside an open row")]
    NestedRowOpen,

    #[error("unexpected '{0}' outside a row")]
    StrayText(char),

    #[error("'(' is never closed")]
    UnclosedRow,
}

/// One physical line, including its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    pub text: String,
}

impl Line {
    /// Text without the trailing `\n` or `\r\n`
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(|c| c == '\n' || c == '\r')
    }
}

/// Reads lines of arbitrary length and counts them
pub struct LineReader<R> {
    inner: R,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, number: 0 }
    }

    /// Next line, or `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD, so a stray byte only
    /// matters when it sits inside a directive.
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        let mut bytes = Vec::new();
        if self.inner.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        self.number += 1;
        Ok(Some(Line {
            number: self.number,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }))
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> usize {
        self.number
    }
}

/// Returns the text after `keyword` when `line` is that directive.
///
/// The keyword must be followed by whitespace or the end of the line, so
/// `#circ X` and `#circ` match but `#circuit` does not.
pub fn directive_rest<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BracketState {
    SeekOpenBracket,
    SeekCloseBracket,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    SeekRowOpen,
    SeekRowClose,
}

/// A directive together with its complete `[...]` region
#[derive(Debug, Clone)]
pub struct BracketBlock {
    text: String,
    open: usize,
    close: usize,
    first_line: usize,
    last_line: usize,
}

impl BracketBlock {
    /// Collects `first` and as many following lines as needed to close the
    /// bracketed region.
    pub fn collect<R: BufRead>(
        first: Line,
        reader: &mut LineReader<R>,
    ) -> Result<Self, ScanError> {
        let first_line = first.number;
        let mut last_line = first.number;
        let mut text = first.text;
        let mut state = BracketState::SeekOpenBracket;
        let mut open = 0;
        let mut close = 0;
        let mut cursor = 0;

        loop {
            for (offset, ch) in text[cursor..].char_indices() {
                let pos = cursor + offset;
                match (state, ch) {
                    (BracketState::SeekOpenBracket, '[') => {
                        open = pos;
                        state = BracketState::SeekCloseBracket;
                    }
                    (BracketState::SeekOpenBracket, ']') => {
                        return Err(ScanError::SwappedBrackets);
                    }
                    (BracketState::SeekCloseBracket, ']') => {
                        close = pos;
                        state = BracketState::Done;
                        break;
                    }
                    _ => {}
                }
            }

            if state == BracketState::Done {
                break;
            }

            cursor = text.len();
            match reader.next_line()? {
                Some(line) => {
                    last_line = line.number;
                    text.push_str(&line.text);
                }
                None if state == BracketState::SeekOpenBracket => {
                    return Err(ScanError::MissingOpenBracket);
                }
                None => return Err(ScanError::UnclosedBracket),
            }
        }

        Ok(Self {
            text,
            open,
            close,
            first_line,
            last_line,
        })
    }

    /// Text before the opening bracket
    pub fn head(&self) -> &str {
        &self.text[..self.open]
    }

    /// Text strictly between the brackets
    pub fn body(&self) -> &str {
        &self.text[self.open + 1..self.close]
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn last_line(&self) -> usize {
        self.last_line
    }
}

/// Splits a bracket body into the contents of its `( ... )` groups.
///
/// Only whitespace may appear between groups.
pub fn split_rows(body: &str) -> Result<Vec<&str>, ScanError> {
    let mut rows = Vec::new();
    let mut state = RowState::SeekRowOpen;
    let mut start = 0;

    for (pos, ch) in body.char_indices() {
        match (state, ch) {
            (RowState::SeekRowOpen, '(') => {
                start = pos + 1;
                state = RowState::SeekRowClose;
            }
            (RowState::SeekRowOpen, ')') => return Err(ScanError::UnmatchedRowClose),
            (RowState::SeekRowOpen, c) if c.is_whitespace() => {}
            (RowState::SeekRowOpen, c) => return Err(ScanError::StrayText(c)),
            (RowState::SeekRowClose, ')') => {
                rows.push(&body[start..pos]);
                state = RowState::SeekRowOpen;
            }
            (RowState::SeekRowClose, '(') => return Err(ScanError::NestedRowOpen),
            (RowState::SeekRowClose, _) => {}
        }
    }

    match state {
        RowState::SeekRowClose => Err(ScanError::UnclosedRow),
        RowState::SeekRowOpen => Ok(rows),
    }
}

/// Comma-separated, trimmed elements; a blank body has none.
pub fn split_elements(body: &str) -> Vec<&str> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    body.split(',').map(str::trim).collect()
}
