use super::Step;
use crate::{Error, Result};

/// Incremental reader over a property path string.
///
/// Steps are parsed on demand, so callers that interleave parsing with type
/// resolution do not need to build a [`PropertyPath`](super::PropertyPath)
/// first.
#[derive(Debug, Clone)]
pub struct PathCursor<'a> {
    source: &'a str,
    pos: usize,
    started: bool,
    step_start: Option<usize>,
}

impl<'a> PathCursor<'a> {
    pub fn new(source: &'a str) -> PathCursor<'a> {
        PathCursor {
            source,
            pos: 0,
            started: false,
            step_start: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.source.len()
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset where the most recently returned step started.
    pub fn step_start(&self) -> Option<usize> {
        self.step_start
    }

    pub fn next_step(&mut self) -> Result<Step> {
        if !self.has_next() {
            return Err(Error::no_more_elements(self.source));
        }

        if self.started {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    if !self.has_next() {
                        return Err(self.invalid(self.pos - 1, "trailing `.`"));
                    }
                }
                Some('[') => {}
                _ => return Err(self.invalid(self.pos, "expected `.` or `[`")),
            }
        }

        self.started = true;
        self.step_start = Some(self.pos);

        match self.peek() {
            Some('[') => {
                self.pos += 1;
                let index = self.digits()?;
                if self.peek() != Some(']') {
                    return Err(self.invalid(self.pos, "expected `]`"));
                }
                self.pos += 1;
                Ok(Step::Index(index))
            }
            Some(c) if c.is_ascii_digit() => Ok(Step::Index(self.digits()?)),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                Ok(Step::Property(self.source[start..self.pos].to_string()))
            }
            Some('.') => Err(self.invalid(self.pos, "empty segment")),
            Some(']') => Err(self.invalid(self.pos, "unmatched `]`")),
            Some(c) => Err(self.invalid(self.pos, format!("unexpected character `{c}`"))),
            None => Err(Error::no_more_elements(self.source)),
        }
    }

    fn digits(&mut self) -> Result<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }

        if start == self.pos {
            return Err(self.invalid(start, "expected index digits"));
        }

        self.source[start..self.pos]
            .parse()
            .map_err(|_| self.invalid(start, "index out of range"))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn invalid(&self, position: usize, reason: impl Into<String>) -> Error {
        Error::invalid_path(self.source, position, reason)
    }
}
