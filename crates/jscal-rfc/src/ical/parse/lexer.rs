//! Content line lexer (RFC 5545 §3.1).
//!
//! Splits a document into unfolded logical lines and tokenizes each line
//! into name, parameters and raw value.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::ical::core::{ContentLine, Parameter};

/// Splits input into logical lines, joining folded continuations.
///
/// Accepts CRLF and bare LF. A line starting with SPACE or HTAB continues
/// the previous one; the fold is removed without inserting whitespace.
/// Blank lines are dropped. Line numbers are 1-based and refer to the first
/// physical line of each logical line.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (idx, physical) in input.lines().enumerate() {
        let physical = physical.trim_end_matches('\r');
        if physical.is_empty() {
            continue;
        }
        match physical.strip_prefix([' ', '\t']) {
            Some(continuation) => match lines.last_mut() {
                Some((_, prev)) => prev.push_str(continuation),
                None => lines.push((idx + 1, continuation.to_string())),
            },
            None => lines.push((idx + 1, physical.to_string())),
        }
    }

    lines
}

struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    line_num: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.line_num, self.pos + 1)
    }

    /// Consumes an iana-token / x-name.
    fn name(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            self.pos += 1;
        }
        &self.line[start..self.pos]
    }

    fn param_value(&mut self) -> ParseResult<String> {
        if self.peek() != Some('"') {
            let start = self.pos;
            while self.peek().is_some_and(|c| !matches!(c, ',' | ';' | ':')) {
                self.bump();
            }
            return Ok(self.line[start..self.pos].to_string());
        }

        let open = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                // RFC 6868 caret encoding
                Some('^') => match self.peek() {
                    Some('^') => {
                        self.bump();
                        value.push('^');
                    }
                    Some('n') => {
                        self.bump();
                        value.push('\n');
                    }
                    Some('\'') => {
                        self.bump();
                        value.push('"');
                    }
                    _ => value.push('^'),
                },
                Some(c) => value.push(c),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedQuote,
                        self.line_num,
                        open + 1,
                    ));
                }
            }
        }
    }

    fn parameter(&mut self) -> ParseResult<Parameter> {
        let name = self.name();
        if name.is_empty() || self.bump() != Some('=') {
            return Err(self.error(ParseErrorKind::InvalidParameter));
        }
        let mut values = vec![self.param_value()?];
        while self.peek() == Some(',') {
            self.bump();
            values.push(self.param_value()?);
        }
        Ok(Parameter::with_values(name, values))
    }
}

/// Parses one logical line: `name *(";" param) ":" value`.
///
/// ## Errors
/// Returns an error for a missing name, a malformed parameter, an unclosed
/// quoted parameter value or a missing colon.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut cursor = Cursor {
        line,
        pos: 0,
        line_num,
    };

    let name = cursor.name();
    if name.is_empty() {
        return Err(cursor.error(ParseErrorKind::MissingPropertyName));
    }

    let mut params = Vec::new();
    loop {
        match cursor.bump() {
            Some(';') => params.push(cursor.parameter()?),
            Some(':') => break,
            Some(_) => return Err(cursor.error(ParseErrorKind::InvalidContentLine)),
            None => return Err(cursor.error(ParseErrorKind::MissingColon)),
        }
    }

    Ok(ContentLine::new(name, params, &line[cursor.pos..]))
}
