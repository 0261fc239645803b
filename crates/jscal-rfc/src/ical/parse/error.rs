//! iCalendar parse errors.

use std::fmt;

/// Result type for iCalendar parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse failure with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.kind, self.line, self.column)?;
        if let Some(ctx) = &self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("invalid content line format")]
    InvalidContentLine,
    #[error("missing property name")]
    MissingPropertyName,
    #[error("missing colon separator")]
    MissingColon,
    #[error("invalid parameter format")]
    InvalidParameter,
    #[error("unclosed quoted string")]
    UnclosedQuote,
    #[error("invalid date format")]
    InvalidDate,
    #[error("invalid date-time format")]
    InvalidDateTime,
    #[error("invalid duration format")]
    InvalidDuration,
    #[error("invalid recurrence rule")]
    InvalidRRule,
    #[error("invalid UTC offset format")]
    InvalidUtcOffset,
    #[error("missing BEGIN line")]
    MissingBegin,
    #[error("missing END line")]
    MissingEnd,
    #[error("mismatched BEGIN/END")]
    MismatchedComponent,
    #[error("invalid boolean value")]
    InvalidBoolean,
    #[error("invalid integer value")]
    InvalidInteger,
    #[error("invalid float value")]
    InvalidFloat,
    #[error("invalid period format")]
    InvalidPeriod,
    #[error("invalid frequency")]
    InvalidFrequency,
    #[error("invalid weekday")]
    InvalidWeekday,
    #[error("UNTIL and COUNT are mutually exclusive")]
    UntilCountConflict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position_and_context() {
        let err = ParseError::new(ParseErrorKind::MissingEnd, 12, 1).with_context("missing END:VEVENT");
        assert_eq!(
            err.to_string(),
            "missing END line at line 12, column 1: missing END:VEVENT"
        );
    }

    #[test]
    fn display_without_context() {
        let err = ParseError::new(ParseErrorKind::InvalidDate, 3, 9);
        assert_eq!(err.to_string(), "invalid date format at line 3, column 9");
    }
}
