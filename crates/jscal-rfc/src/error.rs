use thiserror::Error;

use crate::ical::parse::ParseError;

/// iCalendar library errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
