use jscal_model::ModelError;
use jscal_rfc::error::RfcError;
use thiserror::Error;

/// iCalendar adapter errors
#[derive(Error, Debug)]
pub enum IcalError {
    #[error("Calendar holds no event or task")]
    EmptyCalendar,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("iCalendar error: {0}")]
    Rfc(#[from] RfcError),

    #[error("Invalid component: {0}")]
    InvalidComponent(String),
}

impl From<jscal_rfc::ical::ParseError> for IcalError {
    fn from(err: jscal_rfc::ical::ParseError) -> Self {
        Self::Rfc(RfcError::from(err))
    }
}

pub type IcalResult<T> = std::result::Result<T, IcalError>;
