use std::fmt;

use thiserror::Error;

/// One of the cross-field rules a recurrence rule must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceConstraint {
    /// `byWeekNo` requires a yearly frequency.
    ByWeekNoRequiresYearly,
    /// `byDay` entries with `nthOfPeriod` require a monthly or yearly frequency.
    NthDayRequiresMonthlyOrYearly,
    /// Yearly rules with `byWeekNo` only accept plain weekdays in `byDay`.
    NthDayWithByWeekNo,
    /// `byMonthDay` is not allowed on weekly rules.
    ByMonthDayWithWeekly,
    /// `byYearDay` is not allowed on daily, weekly or monthly rules.
    ByYearDayWithFrequency,
    /// `count` and `until` are mutually exclusive.
    CountAndUntil,
}

impl RecurrenceConstraint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByWeekNoRequiresYearly => "byWeekNo is only allowed with a yearly frequency",
            Self::NthDayRequiresMonthlyOrYearly => {
                "byDay with nthOfPeriod is only allowed with a monthly or yearly frequency"
            }
            Self::NthDayWithByWeekNo => {
                "byDay must not carry nthOfPeriod when a yearly rule has byWeekNo"
            }
            Self::ByMonthDayWithWeekly => "byMonthDay is not allowed with a weekly frequency",
            Self::ByYearDayWithFrequency => {
                "byYearDay is not allowed with a daily, weekly or monthly frequency"
            }
            Self::CountAndUntil => "count and until are mutually exclusive",
        }
    }
}

impl fmt::Display for RecurrenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the model, its codecs and the JSON adapter.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid temporal input: {0}")]
    InvalidTemporalInput(String),

    #[error("Recurrence constraint violated: {0}")]
    RecurrenceConstraintViolation(RecurrenceConstraint),

    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Parse error ({code}): {message}")]
    ParseError { code: &'static str, message: String },

    #[error("Encode error ({code}): {message}")]
    EncodeError { code: &'static str, message: String },
}

impl ModelError {
    /// Stable machine-readable code of the error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidTemporalInput(_) => "model.invalid_temporal_input",
            Self::RecurrenceConstraintViolation(_) => "model.recurrence_constraint",
            Self::UnknownObjectType(_) => "model.unknown_object_type",
            Self::InvalidArgument(_) => "model.invalid_argument",
            Self::InvalidPatch(_) => "model.invalid_patch",
            Self::ParseError { code, .. } | Self::EncodeError { code, .. } => code,
        }
    }

    pub(crate) fn temporal(input: impl fmt::Display) -> Self {
        Self::InvalidTemporalInput(input.to_string())
    }
}

impl From<RecurrenceConstraint> for ModelError {
    fn from(constraint: RecurrenceConstraint) -> Self {
        Self::RecurrenceConstraintViolation(constraint)
    }
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            ModelError::UnknownObjectType("Foo".into()).code(),
            "model.unknown_object_type"
        );
        let err = ModelError::ParseError {
            code: "json.parse",
            message: "eof".into(),
        };
        assert_eq!(err.code(), "json.parse");
        assert_eq!(err.to_string(), "Parse error (json.parse): eof");
    }

    #[test]
    fn constraint_message() {
        let err = ModelError::from(RecurrenceConstraint::ByMonthDayWithWeekly);
        assert!(err.to_string().contains("byMonthDay"));
    }
}
