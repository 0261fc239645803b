//! Property parameters (RFC 5545 §3.2).

/// A single property parameter, e.g. `TZID=America/New_York`.
///
/// Multi-valued parameters such as MEMBER keep each comma-separated value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    pub values: Vec<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    #[must_use]
    pub fn tzid(tzid: impl Into<String>) -> Self {
        Self::new(names::TZID, tzid)
    }

    #[must_use]
    pub fn value_type(value_type: impl Into<String>) -> Self {
        Self::new(names::VALUE, value_type)
    }

    #[must_use]
    pub fn language(lang: impl Into<String>) -> Self {
        Self::new(names::LANGUAGE, lang)
    }

    #[must_use]
    pub fn cn(name: impl Into<String>) -> Self {
        Self::new(names::CN, name)
    }

    /// Object identifier carried alongside a property.
    #[must_use]
    pub fn jsid(id: impl Into<String>) -> Self {
        Self::new(names::X_JSID, id)
    }
}

/// Parameter names used by the conversion layers.
pub mod names {
    pub const ALTREP: &str = "ALTREP";
    pub const CN: &str = "CN";
    pub const CUTYPE: &str = "CUTYPE";
    pub const DELEGATED_FROM: &str = "DELEGATED-FROM";
    pub const DELEGATED_TO: &str = "DELEGATED-TO";
    pub const DISPLAY: &str = "DISPLAY";
    pub const EMAIL: &str = "EMAIL";
    pub const FEATURE: &str = "FEATURE";
    pub const FMTTYPE: &str = "FMTTYPE";
    pub const LABEL: &str = "LABEL";
    pub const LANGUAGE: &str = "LANGUAGE";
    pub const MEMBER: &str = "MEMBER";
    pub const PARTSTAT: &str = "PARTSTAT";
    pub const RANGE: &str = "RANGE";
    pub const REL: &str = "REL";
    pub const RELATED: &str = "RELATED";
    pub const RELTYPE: &str = "RELTYPE";
    pub const ROLE: &str = "ROLE";
    pub const RSVP: &str = "RSVP";
    pub const SENT_BY: &str = "SENT-BY";
    pub const SIZE: &str = "SIZE";
    pub const TZID: &str = "TZID";
    pub const VALUE: &str = "VALUE";
    /// Identifier of the object a property was generated from.
    pub const X_JSID: &str = "X-JSID";
    pub const X_TITLE: &str = "X-TITLE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_normalized() {
        let param = Parameter::new("tzid", "Europe/London");
        assert_eq!(param.name, "TZID");
        assert_eq!(param.value(), Some("Europe/London"));
    }

    #[test]
    fn has_value_ignores_case() {
        let param = Parameter::with_values("ROLE", vec!["CHAIR".into(), "req-participant".into()]);
        assert!(param.has_value("REQ-PARTICIPANT"));
        assert!(!param.has_value("OPT-PARTICIPANT"));
    }

    #[test]
    fn jsid_builder() {
        assert_eq!(Parameter::jsid("a1").name, "X-JSID");
    }
}
