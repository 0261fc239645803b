//! Content lines and properties (RFC 5545 §3.1, §3.8).

use super::{Date, DateOrDateTime, DateTime, Duration, Parameter, RRule, UtcOffset, Value};

/// A raw content line before value type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    pub params: Vec<Parameter>,
    /// Value after unfolding, before unescaping.
    pub raw_value: String,
}

impl ContentLine {
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            raw_value: value.into(),
        }
    }

    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        find_param(&self.params, name)?.value()
    }

    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.get_param_value("VALUE")
    }

    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }
}

fn find_param<'a>(params: &'a [Parameter], name: &str) -> Option<&'a Parameter> {
    params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// A parsed property: typed value plus the raw text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    pub params: Vec<Parameter>,
    pub value: Value,
    /// Raw value text; written verbatim for non-text values.
    pub raw_value: String,
}

impl Property {
    fn build(name: impl Into<String>, value: Value, raw_value: String) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value,
            raw_value,
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let text = value.into();
        Self::build(name, Value::Text(text.clone()), text)
    }

    /// TEXT-LIST property such as CATEGORIES.
    #[must_use]
    pub fn text_list(name: impl Into<String>, values: Vec<String>) -> Self {
        let raw = values.join(",");
        Self::build(name, Value::TextList(values), raw)
    }

    #[must_use]
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self::build(name, Value::Integer(value), value.to_string())
    }

    /// DATE-TIME property; a zoned value gets its TZID parameter.
    #[must_use]
    pub fn datetime(name: impl Into<String>, dt: DateTime) -> Self {
        let raw = dt.to_string();
        let tzid = dt.tzid().map(Parameter::tzid);
        let mut prop = Self::build(name, Value::DateTime(dt), raw);
        prop.params.extend(tzid);
        prop
    }

    /// DATE property (`VALUE=DATE`).
    #[must_use]
    pub fn date(name: impl Into<String>, d: Date) -> Self {
        let raw = d.to_string();
        Self::build(name, Value::Date(d), raw).with_param(Parameter::value_type("DATE"))
    }

    #[must_use]
    pub fn date_or_datetime(name: impl Into<String>, value: DateOrDateTime) -> Self {
        match value {
            DateOrDateTime::Date(d) => Self::date(name, d),
            DateOrDateTime::DateTime(dt) => Self::datetime(name, dt),
        }
    }

    /// Multi-valued date property (EXDATE, RDATE). Every entry must share
    /// the form of the first one; returns `None` for an empty list or when
    /// DATE and DATE-TIME entries are mixed.
    #[must_use]
    pub fn date_list(name: impl Into<String>, values: Vec<DateOrDateTime>) -> Option<Self> {
        let first = values.first()?;
        let raw = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        if first.is_date() {
            let dates = values
                .into_iter()
                .map(|v| match v {
                    DateOrDateTime::Date(d) => Some(d),
                    DateOrDateTime::DateTime(_) => None,
                })
                .collect::<Option<Vec<_>>>()?;
            return Some(
                Self::build(name, Value::DateList(dates), raw)
                    .with_param(Parameter::value_type("DATE")),
            );
        }
        let tzid = first.tzid().map(Parameter::tzid);
        let datetimes = values
            .into_iter()
            .map(|v| match v {
                DateOrDateTime::DateTime(dt) => Some(dt),
                DateOrDateTime::Date(_) => None,
            })
            .collect::<Option<Vec<_>>>()?;
        let mut prop = Self::build(name, Value::DateTimeList(datetimes), raw);
        prop.params.extend(tzid);
        Some(prop)
    }

    #[must_use]
    pub fn duration(name: impl Into<String>, d: Duration) -> Self {
        let raw = d.to_string();
        Self::build(name, Value::Duration(d), raw)
    }

    #[must_use]
    pub fn uri(name: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self::build(name, Value::Uri(uri.clone()), uri)
    }

    #[must_use]
    pub fn cal_address(name: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self::build(name, Value::CalAddress(address.clone()), address)
    }

    #[must_use]
    pub fn recur(name: impl Into<String>, rule: RRule) -> Self {
        let raw = rule.to_string();
        Self::build(name, Value::Recur(Box::new(rule)), raw)
    }

    #[must_use]
    pub fn utc_offset(name: impl Into<String>, offset: UtcOffset) -> Self {
        Self::build(name, Value::UtcOffset(offset), offset.to_string())
    }

    /// Property whose value is written exactly as given (e.g. GEO).
    #[must_use]
    pub fn raw(name: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::build(name, Value::Unknown(raw.clone()), raw)
    }

    /// Creates a property from a content line with an unparsed value.
    #[must_use]
    pub fn from_content_line(cl: ContentLine) -> Self {
        Self {
            name: cl.name,
            params: cl.params,
            value: Value::Unknown(cl.raw_value.clone()),
            raw_value: cl.raw_value,
        }
    }

    /// Builder form of [`Property::set_param`].
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.set_param(param);
        self
    }

    /// Builder that sets the parameter only when a value is given.
    #[must_use]
    pub fn with_opt_param(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.with_param(Parameter::new(name, v)),
            None => self,
        }
    }

    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        find_param(&self.params, name)
    }

    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    pub fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    /// Sets a parameter, replacing any existing one with the same name.
    pub fn set_param(&mut self, param: Parameter) {
        self.params.retain(|p| p.name != param.name);
        self.params.push(param);
    }

    /// Returns the object identifier carried in `X-JSID`.
    #[must_use]
    pub fn jsid(&self) -> Option<&str> {
        self.get_param_value(super::parameter::names::X_JSID)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// URI-like value; falls back to the raw text for untyped values.
    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        self.value.as_uri().or(match &self.value {
            Value::Text(s) | Value::Unknown(s) => Some(s.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        self.value.as_integer()
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        self.value.as_datetime()
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&Date> {
        self.value.as_date()
    }

    #[must_use]
    pub fn as_duration(&self) -> Option<&Duration> {
        self.value.as_duration()
    }

    #[must_use]
    pub fn as_recur(&self) -> Option<&RRule> {
        self.value.as_recur()
    }

    /// Single DATE or DATE-TIME value.
    #[must_use]
    pub fn as_date_or_datetime(&self) -> Option<DateOrDateTime> {
        match &self.value {
            Value::Date(d) => Some(DateOrDateTime::Date(*d)),
            Value::DateTime(dt) => Some(DateOrDateTime::DateTime(dt.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn date_values(&self) -> Vec<DateOrDateTime> {
        self.value.date_values()
    }

    #[must_use]
    pub fn text_values(&self) -> Vec<&str> {
        self.value.text_values()
    }
}

/// Property names used by the conversion layers.
pub mod names {
    // Calendar properties
    pub const CALSCALE: &str = "CALSCALE";
    pub const METHOD: &str = "METHOD";
    pub const PRODID: &str = "PRODID";
    pub const VERSION: &str = "VERSION";

    // Descriptive
    pub const CATEGORIES: &str = "CATEGORIES";
    pub const CLASS: &str = "CLASS";
    pub const COLOR: &str = "COLOR";
    pub const CONCEPT: &str = "CONCEPT";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const GEO: &str = "GEO";
    pub const LOCATION: &str = "LOCATION";
    pub const PERCENT_COMPLETE: &str = "PERCENT-COMPLETE";
    pub const PRIORITY: &str = "PRIORITY";
    pub const STATUS: &str = "STATUS";
    pub const STYLED_DESCRIPTION: &str = "STYLED-DESCRIPTION";
    pub const SUMMARY: &str = "SUMMARY";

    // Date and time
    pub const COMPLETED: &str = "COMPLETED";
    pub const DTEND: &str = "DTEND";
    pub const DTSTART: &str = "DTSTART";
    pub const DUE: &str = "DUE";
    pub const DURATION: &str = "DURATION";
    pub const ESTIMATED_DURATION: &str = "ESTIMATED-DURATION";
    pub const TRANSP: &str = "TRANSP";

    // Time zones
    pub const LAST_MODIFIED: &str = "LAST-MODIFIED";
    pub const TZID: &str = "TZID";
    pub const TZID_ALIAS_OF: &str = "TZID-ALIAS-OF";
    pub const TZNAME: &str = "TZNAME";
    pub const TZOFFSETFROM: &str = "TZOFFSETFROM";
    pub const TZOFFSETTO: &str = "TZOFFSETTO";
    pub const TZUNTIL: &str = "TZUNTIL";
    pub const TZURL: &str = "TZURL";
    pub const COMMENT: &str = "COMMENT";

    // Relationships
    pub const ATTENDEE: &str = "ATTENDEE";
    pub const LINK: &str = "LINK";
    pub const ORGANIZER: &str = "ORGANIZER";
    pub const RECURRENCE_ID: &str = "RECURRENCE-ID";
    pub const RELATED_TO: &str = "RELATED-TO";
    pub const UID: &str = "UID";

    // Recurrence
    pub const EXDATE: &str = "EXDATE";
    pub const EXRULE: &str = "EXRULE";
    pub const RDATE: &str = "RDATE";
    pub const RRULE: &str = "RRULE";

    // Alarms
    pub const ACKNOWLEDGED: &str = "ACKNOWLEDGED";
    pub const ACTION: &str = "ACTION";
    pub const TRIGGER: &str = "TRIGGER";

    // Change management
    pub const CREATED: &str = "CREATED";
    pub const DTSTAMP: &str = "DTSTAMP";
    pub const SEQUENCE: &str = "SEQUENCE";

    // RFC 7986
    pub const CONFERENCE: &str = "CONFERENCE";
    pub const NAME: &str = "NAME";
    pub const SOURCE: &str = "SOURCE";

    // Extension properties
    pub const X_JSCAL_LOCALIZATION: &str = "X-JSCAL-LOCALIZATION";
    pub const X_JSCAL_TRIGGER: &str = "X-JSCAL-TRIGGER";
    pub const X_JSCAL_PROPERTY: &str = "X-JSCAL-PROPERTY";
    pub const X_JSCAL_EXCLUDED: &str = "X-JSCAL-EXCLUDED";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 23)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    #[test]
    fn content_line_params() {
        let cl = ContentLine::new(
            "dtstart",
            vec![Parameter::tzid("America/New_York")],
            "20260123T120000",
        );
        assert_eq!(cl.name, "DTSTART");
        assert_eq!(cl.tzid(), Some("America/New_York"));
        assert_eq!(cl.value_type(), None);
    }

    #[test]
    fn zoned_datetime_carries_tzid() {
        let prop = Property::datetime("DTSTART", DateTime::zoned(at(9), "Europe/Vienna"));
        assert_eq!(prop.get_param_value("TZID"), Some("Europe/Vienna"));
        assert_eq!(prop.raw_value, "20260123T090000");
    }

    #[test]
    fn date_list_requires_uniform_form() {
        let day = Date(NaiveDate::from_ymd_opt(2026, 1, 23).unwrap());
        let mixed = vec![
            DateOrDateTime::Date(day),
            DateOrDateTime::DateTime(DateTime::floating(at(9))),
        ];
        assert!(Property::date_list("EXDATE", mixed).is_none());
        assert!(Property::date_list("EXDATE", Vec::new()).is_none());

        let zoned = vec![
            DateOrDateTime::DateTime(DateTime::zoned(at(9), "Asia/Tokyo")),
            DateOrDateTime::DateTime(DateTime::zoned(at(10), "Asia/Tokyo")),
        ];
        let prop = Property::date_list("EXDATE", zoned).unwrap();
        assert_eq!(prop.raw_value, "20260123T090000,20260123T100000");
        assert_eq!(prop.get_param_value("TZID"), Some("Asia/Tokyo"));
        assert_eq!(prop.date_values().len(), 2);
    }

    #[test]
    fn with_param_replaces() {
        let prop = Property::text("SUMMARY", "Standup")
            .with_param(Parameter::language("en"))
            .with_param(Parameter::language("de"))
            .with_opt_param("X-JSID", None::<String>);
        assert_eq!(prop.params.len(), 1);
        assert_eq!(prop.get_param_value("language"), Some("de"));
        assert_eq!(prop.jsid(), None);
    }

    #[test]
    fn as_uri_falls_back_to_text() {
        assert_eq!(Property::uri("URL", "https://x.test").as_uri(), Some("https://x.test"));
        assert_eq!(Property::text("URL", "https://y.test").as_uri(), Some("https://y.test"));
        assert_eq!(Property::integer("PRIORITY", 1).as_uri(), None);
    }
}
