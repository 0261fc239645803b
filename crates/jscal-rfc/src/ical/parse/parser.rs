//! iCalendar document parser (RFC 5545).

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use super::values::{
    parse_boolean, parse_date, parse_datetime, parse_duration, parse_float, parse_integer,
    parse_period, parse_rrule, parse_utc_offset, split_text_list, unescape_text,
};
use crate::ical::core::{Component, ContentLine, ICalendar, Property, Value};

/// Parses an iCalendar document.
///
/// ## Errors
///
/// Returns an error if the input is not a single well-formed VCALENDAR or a
/// property value does not match its value type.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<ICalendar> {
    let lines = split_lines(input);
    if lines.is_empty() {
        tracing::warn!("Empty iCalendar input");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1, 1));
    }
    tracing::trace!(count = lines.len(), "Split content lines");

    let mut iter = lines
        .into_iter()
        .map(|(line_num, line)| parse_content_line(&line, line_num).map(|cl| (line_num, cl)));

    let (line_num, begin) = iter
        .next()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingBegin, 1, 1))??;
    if begin.name != "BEGIN" || !begin.raw_value.eq_ignore_ascii_case("VCALENDAR") {
        return Err(ParseError::new(ParseErrorKind::MissingBegin, line_num, 1)
            .with_context("expected BEGIN:VCALENDAR"));
    }

    let root = parse_component(&mut iter, line_num, &begin.raw_value)?;

    if let Some(trailing) = iter.next() {
        let (line_num, cl) = trailing?;
        tracing::warn!(line = line_num, name = %cl.name, "Content after END:VCALENDAR");
        return Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num, 1)
            .with_context("content after END:VCALENDAR"));
    }

    tracing::debug!(children = root.children.len(), "Parsed iCalendar document");
    Ok(ICalendar { root })
}

/// Parses the body of a component whose BEGIN line was already consumed.
fn parse_component(
    iter: &mut impl Iterator<Item = ParseResult<(usize, ContentLine)>>,
    begin_line: usize,
    name: &str,
) -> ParseResult<Component> {
    let mut component = Component::custom(name);
    let mut last_line = begin_line;

    loop {
        let Some(next) = iter.next() else {
            return Err(ParseError::new(ParseErrorKind::MissingEnd, last_line, 1)
                .with_context(format!("missing END:{}", component.name)));
        };
        let (line_num, cl) = next?;
        last_line = line_num;

        match cl.name.as_str() {
            "BEGIN" => {
                let child = parse_component(iter, line_num, &cl.raw_value)?;
                component.children.push(child);
            }
            "END" => {
                if !cl.raw_value.eq_ignore_ascii_case(&component.name) {
                    return Err(
                        ParseError::new(ParseErrorKind::MismatchedComponent, line_num, 1)
                            .with_context(format!(
                                "expected END:{}, got END:{}",
                                component.name, cl.raw_value
                            )),
                    );
                }
                return Ok(component);
            }
            _ => component.properties.push(parse_property(cl, line_num)?),
        }
    }
}

/// Resolves the value type of a content line and parses its value.
fn parse_property(cl: ContentLine, line_num: usize) -> ParseResult<Property> {
    let value_type = ValueType::of(&cl);
    let value = parse_value(&cl.raw_value, value_type, cl.tzid(), line_num)?;
    Ok(Property {
        name: cl.name,
        params: cl.params,
        value,
        raw_value: cl.raw_value,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Boolean,
    CalAddress,
    Date,
    DateTime,
    Duration,
    Float,
    Integer,
    Period,
    Recur,
    Text,
    TextList,
    Uri,
    UtcOffset,
    Unknown,
}

impl ValueType {
    fn from_param(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "BOOLEAN" => Self::Boolean,
            "CAL-ADDRESS" => Self::CalAddress,
            "DATE" => Self::Date,
            "DATE-TIME" => Self::DateTime,
            "DURATION" => Self::Duration,
            "FLOAT" => Self::Float,
            "INTEGER" => Self::Integer,
            "PERIOD" => Self::Period,
            "RECUR" => Self::Recur,
            "TEXT" => Self::Text,
            "URI" => Self::Uri,
            "UTC-OFFSET" => Self::UtcOffset,
            _ => Self::Unknown,
        }
    }

    /// Explicit VALUE parameter first, then the property's default type.
    fn of(cl: &ContentLine) -> Self {
        if let Some(value_type) = cl.value_type() {
            let explicit = Self::from_param(value_type);
            // TEXT-typed list properties still split on commas
            return match (explicit, cl.name.as_str()) {
                (Self::Text, "CATEGORIES" | "RESOURCES") => Self::TextList,
                _ => explicit,
            };
        }

        let looks_like_date = !cl.raw_value.contains(['T', 't']);
        match cl.name.as_str() {
            "DTSTART" | "DTEND" | "DUE" | "RECURRENCE-ID" | "EXDATE" | "RDATE"
                if looks_like_date =>
            {
                Self::Date
            }
            "RDATE" if cl.raw_value.contains('/') => Self::Period,
            "DTSTART" | "DTEND" | "DUE" | "RECURRENCE-ID" | "EXDATE" | "RDATE" | "DTSTAMP"
            | "CREATED" | "LAST-MODIFIED" | "COMPLETED" | "ACKNOWLEDGED" | "TZUNTIL" => {
                Self::DateTime
            }
            "DURATION" | "ESTIMATED-DURATION" | "REFRESH-INTERVAL" => Self::Duration,
            "TRIGGER" if cl.raw_value.starts_with(['P', '+', '-']) => Self::Duration,
            "TRIGGER" => Self::DateTime,
            "PERCENT-COMPLETE" | "PRIORITY" | "REPEAT" | "SEQUENCE" => Self::Integer,
            "RRULE" | "EXRULE" => Self::Recur,
            "TZOFFSETFROM" | "TZOFFSETTO" => Self::UtcOffset,
            "URL" | "TZURL" | "SOURCE" | "LINK" | "CONFERENCE" | "CONCEPT" | "IMAGE" => {
                Self::Uri
            }
            "FREEBUSY" => Self::Period,
            "ATTENDEE" | "ORGANIZER" => Self::CalAddress,
            "CATEGORIES" | "RESOURCES" => Self::TextList,
            // GEO is "lat;lon"; the semicolon is structural, not escaped text
            "GEO" => Self::Unknown,
            _ => Self::Text,
        }
    }
}

/// Applies `f` to each comma-separated item, collapsing one item to a
/// single value.
fn one_or_many<T>(
    raw: &str,
    f: impl Fn(&str) -> ParseResult<T>,
    single: impl FnOnce(T) -> Value,
    many: impl FnOnce(Vec<T>) -> Value,
) -> ParseResult<Value> {
    let mut items = raw
        .split(',')
        .map(|s| f(s.trim()))
        .collect::<ParseResult<Vec<T>>>()?;
    if items.len() == 1
        && let Some(item) = items.pop()
    {
        return Ok(single(item));
    }
    Ok(many(items))
}

fn parse_value(
    raw: &str,
    value_type: ValueType,
    tzid: Option<&str>,
    line: usize,
) -> ParseResult<Value> {
    Ok(match value_type {
        ValueType::Text => Value::Text(unescape_text(raw)),
        ValueType::TextList => Value::TextList(split_text_list(raw)),
        ValueType::DateTime => one_or_many(
            raw,
            |s| parse_datetime(s, tzid, line, 1),
            Value::DateTime,
            Value::DateTimeList,
        )?,
        ValueType::Date => {
            one_or_many(raw, |s| parse_date(s, line, 1), Value::Date, Value::DateList)?
        }
        ValueType::Period => one_or_many(
            raw,
            |s| parse_period(s, tzid, line, 1),
            Value::Period,
            Value::PeriodList,
        )?,
        ValueType::Duration => Value::Duration(parse_duration(raw, line, 1)?),
        ValueType::Integer => Value::Integer(parse_integer(raw, line, 1)?),
        ValueType::Float => Value::Float(parse_float(raw, line, 1)?),
        ValueType::Boolean => Value::Boolean(parse_boolean(raw, line, 1)?),
        ValueType::Recur => Value::Recur(Box::new(parse_rrule(raw, line, 1)?)),
        ValueType::UtcOffset => Value::UtcOffset(parse_utc_offset(raw, line, 1)?),
        ValueType::Uri => Value::Uri(raw.to_string()),
        ValueType::CalAddress => Value::CalAddress(raw.to_string()),
        ValueType::Unknown => Value::Unknown(raw.to_string()),
    })
}
