//! Value parsers (RFC 5545 §3.3).

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::ical::core::{
    Date, DateTime, DateTimeForm, Duration, Frequency, MonthNum, Period, RRule, RRuleUntil, Skip,
    UtcOffset, Weekday, WeekdayNum,
};

/// Maps any displayable error into a positioned parse error.
fn invalid<E: Display>(kind: ParseErrorKind, line: usize, col: usize) -> impl FnOnce(E) -> ParseError {
    move |e| ParseError::new(kind, line, col).with_context(e.to_string())
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a DATE value: `YYYYMMDD`.
///
/// ## Errors
/// Returns `InvalidDate` unless the input is eight digits naming a real date.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<Date> {
    if s.len() != 8 || !all_digits(s) {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, line, col));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map(Date)
        .map_err(invalid(ParseErrorKind::InvalidDate, line, col))
}

/// Parses a DATE-TIME value: `YYYYMMDD"T"HHMMSS[Z]`.
///
/// The TZID comes from the property parameters; a `Z` suffix wins over it.
///
/// ## Errors
/// Returns `InvalidDateTime` for any other shape or an impossible date.
pub fn parse_datetime(s: &str, tzid: Option<&str>, line: usize, col: usize) -> ParseResult<DateTime> {
    let (body, is_utc) = match s.strip_suffix(['Z', 'z']) {
        Some(body) => (body, true),
        None => (s, false),
    };
    let shape_ok = body.len() == 15
        && body.as_bytes()[8] == b'T'
        && all_digits(&body[..8])
        && all_digits(&body[9..]);
    if !shape_ok {
        return Err(ParseError::new(ParseErrorKind::InvalidDateTime, line, col));
    }
    let local = NaiveDateTime::parse_from_str(body, "%Y%m%dT%H%M%S")
        .map_err(invalid(ParseErrorKind::InvalidDateTime, line, col))?;

    let form = match (is_utc, tzid) {
        (true, _) => DateTimeForm::Utc,
        (false, Some(tz)) => DateTimeForm::Zoned {
            tzid: tz.to_string(),
        },
        (false, None) => DateTimeForm::Floating,
    };
    Ok(DateTime { local, form })
}

/// Parses a UTC-OFFSET value: `(+|-)HHMM[SS]`.
///
/// ## Errors
/// Returns `InvalidUtcOffset` for any other shape.
pub fn parse_utc_offset(s: &str, line: usize, col: usize) -> ParseResult<UtcOffset> {
    let fail = || ParseError::new(ParseErrorKind::InvalidUtcOffset, line, col);
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(fail()),
    };
    if !(digits.len() == 4 || digits.len() == 6) || !all_digits(digits) {
        return Err(fail());
    }
    let field = |range: std::ops::Range<usize>| digits[range].parse::<i32>().map_err(invalid(ParseErrorKind::InvalidUtcOffset, line, col));
    let hours = field(0..2)?;
    let minutes = field(2..4)?;
    let seconds = if digits.len() == 6 { field(4..6)? } else { 0 };
    if minutes > 59 || seconds > 59 {
        return Err(fail());
    }
    Ok(UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds)))
}

/// Splits `body` into `(number, designator)` pairs, requiring designators
/// from `allowed` in the given order, each at most once.
fn designated_numbers(body: &str, allowed: &[char]) -> Option<Vec<(u32, char)>> {
    let mut out = Vec::new();
    let mut next_allowed = 0;
    let mut digits_start = 0;
    for (i, c) in body.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let digits = &body[digits_start..i];
        let rank = allowed.iter().position(|&d| d == c)?;
        if digits.is_empty() || rank < next_allowed {
            return None;
        }
        out.push((digits.parse().ok()?, c));
        next_allowed = rank + 1;
        digits_start = i + c.len_utf8();
    }
    (digits_start == body.len()).then_some(out)
}

/// Parses a DURATION value: `[+|-]P(nW | [nD][T[nH][nM][nS]])`.
///
/// ## Errors
/// Returns `InvalidDuration` for a missing `P`, an empty body, a `T` without
/// a time designator, or designators out of order.
pub fn parse_duration(s: &str, line: usize, col: usize) -> ParseResult<Duration> {
    let fail = || ParseError::new(ParseErrorKind::InvalidDuration, line, col);
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let body = unsigned.strip_prefix('P').ok_or_else(fail)?;
    if body.is_empty() {
        return Err(fail());
    }

    let mut dur = Duration {
        negative,
        ..Duration::zero()
    };

    if let Some(weeks) = body.strip_suffix('W') {
        if !all_digits(weeks) {
            return Err(fail());
        }
        dur.weeks = weeks.parse().map_err(invalid(ParseErrorKind::InvalidDuration, line, col))?;
        return Ok(dur);
    }

    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (body, None),
    };
    for (n, _) in designated_numbers(date_part, &['D']).ok_or_else(fail)? {
        dur.days = n;
    }
    if let Some(time) = time_part {
        let parts = designated_numbers(time, &['H', 'M', 'S']).ok_or_else(fail)?;
        if parts.is_empty() {
            return Err(fail());
        }
        for (n, designator) in parts {
            match designator {
                'H' => dur.hours = n,
                'M' => dur.minutes = n,
                _ => dur.seconds = n,
            }
        }
    }
    Ok(dur)
}

/// Parses a PERIOD value: `start "/" (end | duration)`.
///
/// ## Errors
/// Returns `InvalidPeriod` without a slash, or the error of the failing half.
pub fn parse_period(s: &str, tzid: Option<&str>, line: usize, col: usize) -> ParseResult<Period> {
    let (start, end) = s
        .split_once('/')
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidPeriod, line, col))?;
    let start = parse_datetime(start, tzid, line, col)?;
    if end.starts_with(['P', '+', '-']) {
        let duration = parse_duration(end, line, col + s.len() - end.len())?;
        Ok(Period::Duration { start, duration })
    } else {
        let end = parse_datetime(end, tzid, line, col + s.len() - end.len())?;
        Ok(Period::Explicit { start, end })
    }
}

fn parse_number_list<T>(s: &str, line: usize, col: usize) -> ParseResult<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    s.split(',')
        .map(|v| v.trim().parse().map_err(invalid(ParseErrorKind::InvalidRRule, line, col)))
        .collect()
}

fn parse_weekday_num(s: &str, line: usize, col: usize) -> ParseResult<WeekdayNum> {
    let s = s.trim();
    let split = s.len().checked_sub(2).filter(|&i| s.is_char_boundary(i)).ok_or_else(|| ParseError::new(ParseErrorKind::InvalidWeekday, line, col))?;
    let (ordinal, day) = s.split_at(split);
    let weekday = Weekday::parse(day).ok_or_else(|| ParseError::new(ParseErrorKind::InvalidWeekday, line, col))?;
    let ordinal = if ordinal.is_empty() {
        None
    } else {
        let n: i8 = ordinal.parse().map_err(invalid(ParseErrorKind::InvalidRRule, line, col))?;
        if n == 0 {
            return Err(ParseError::new(ParseErrorKind::InvalidRRule, line, col));
        }
        Some(n)
    };
    Ok(WeekdayNum { ordinal, weekday })
}

fn parse_month_num(s: &str, line: usize, col: usize) -> ParseResult<MonthNum> {
    let s = s.trim();
    let (digits, leap) = match s.strip_suffix(['L', 'l']) {
        Some(d) => (d, true),
        None => (s, false),
    };
    let month: u8 = digits.parse().map_err(invalid(ParseErrorKind::InvalidRRule, line, col))?;
    if !(1..=13).contains(&month) {
        return Err(ParseError::new(ParseErrorKind::InvalidRRule, line, col));
    }
    Ok(MonthNum { month, leap })
}

/// Parses a RECUR value (RFC 5545 §3.3.10, RFC 7529).
///
/// Unknown rule parts are ignored.
///
/// ## Errors
/// Returns an error for a part without `=`, an unparsable part value or
/// both `UNTIL` and `COUNT`.
pub fn parse_rrule(s: &str, line: usize, col: usize) -> ParseResult<RRule> {
    let mut rule = RRule::default();

    for part in s.split(';').filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(part.to_string()))?;

        match key.to_ascii_uppercase().as_str() {
            "FREQ" => {
                rule.freq = Some(
                    Frequency::parse(value)
                        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidFrequency, line, col))?,
                );
            }
            "RSCALE" => rule.rscale = Some(value.to_ascii_lowercase()),
            "SKIP" => {
                rule.skip = Some(
                    Skip::parse(value)
                        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidRRule, line, col))?,
                );
            }
            "INTERVAL" => {
                rule.interval = Some(value.parse().map_err(invalid(ParseErrorKind::InvalidRRule, line, col))?);
            }
            "COUNT" => {
                if rule.until.is_some() {
                    return Err(ParseError::new(ParseErrorKind::UntilCountConflict, line, col));
                }
                rule.count = Some(value.parse().map_err(invalid(ParseErrorKind::InvalidRRule, line, col))?);
            }
            "UNTIL" => {
                if rule.count.is_some() {
                    return Err(ParseError::new(ParseErrorKind::UntilCountConflict, line, col));
                }
                rule.until = Some(if value.contains(['T', 't']) {
                    RRuleUntil::DateTime(parse_datetime(value, None, line, col)?)
                } else {
                    RRuleUntil::Date(parse_date(value, line, col)?)
                });
            }
            "WKST" => {
                rule.wkst = Some(
                    Weekday::parse(value)
                        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidWeekday, line, col))?,
                );
            }
            "BYSECOND" => rule.by_second = parse_number_list(value, line, col)?,
            "BYMINUTE" => rule.by_minute = parse_number_list(value, line, col)?,
            "BYHOUR" => rule.by_hour = parse_number_list(value, line, col)?,
            "BYDAY" => {
                rule.by_day = value
                    .split(',')
                    .map(|v| parse_weekday_num(v, line, col))
                    .collect::<ParseResult<_>>()?;
            }
            "BYMONTHDAY" => rule.by_monthday = parse_number_list(value, line, col)?,
            "BYYEARDAY" => rule.by_yearday = parse_number_list(value, line, col)?,
            "BYWEEKNO" => rule.by_weekno = parse_number_list(value, line, col)?,
            "BYMONTH" => {
                rule.by_month = value
                    .split(',')
                    .map(|v| parse_month_num(v, line, col))
                    .collect::<ParseResult<_>>()?;
            }
            "BYSETPOS" => rule.by_setpos = parse_number_list(value, line, col)?,
            other => tracing::trace!(part = other, "Ignoring unknown RRULE part"),
        }
    }

    Ok(rule)
}

/// Unescapes a TEXT value (RFC 5545 §3.3.11): `\\ \, \; \n \N`.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => result.push('\n'),
            Some(',') => result.push(','),
            Some(';') => result.push(';'),
            Some('\\') | None => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
        }
    }
    result
}

/// Splits an escaped TEXT-LIST on unescaped commas, unescaping each item.
#[must_use]
pub fn split_text_list(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                items.push(unescape_text(&s[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(unescape_text(&s[start..]));
    items
}

/// Parses a BOOLEAN value.
///
/// ## Errors
/// Returns `InvalidBoolean` unless the input is `TRUE` or `FALSE`.
pub fn parse_boolean(s: &str, line: usize, col: usize) -> ParseResult<bool> {
    match s.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(ParseError::new(ParseErrorKind::InvalidBoolean, line, col)),
    }
}

/// Parses an INTEGER value.
///
/// ## Errors
/// Returns `InvalidInteger` if the input is not a 32-bit integer.
pub fn parse_integer(s: &str, line: usize, col: usize) -> ParseResult<i32> {
    s.trim().parse().map_err(invalid(ParseErrorKind::InvalidInteger, line, col))
}

/// Parses a FLOAT value.
///
/// ## Errors
/// Returns `InvalidFloat` if the input is not a number.
pub fn parse_float(s: &str, line: usize, col: usize) -> ParseResult<f64> {
    s.trim().parse().map_err(invalid(ParseErrorKind::InvalidFloat, line, col))
}
