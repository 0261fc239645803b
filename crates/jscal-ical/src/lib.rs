//! iCalendar format adapter.
//!
//! ## Summary
//! Converts between the JSON calendar model ([`jscal_model::JsEntity`]) and
//! iCalendar component trees ([`jscal_rfc::ical::ICalendar`]). Reading
//! decides whether a calendar becomes a `Group`, an `Event` or a `Task`,
//! folds override components into their series and harvests referenced time
//! zones. Writing does the reverse and leaves the calendar sorted.

pub mod config;
pub mod error;
pub mod map;

pub use config::{IcalConfig, ParseOptions};
pub use error::{IcalError, IcalResult};
pub use map::{from_ics, ical_build, ical_parse, to_ics};
