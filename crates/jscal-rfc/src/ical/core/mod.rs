//! iCalendar core models (RFC 5545).
//!
//! These types keep unknown properties and parameters so a parsed document
//! can be written back, and expose name-based property access for the
//! conversion layers built on top of them.

mod component;
mod datetime;
mod duration;
mod parameter;
mod property;
mod rrule;
mod value;

pub use component::{Component, ComponentKind, ICalendar};
pub use datetime::{DateTime, DateTimeForm, UtcOffset};
pub use duration::Duration;
pub use parameter::{Parameter, names as param_names};
pub use property::{ContentLine, Property, names};
pub use rrule::{Frequency, MonthNum, RRule, RRuleUntil, Skip, Weekday, WeekdayNum};
pub use value::{Date, DateOrDateTime, Period, Value};
