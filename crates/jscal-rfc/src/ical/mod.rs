//! iCalendar RFC 5545 implementation.
//!
//! - `core`: Type definitions for iCalendar structures
//! - `parse`: Parsers for iCalendar content
//! - `build`: Serializers for iCalendar content
//!
//! ## Example
//!
//! ```rust
//! use jscal_rfc::ical::{build, core::*};
//!
//! let mut ical = ICalendar::new("-//My App//EN");
//! let mut event = Component::event();
//! event.add_property(Property::text("UID", "my-event-1"));
//! event.add_property(Property::text("SUMMARY", "Team Meeting"));
//! ical.add_event(event);
//!
//! let output = build::serialize(&ical);
//! assert!(output.contains("SUMMARY:Team Meeting\r\n"));
//! ```

pub mod build;
pub mod core;
pub mod parse;

#[cfg(test)]
mod tests;

pub use build::serialize;
pub use core::{Component, ComponentKind, ICalendar, Parameter, Property};
pub use parse::{ParseError, ParseResult, parse};
