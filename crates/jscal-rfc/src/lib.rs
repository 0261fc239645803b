//! iCalendar (RFC 5545) component library.
//!
//! Owns component storage, content-line parsing, text escaping, line folding
//! and canonical ordering. Higher layers only populate and read the
//! [`ical::core::ICalendar`] tree.

pub mod error;
pub mod ical;
