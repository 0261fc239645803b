//! The `jscal` converter: command line, configuration wiring and the
//! file-level conversions between JSON and iCalendar documents.

pub mod cli;
pub mod convert;
