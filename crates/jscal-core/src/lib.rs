//! Shared building blocks for the jscal crates: constants, configuration
//! loading, the core error type and identifier helpers.

pub mod config;
pub mod constants;
pub mod error;
pub mod util;
