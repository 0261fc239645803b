//! Process-wide defaults shared across the jscal crates.

pub const ORG_NAME: &str = "jscal";
pub const PRODUCT_NAME: &str = "jscal converter";
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product identifier written to `PRODID` when configuration does not override it.
pub const DEFAULT_PROD_ID: &str =
    const_str::concat!("-//", ORG_NAME, "//", PRODUCT_NAME, " ", PRODUCT_VERSION, "//EN");

/// Calendar properties owned by the converter; configured extra properties
/// may not name them.
pub const RESERVED_CALENDAR_PROPERTIES: &[&str] = &["PRODID", "VERSION", "METHOD"];

/// Default `relativeTo` of an offset trigger and of a location.
pub const DEFAULT_RELATIVE_TO: &str = "start";
pub const DEFAULT_RSCALE: &str = "gregorian";
pub const DEFAULT_INTERVAL: u32 = 1;

/// `chrono` format of a local date-time (fraction only when non-zero).
pub const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// `chrono` format of a UTC date-time (fraction only when non-zero).
pub const UTC_DATE_TIME_FORMAT: &str = const_str::concat!(LOCAL_DATE_TIME_FORMAT, "Z");

/// Wire form of a duration with every component zero.
pub const ZERO_DURATION: &str = "PT0H0M0S";

/// Time zone identifier treated as UTC.
pub const UTC_TZID: &str = "Etc/UTC";

/// Maximum length of a generated or supplied object identifier.
pub const MAX_ID_LEN: usize = 255;

/// Key prefix of a harvested time zone definition that has no TZID.
pub const ANONYMOUS_TZ_PREFIX: &str = "/anonymous-";

/// DESCRIPTION of a VALARM whose owner has no title.
pub const DEFAULT_ALARM_DESCRIPTION: &str = "Reminder";
