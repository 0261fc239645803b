use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_PROD_ID, RESERVED_CALENDAR_PROPERTIES};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub ical: IcalSettings,
    pub logging: LoggingConfig,
}

/// Settings forwarded to the iCalendar adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct IcalSettings {
    pub prod_id: String,
    /// Scheduling method written when the converted object carries none.
    pub method: Option<String>,
    /// Always produce a `Group` when reading iCalendar data.
    #[serde(default)]
    pub force_group: bool,
    /// Extra calendar-level properties, passed through untouched.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Default for IcalSettings {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_string(),
            method: None,
            force_group: false,
            properties: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an optional
    /// TOML file. Environment variables (`JSCAL_ICAL__PROD_ID`, ...) take
    /// precedence over the file.
    ///
    /// ## Errors
    /// Returns `ConfigError` if building the configuration or deserializing
    /// it fails.
    pub fn load(file: Option<&Path>) -> CoreResult<Self> {
        let mut builder = Config::builder()
            .set_default("ical.prod_id", DEFAULT_PROD_ID)?
            .set_default("ical.force_group", false)?
            .set_default("logging.level", "info")?;

        builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("jscal.toml").required(false)),
        };

        Ok(builder
            .add_source(
                config::Environment::with_prefix("JSCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Checks values the configuration sources cannot constrain.
    ///
    /// ## Errors
    /// Returns `InvalidInput` for an empty `PRODID` or a method or property
    /// name that is not an iCalendar token.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ical.prod_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("ical.prod_id is empty".to_string()));
        }
        let names = self
            .ical
            .method
            .iter()
            .chain(self.ical.properties.keys());
        for name in names {
            if !is_token(name) {
                return Err(CoreError::InvalidInput(format!(
                    "{name:?} is not an iCalendar token"
                )));
            }
        }
        if let Some(name) = self.ical.properties.keys().find(|name| is_reserved(name)) {
            return Err(CoreError::InvalidInput(format!(
                "ical.properties may not set {name}"
            )));
        }
        Ok(())
    }
}

/// Letters, digits and hyphens, as in iCalendar names and METHOD values.
fn is_token(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `PRODID`, `VERSION` and `METHOD` have settings of their own.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_CALENDAR_PROPERTIES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// ## Summary
/// Loads configuration from environment variables, a `.env` file and the
/// optional configuration file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(file: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load(file)?;
    settings.validate()?;
    tracing::debug!(prod_id = %settings.ical.prod_id, "Configuration loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn load_uses_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.ical.prod_id.is_empty());
        assert!(!settings.logging.level.is_empty());
    }

    #[test]
    fn validate_rejects_bad_names() {
        let mut settings = Settings {
            ical: IcalSettings::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        };
        assert!(settings.validate().is_ok());

        settings.ical.method = Some("request".to_string());
        settings
            .ical
            .properties
            .insert("X-WR-CALNAME".to_string(), "Team".to_string());
        assert!(settings.validate().is_ok());

        settings.ical.method = Some("re quest".to_string());
        assert!(matches!(settings.validate(), Err(CoreError::InvalidInput(_))));

        settings.ical.method = None;
        settings
            .ical
            .properties
            .insert("ProdId".to_string(), "-//Other//EN".to_string());
        assert!(matches!(settings.validate(), Err(CoreError::InvalidInput(_))));
        settings.ical.properties.remove("ProdId");
        assert!(settings.validate().is_ok());

        settings.ical.prod_id = " ".to_string();
        assert!(matches!(settings.validate(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn ical_settings_default() {
        let settings = IcalSettings::default();
        assert_eq!(settings.prod_id, DEFAULT_PROD_ID);
        assert!(settings.method.is_none());
        assert!(!settings.force_group);
        assert!(settings.properties.is_empty());
    }
}
