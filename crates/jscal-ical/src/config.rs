use std::collections::BTreeMap;

use jscal_core::config::IcalSettings;
use jscal_core::constants::DEFAULT_PROD_ID;

/// Settings for writing iCalendar data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcalConfig {
    /// `PRODID` used when the converted object names none.
    pub prod_id: String,
    /// `METHOD` used when the converted object names none.
    pub method: Option<String>,
    /// Calendar-level properties copied to the output as given.
    pub properties: BTreeMap<String, String>,
}

impl Default for IcalConfig {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_string(),
            method: None,
            properties: BTreeMap::new(),
        }
    }
}

impl From<&IcalSettings> for IcalConfig {
    fn from(settings: &IcalSettings) -> Self {
        Self {
            prod_id: settings.prod_id.clone(),
            method: settings.method.clone(),
            properties: settings.properties.clone(),
        }
    }
}

/// Settings for reading iCalendar data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Always produce a `Group`, even for a single event or task.
    pub force_group: bool,
}

impl From<&IcalSettings> for ParseOptions {
    fn from(settings: &IcalSettings) -> Self {
        Self {
            force_group: settings.force_group,
        }
    }
}
