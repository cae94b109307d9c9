use fractic_server_error::ServerError;
use serde_derive::Deserialize;

use crate::{config::RouteLedgerSettings, errors::InvalidRon};

/// RON settings file. Every field is optional; missing ones keep defaults.
///
/// ```ron
/// Settings(
///     load_timeout_secs: 15,
///     role_check_timeout_secs: 8,
///     client_match_threshold: 0.4,
/// )
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename = "Settings", default)]
pub(crate) struct SettingsModel {
    pub load_timeout_secs: Option<u64>,
    pub role_check_timeout_secs: Option<u64>,
    pub client_match_threshold: Option<f64>,
}

impl SettingsModel {
    pub(crate) fn from_ron(s: &str) -> Result<Self, ServerError> {
        ron::from_str(s).map_err(|e| InvalidRon::with_debug("Settings", &e))
    }

    pub(crate) fn apply(self, mut settings: RouteLedgerSettings) -> RouteLedgerSettings {
        if let Some(secs) = self.load_timeout_secs {
            settings.load_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(secs) = self.role_check_timeout_secs {
            settings.role_check_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(threshold) = self.client_match_threshold {
            settings.client_match_threshold = threshold;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let settings = SettingsModel::from_ron("Settings(load_timeout_secs: 30)")
            .unwrap()
            .apply(RouteLedgerSettings::default());
        assert_eq!(settings.load_timeout.as_secs(), 30);
        assert_eq!(settings.role_check_timeout.as_secs(), 8);
        assert_eq!(settings.client_match_threshold, 0.4);
    }

    #[test]
    fn malformed_settings_are_rejected() {
        assert!(SettingsModel::from_ron("Settings(load_timeout_secs: \"x\")").is_err());
    }
}
