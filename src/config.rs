use std::{env, fs, path::Path, time::Duration};

use fractic_server_error::ServerError;

use crate::{
    data::models::settings_model::SettingsModel,
    errors::{MissingBackendCredentials, ReadError},
};

/// Highest similarity score (0 = exact) accepted as a client match.
pub const DEFAULT_CLIENT_MATCH_THRESHOLD: f64 = 0.4;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const SETTINGS_PATH_VAR: &str = "ROUTE_LEDGER_SETTINGS";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLedgerSettings {
    /// Limit for bulk dashboard loads.
    pub load_timeout: Duration,
    /// Limit for the admin role lookup.
    pub role_check_timeout: Duration,
    pub client_match_threshold: f64,
}

impl Default for RouteLedgerSettings {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(15),
            role_check_timeout: Duration::from_secs(8),
            client_match_threshold: DEFAULT_CLIENT_MATCH_THRESHOLD,
        }
    }
}

impl RouteLedgerSettings {
    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        Ok(SettingsModel::from_ron(s)?.apply(Self::default()))
    }

    pub fn from_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<Path>,
    {
        Self::from_ron(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLedgerConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub settings: RouteLedgerSettings,
}

impl RouteLedgerConfig {
    pub fn new(supabase_url: impl Into<String>, supabase_anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            supabase_anon_key: supabase_anon_key.into(),
            settings: RouteLedgerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RouteLedgerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Backend credentials are mandatory; the settings file is optional.
    pub fn from_env() -> Result<Self, ServerError> {
        let supabase_url = required_var(SUPABASE_URL_VAR)?;
        let supabase_anon_key = required_var(SUPABASE_ANON_KEY_VAR)?;
        let settings = match env::var(SETTINGS_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => RouteLedgerSettings::from_file(path.trim())?,
            _ => RouteLedgerSettings::default(),
        };
        Ok(Self::new(supabase_url, supabase_anon_key).with_settings(settings))
    }
}

fn required_var(name: &str) -> Result<String, ServerError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().to_string())
        .ok_or_else(|| MissingBackendCredentials::new(name))
}
