//! Settings loading from YAML/JSON files and environment variables.

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings shared by the route table and the test doubles.
///
/// Keys use the same upper-case names as the environment variables that
/// override them, so a settings file reads like the environment it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Settings {
    /// Where unauthenticated or non-staff admin visitors are sent
    pub login_url: String,
    /// Target of the legacy `kobocat/` redirect; `None` answers 410 Gone
    pub kobocat_url: Option<String>,
    /// Enketo base URL, never with a trailing slash
    pub enketo_url: String,
    /// Mount the metrics exporter routes
    pub enable_metrics: bool,
    /// Project root; test fixtures live under `kpi/tests`
    pub base_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            login_url: "/accounts/login/".to_string(),
            kobocat_url: Some("https://kc.kobotoolbox.org".to_string()),
            enketo_url: "https://enketo.org".to_string(),
            enable_metrics: false,
            base_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings from a `.yaml`, `.yml` or `.json` file.
    ///
    /// Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let settings: Settings = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => return Err(ConfigError::UnknownFileType(display)),
        };

        tracing::info!(path = %path.display(), "loaded settings file");
        Ok(settings.normalized())
    }

    /// Default settings overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Override fields from an environment lookup.
    ///
    /// `ENKETO_URL` falls back to `ENKETO_SERVER`. An empty `KOBOCAT_URL`
    /// disables the legacy redirect target.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LOGIN_URL") {
            self.login_url = url;
        }
        if let Some(url) = lookup("KOBOCAT_URL") {
            self.kobocat_url = (!url.is_empty()).then_some(url);
        }
        if let Some(url) = lookup("ENKETO_URL")
            .filter(|u| !u.is_empty())
            .or_else(|| lookup("ENKETO_SERVER"))
        {
            self.enketo_url = url;
        }
        if let Some(flag) = lookup("ENABLE_METRICS") {
            self.enable_metrics = parse_env_bool(&flag);
        }
        if let Some(dir) = lookup("BASE_DIR") {
            self.base_dir = PathBuf::from(dir);
        }

        let settings = self.normalized();
        tracing::debug!(
            enketo_url = %settings.enketo_url,
            enable_metrics = settings.enable_metrics,
            "applied environment overrides"
        );
        settings
    }

    /// Directory holding test fixture files.
    pub fn fixtures_dir(&self) -> PathBuf {
        self.base_dir.join("kpi").join("tests")
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.enketo_url.trim_end_matches('/').len();
        self.enketo_url.truncate(trimmed);
        self
    }
}

/// Interpret an environment flag the way the deployment scripts do.
pub fn parse_env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "on" | "ok" | "y" | "yes" | "1"
    )
}
