//! Application settings and configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default archive API location (the archive backend listens on port 5001)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";

/// Application settings
///
/// Persistent configuration for the archive browser. Settings are stored in
/// JSON format; a missing or empty file yields the defaults.
///
/// # Example
/// ```rust,no_run
/// use supermeow::settings::Settings;
///
/// let mut settings = Settings::load("supermeow.json").expect("Failed to load");
/// settings.api_base_url = "http://archive.local:5001".to_string();
/// settings.save("supermeow.json").expect("Failed to save");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the archive REST API (without the `/api` suffix)
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// File that receives log output while the TUI owns the terminal
    pub log_file: String,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// Returns the default settings if the file doesn't exist or is empty.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file, creating parent directories as needed
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::Config(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            Error::Config(format!("Invalid api_base_url '{}': {}", self.api_base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "api_base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.tracing_level()?;
        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed log level
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| Error::Config(format!("Unknown log_level '{}'", self.log_level)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            log_file: "supermeow.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}
