//! Supermeow - a terminal browser for archived chat communities
//!
//! This library provides the client side of the archive browser: a typed
//! client for the archive REST API, the paginated message feed controller,
//! route handling, settings, and the terminal UI built on top of them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod feed;
pub mod routes;
pub mod settings;
pub mod tui;

#[cfg(test)]
mod tests;

use settings::Settings;
use std::fs::OpenOptions;
use std::sync::Mutex;

/// Result type alias for Supermeow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Supermeow operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The archive API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the API (or the status reason)
        message: String,
    },

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A navigation path could not be parsed
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Initialize logging to the log file named in the settings
///
/// The terminal belongs to the TUI, so log output goes to a file instead of
/// stdout. Calling this twice is harmless; the second call keeps the first
/// subscriber.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let level = settings.tracing_level()?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)?;

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}
