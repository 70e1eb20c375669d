//! TUI (Terminal User Interface) module
//!
//! This module contains all TUI logic separated from the binary for better testability.
//! The binary only owns the terminal and the event loop.

pub mod app;
pub mod fetcher;
pub mod screens;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use fetcher::{FetchOutcome, Fetcher};
pub use screens::*;
pub use types::{Pane, Screen};
