//! UI rendering module - screen-specific rendering functions
//!
//! Each screen has its own file. Rendering takes the app mutably because the
//! message pane reports its size back to the feed, which needs it for
//! scroll bookkeeping.

mod channel_view;
mod helpers;
mod user_profile;

use crate::tui::app::App;
use crate::tui::types::Screen;
use ratatui::Frame;

// Re-export render functions
pub use channel_view::render_channel_view;
pub use user_profile::render_user_profile;

// Re-export helper functions
pub use helpers::{pane_block, truncate};

/// Main UI rendering function - dispatches to screen-specific render functions
pub fn ui(f: &mut Frame, app: &mut App) {
    match app.current_screen {
        Screen::ChannelView => render_channel_view(f, app),
        Screen::UserProfile => render_user_profile(f, app),
    }
}
