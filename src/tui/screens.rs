//! Screen state structures for TUI

use crate::api::types::{UserId, UserProfile};
use crate::tui::types::Pane;

/// Cursor over a list whose length can change under it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    /// Selected index
    pub selected_index: usize,
}

impl ListCursor {
    /// Move to next item, wrapping around
    pub fn next(&mut self, count: usize) {
        if count > 0 {
            self.selected_index = (self.selected_index + 1) % count;
        }
    }

    /// Move to previous item, wrapping around
    pub fn previous(&mut self, count: usize) {
        if count > 0 {
            if self.selected_index > 0 && self.selected_index < count {
                self.selected_index -= 1;
            } else {
                self.selected_index = count - 1;
            }
        }
    }

    /// Pull the cursor back inside a list of `count` items
    pub fn clamp(&mut self, count: usize) {
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Selected index if it points at an item
    pub fn get(&self, count: usize) -> Option<usize> {
        (self.selected_index < count).then_some(self.selected_index)
    }
}

/// Channel view screen state
#[derive(Debug)]
pub struct ChannelViewScreen {
    /// Focused pane
    pub focus: Pane,
    /// Cursor in the guild list
    pub guilds: ListCursor,
    /// Cursor in the channel list
    pub channels: ListCursor,
    /// Cursor in the user list
    pub users: ListCursor,
    /// Search input buffer
    pub search_input: String,
    /// Whether keystrokes go to the search box
    pub searching: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the status is an error
    pub is_error: bool,
}

impl Default for ChannelViewScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelViewScreen {
    /// Create new channel view screen
    pub fn new() -> Self {
        Self {
            focus: Pane::Guilds,
            guilds: ListCursor::default(),
            channels: ListCursor::default(),
            users: ListCursor::default(),
            search_input: String::new(),
            searching: false,
            status_message: None,
            is_error: false,
        }
    }

    /// Move focus to the next pane
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move focus to the previous pane
    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Start editing the search box
    pub fn start_search(&mut self) {
        self.searching = true;
    }

    /// Stop editing the search box (the term stays applied)
    pub fn stop_search(&mut self) {
        self.searching = false;
    }

    /// Add character to search input
    pub fn add_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    /// Remove last character from search input
    pub fn backspace(&mut self) {
        self.search_input.pop();
    }

    /// Clear search input
    pub fn clear_search(&mut self) {
        self.search_input.clear();
    }

    /// Set an informational status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.is_error = false;
    }

    /// Set an error status message
    pub fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.is_error = true;
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.is_error = false;
    }
}

/// User profile screen state
#[derive(Debug)]
pub struct UserProfileScreen {
    /// Guild the profile belongs to
    pub guild_id: String,
    /// Profiled user
    pub user_id: UserId,
    /// Loaded profile
    pub profile: Option<UserProfile>,
    /// Whether the profile request is still pending
    pub loading: bool,
    /// Error from the last request
    pub error: Option<String>,
}

impl UserProfileScreen {
    /// Create a profile screen waiting for its data
    pub fn new(guild_id: String, user_id: UserId) -> Self {
        Self {
            guild_id,
            user_id,
            profile: None,
            loading: true,
            error: None,
        }
    }

    /// Whether a response for `guild`/`user` belongs to this screen
    pub fn is_for(&self, guild: &str, user: &UserId) -> bool {
        self.guild_id == guild && &self.user_id == user
    }

    /// Store a loaded profile
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
        self.loading = false;
        self.error = None;
    }

    /// Record a failed request
    pub fn set_error(&mut self, error: String) {
        self.profile = None;
        self.loading = false;
        self.error = Some(error);
    }
}
