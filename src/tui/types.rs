//! Core types for TUI screens and navigation

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Guilds, channels, message feed and users
    ChannelView,
    /// A single user's profile
    UserProfile,
}

/// Focusable panes of the channel view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Guild list (left, top)
    Guilds,
    /// Channel list of the selected guild (left, bottom)
    Channels,
    /// Message feed (center)
    Messages,
    /// User list of the selected guild (right)
    Users,
}

impl Pane {
    /// Pane that receives focus on Tab
    pub fn next(self) -> Self {
        match self {
            Self::Guilds => Self::Channels,
            Self::Channels => Self::Messages,
            Self::Messages => Self::Users,
            Self::Users => Self::Guilds,
        }
    }

    /// Pane that receives focus on Shift+Tab
    pub fn previous(self) -> Self {
        match self {
            Self::Guilds => Self::Users,
            Self::Channels => Self::Guilds,
            Self::Messages => Self::Channels,
            Self::Users => Self::Messages,
        }
    }

    /// Get display label for the pane
    pub fn label(&self) -> &str {
        match self {
            Self::Guilds => "Guilds",
            Self::Channels => "Channels",
            Self::Messages => "Messages",
            Self::Users => "Users",
        }
    }
}
