//! Navigation routes
//!
//! The browser is addressed with the same paths the archive web front-end
//! uses, so a route can be passed on the command line or logged verbatim:
//!
//! - `/`
//! - `/guild/{guildId}/channel/{channelId}`
//! - `/guild/{guildId}/users/{userId}`

use crate::api::types::UserId;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A navigable location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Guild and channel pickers, nothing selected
    Home,
    /// Message feed of a channel
    Channel {
        /// Guild id (database file name)
        guild_id: String,
        /// Channel id (channel name)
        channel_id: String,
    },
    /// Profile of a user within a guild
    UserProfile {
        /// Guild id (database file name)
        guild_id: String,
        /// User id
        user_id: UserId,
    },
}

impl Route {
    /// Guild the route points into, if any
    pub fn guild_id(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Channel { guild_id, .. } | Self::UserProfile { guild_id, .. } => Some(guild_id),
        }
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["guild", guild, "channel", channel] => Ok(Self::Channel {
                guild_id: guild.to_string(),
                channel_id: channel.to_string(),
            }),
            ["guild", guild, "users", user] => Ok(Self::UserProfile {
                guild_id: guild.to_string(),
                user_id: UserId::from(*user),
            }),
            _ => Err(Error::InvalidRoute(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Channel {
                guild_id,
                channel_id,
            } => write!(f, "/guild/{}/channel/{}", guild_id, channel_id),
            Self::UserProfile { guild_id, user_id } => {
                write!(f, "/guild/{}/users/{}", guild_id, user_id)
            }
        }
    }
}
