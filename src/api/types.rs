//! Wire types returned by the archive API

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of an archived record
///
/// The archive exports ids either as JSON numbers or as strings depending on
/// the source table, so both forms are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Message identifier
pub type MessageId = RecordId;

/// User identifier
pub type UserId = RecordId;

impl RecordId {
    /// Create an id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Uint(u64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Uint(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A guild (one archive database)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Display name
    pub name: String,
    /// Database file name; doubles as the guild id in routes and URLs
    pub db_file: String,
}

impl Guild {
    /// Id used in API paths and routes
    pub fn id(&self) -> &str {
        &self.db_file
    }
}

/// A channel inside a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name; doubles as the channel id
    pub name: String,
}

/// An archived message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id (ordinal within the archive)
    #[serde(alias = "message_id")]
    pub id: MessageId,
    /// Author id, when exported
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Author display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Message body
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Timestamp as exported by the archive
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// Channel the message belongs to, when exported
    #[serde(default)]
    pub channel_id: Option<RecordId>,
}

impl Message {
    /// Create a message with the fields the feed cares about
    pub fn new(
        id: impl Into<String>,
        user_name: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(id),
            user_id: None,
            user_name: user_name.into(),
            content: content.into(),
            timestamp: timestamp.into(),
            channel_id: None,
        }
    }

    /// Case-insensitive match against body or author
    ///
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
            || self.user_name.to_lowercase().contains(needle)
    }

    /// Timestamp formatted for display, falling back to the raw text
    pub fn display_timestamp(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&self.timestamp, format) {
                return dt.format("%Y-%m-%d %H:%M").to_string();
            }
        }
        self.timestamp.clone()
    }
}

/// One page of messages as returned by the API
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePage {
    /// Page number that produced these messages (1 = most recent)
    pub page: u32,
    /// Messages in API order (newest first)
    pub messages: Vec<Message>,
}

impl MessagePage {
    /// Whether the page signals the end of the channel history
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the page, returning its messages oldest first
    pub fn into_oldest_first(self) -> Vec<Message> {
        let mut messages = self.messages;
        messages.reverse();
        messages
    }
}

/// Entry of the guild user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id
    pub user_id: UserId,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Messages across all channels of the guild
    pub total_messages: u64,
}

/// Per-channel message count in a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelActivity {
    /// Channel id, when exported
    #[serde(default)]
    pub channel_id: Option<RecordId>,
    /// Channel name
    pub channel_name: String,
    /// Messages the user posted in this channel
    pub message_count: u64,
}

/// A user's profile within a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Messages across all channels
    pub total_messages: u64,
    /// Breakdown per channel
    #[serde(default)]
    pub channels: Vec<ChannelActivity>,
}

/// Sort users by message count, most active first
///
/// Ties keep their API order.
pub fn sort_by_activity(users: &mut [UserSummary]) {
    users.sort_by(|a, b| b.total_messages.cmp(&a.total_messages));
}
