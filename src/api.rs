//! Archive REST API module
//!
//! This module contains the wire types of the archive API and the async
//! HTTP client used to fetch guilds, channels, message pages and users.

pub mod client;
pub mod types;

pub use client::ArchiveClient;
pub use types::{
    Channel, ChannelActivity, Guild, Message, MessageId, MessagePage, RecordId, UserId,
    UserProfile, UserSummary,
};
