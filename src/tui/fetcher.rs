//! Background fetching for the TUI
//!
//! Requests run as tokio tasks; their results come back over an unbounded
//! channel that the event loop drains between frames. UI state is only ever
//! touched on the event-loop thread.

use crate::api::types::{Channel, Guild, MessagePage, UserId, UserProfile, UserSummary};
use crate::api::ArchiveClient;
use crate::feed::PageRequest;
use crate::Result;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Result of a background request, tagged with what it was for
#[derive(Debug)]
pub enum FetchOutcome {
    /// Guild list
    Guilds(Result<Vec<Guild>>),
    /// Channel list of a guild
    Channels {
        /// Guild the list was requested for
        guild: String,
        /// Response
        result: Result<Vec<Channel>>,
    },
    /// User list of a guild
    Users {
        /// Guild the list was requested for
        guild: String,
        /// Response
        result: Result<Vec<UserSummary>>,
    },
    /// A page of the message feed
    Page {
        /// Request issued by the feed controller
        request: PageRequest,
        /// Response
        result: Result<MessagePage>,
    },
    /// A user profile
    Profile {
        /// Guild the profile was requested in
        guild: String,
        /// Requested user
        user: UserId,
        /// Response
        result: Result<UserProfile>,
    },
}

/// Spawns API requests and reports their outcomes
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: ArchiveClient,
    runtime: Handle,
    tx: UnboundedSender<FetchOutcome>,
}

impl Fetcher {
    /// Create a fetcher and the receiver its outcomes arrive on
    pub fn new(client: ArchiveClient, runtime: Handle) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, runtime, tx }, rx)
    }

    /// Request the guild list
    pub fn fetch_guilds(&self) {
        debug!("Fetching guilds");
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.list_guilds().await;
            let _ = tx.send(FetchOutcome::Guilds(result));
        });
    }

    /// Request the channels of a guild
    pub fn fetch_channels(&self, guild: &str) {
        debug!("Fetching channels of {}", guild);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let guild = guild.to_string();
        self.runtime.spawn(async move {
            let result = client.list_channels(&guild).await;
            let _ = tx.send(FetchOutcome::Channels { guild, result });
        });
    }

    /// Request the users of a guild
    pub fn fetch_users(&self, guild: &str) {
        debug!("Fetching users of {}", guild);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let guild = guild.to_string();
        self.runtime.spawn(async move {
            let result = client.list_users(&guild).await;
            let _ = tx.send(FetchOutcome::Users { guild, result });
        });
    }

    /// Request a page of the message feed
    pub fn fetch_page(&self, request: PageRequest) {
        debug!(
            "Fetching page {} of {}/{} (generation {})",
            request.page, request.guild, request.channel, request.generation
        );
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client
                .fetch_page(&request.guild, &request.channel, request.page)
                .await;
            let _ = tx.send(FetchOutcome::Page { request, result });
        });
    }

    /// Request a user profile
    pub fn fetch_profile(&self, guild: &str, user: &UserId) {
        debug!("Fetching profile of {} in {}", user, guild);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let guild = guild.to_string();
        let user = user.clone();
        self.runtime.spawn(async move {
            let result = client.user_profile(&guild, &user).await;
            let _ = tx.send(FetchOutcome::Profile { guild, user, result });
        });
    }
}
