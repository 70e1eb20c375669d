//! HTTP client for the archive REST API
//!
//! All endpoints live under `{base}/api/guilds`. Guild ids are database file
//! names and channel ids are table names, so every path segment is
//! percent-encoded rather than formatted into the URL by hand.

use crate::api::types::{Channel, Guild, Message, MessagePage, UserId, UserProfile, UserSummary};
use crate::settings::Settings;
use crate::{Error, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Body of an API error response
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Async client for the archive API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ArchiveClient {
    /// Create a client for the given base URL (e.g. `http://localhost:5001`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, http })
    }

    /// Create a client from application settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_base_url, settings.request_timeout())
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/guilds`
    pub async fn list_guilds(&self) -> Result<Vec<Guild>> {
        let url = self.endpoint(&["guilds"])?;
        self.get_json(url).await
    }

    /// `GET /api/guilds/{guild}/channels`
    pub async fn list_channels(&self, guild: &str) -> Result<Vec<Channel>> {
        let url = self.endpoint(&["guilds", guild, "channels"])?;
        self.get_json(url).await
    }

    /// `GET /api/guilds/{guild}/channels/{channel}?page={page}`
    ///
    /// Messages come back newest first, exactly as the API sends them.
    pub async fn fetch_page(&self, guild: &str, channel: &str, page: u32) -> Result<MessagePage> {
        let mut url = self.endpoint(&["guilds", guild, "channels", channel])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let messages: Vec<Message> = self.get_json(url).await?;
        debug!("Fetched page {} of {}/{}: {} messages", page, guild, channel, messages.len());

        Ok(MessagePage { page, messages })
    }

    /// `GET /api/guilds/{guild}/users`
    pub async fn list_users(&self, guild: &str) -> Result<Vec<UserSummary>> {
        let url = self.endpoint(&["guilds", guild, "users"])?;
        self.get_json(url).await
    }

    /// `GET /api/guilds/{guild}/users/{user}`
    pub async fn user_profile(&self, guild: &str, user: &UserId) -> Result<UserProfile> {
        let url = self.endpoint(&["guilds", guild, "users", user.as_str()])?;
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            warn!("GET {} failed with status {}: {}", url, status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
