//! Main TUI application state and logic

use crate::api::types::{sort_by_activity, Channel, Guild, MessagePage, UserId, UserSummary};
use crate::feed::{FeedController, FeedEffect, FeedPhase, PageRequest};
use crate::routes::Route;
use crate::tui::fetcher::{FetchOutcome, Fetcher};
use crate::tui::screens::{ChannelViewScreen, UserProfileScreen};
use crate::tui::types::{Pane, Screen};
use crate::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Application state
pub struct App {
    /// Current screen
    pub current_screen: Screen,
    /// Should quit
    pub should_quit: bool,
    /// Current location
    pub route: Route,
    /// Known guilds
    pub guilds: Vec<Guild>,
    /// Id of the selected guild
    pub selected_guild: Option<String>,
    /// Channels of the selected guild
    pub channels: Vec<Channel>,
    /// Users of the selected guild, most active first
    pub users: Vec<UserSummary>,
    /// Message feed of the selected channel
    pub feed: FeedController,
    /// Channel view screen
    pub channel_view: ChannelViewScreen,
    /// User profile screen (when active)
    pub user_profile_screen: Option<UserProfileScreen>,
    /// Route waiting for the guild list before it can be opened
    pending_route: Option<Route>,
    /// Spawns API requests
    fetcher: Fetcher,
    /// Completed requests
    outcomes: UnboundedReceiver<FetchOutcome>,
}

impl App {
    /// Create new application
    ///
    /// Nothing is fetched until [`App::start`] is called.
    pub fn new(fetcher: Fetcher, outcomes: UnboundedReceiver<FetchOutcome>) -> Self {
        Self {
            current_screen: Screen::ChannelView,
            should_quit: false,
            route: Route::Home,
            guilds: Vec::new(),
            selected_guild: None,
            channels: Vec::new(),
            users: Vec::new(),
            feed: FeedController::new(),
            channel_view: ChannelViewScreen::new(),
            user_profile_screen: None,
            pending_route: None,
            fetcher,
            outcomes,
        }
    }

    /// Fetch the guild list and open `route` once it is known
    pub fn start(&mut self, route: Route) {
        if route != Route::Home {
            self.pending_route = Some(route);
        }
        self.channel_view.set_status("Loading guilds...".to_string());
        self.fetcher.fetch_guilds();
    }

    /// Apply every finished request
    ///
    /// Returns the number of outcomes applied.
    pub fn poll_fetches(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.handle_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next finished request and apply it
    ///
    /// Returns false if no request can complete any more.
    pub async fn next_fetch(&mut self) -> bool {
        match self.outcomes.recv().await {
            Some(outcome) => {
                self.handle_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Apply one finished request to the application state
    pub fn handle_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Guilds(Ok(guilds)) => {
                info!("Loaded {} guilds", guilds.len());
                self.guilds = guilds;
                self.channel_view.guilds.clamp(self.guilds.len());
                self.channel_view.clear_status();
                if let Some(route) = self.pending_route.take() {
                    self.navigate(route);
                }
            }
            FetchOutcome::Guilds(Err(e)) => {
                warn!("Error fetching guilds: {}", e);
                self.channel_view
                    .set_error(format!("Failed to load guilds: {} (r to retry)", e));
            }
            FetchOutcome::Channels { guild, result } => {
                if self.selected_guild.as_deref() != Some(guild.as_str()) {
                    debug!("Discarding channels of deselected guild {}", guild);
                    return;
                }
                match result {
                    Ok(channels) => {
                        info!("Loaded {} channels of {}", channels.len(), guild);
                        self.channels = channels;
                        self.channel_view.channels.clamp(self.channels.len());
                    }
                    Err(e) => {
                        warn!("Error fetching channels of {}: {}", guild, e);
                        self.channel_view
                            .set_error(format!("Failed to load channels: {} (r to retry)", e));
                    }
                }
            }
            FetchOutcome::Users { guild, result } => {
                if self.selected_guild.as_deref() != Some(guild.as_str()) {
                    debug!("Discarding users of deselected guild {}", guild);
                    return;
                }
                match result {
                    Ok(mut users) => {
                        sort_by_activity(&mut users);
                        self.users = users;
                        self.channel_view.users.clamp(self.users.len());
                    }
                    Err(e) => {
                        warn!("Error fetching users of {}: {}", guild, e);
                        self.channel_view
                            .set_error(format!("Failed to load users: {} (r to retry)", e));
                    }
                }
            }
            FetchOutcome::Page { request, result } => self.apply_page_outcome(request, result),
            FetchOutcome::Profile {
                guild,
                user,
                result,
            } => {
                let Some(screen) = self
                    .user_profile_screen
                    .as_mut()
                    .filter(|screen| screen.is_for(&guild, &user))
                else {
                    debug!("Discarding profile of {} in {}", user, guild);
                    return;
                };
                match result {
                    Ok(profile) => screen.set_profile(profile),
                    Err(e) => {
                        warn!("Error fetching user profile {}: {}", user, e);
                        screen.set_error(e.to_string());
                    }
                }
            }
        }
    }

    fn apply_page_outcome(&mut self, request: PageRequest, result: Result<MessagePage>) {
        let effect = match result {
            Ok(page) => self.feed.apply_page(&request, page),
            Err(e) => {
                let effect = self.feed.apply_failure(&request, &e);
                if effect == FeedEffect::Failed {
                    self.channel_view.set_error(format!(
                        "Failed to load page {}: {} (scroll up to retry)",
                        request.page, e
                    ));
                }
                effect
            }
        };

        match effect {
            FeedEffect::Loaded { .. } => self.channel_view.clear_status(),
            FeedEffect::Prepended { count } => {
                self.channel_view
                    .set_status(format!("Loaded {} older messages", count));
            }
            FeedEffect::Exhausted => {
                self.channel_view
                    .set_status(format!("Beginning of #{}", request.channel));
            }
            FeedEffect::Failed | FeedEffect::Stale => {}
        }
    }

    /// Open a route
    ///
    /// Routes into a guild that is not in the guild list are rejected with a
    /// status message.
    pub fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route);
        if let Some(guild_id) = route.guild_id() {
            if !self.ensure_guild(guild_id) {
                return;
            }
        }

        match route {
            Route::Home => self.back_to_channel_view(),
            Route::Channel { channel_id, .. } => self.select_channel(&channel_id),
            Route::UserProfile { user_id, .. } => self.open_user_profile(user_id),
        }
    }

    fn ensure_guild(&mut self, guild_id: &str) -> bool {
        let Some(index) = self.guilds.iter().position(|g| g.id() == guild_id) else {
            warn!("Unknown guild {}", guild_id);
            self.channel_view
                .set_error(format!("Guild '{}' not found", guild_id));
            return false;
        };
        self.channel_view.guilds.selected_index = index;
        if self.selected_guild.as_deref() != Some(guild_id) {
            self.select_guild(guild_id);
        }
        true
    }

    /// Select a guild and load its channels and users
    ///
    /// Choosing a different guild drops the selected channel.
    pub fn select_guild(&mut self, guild_id: &str) {
        if self.selected_guild.as_deref() == Some(guild_id) {
            return;
        }
        info!("Selected guild {}", guild_id);

        self.selected_guild = Some(guild_id.to_string());
        self.channels.clear();
        self.users.clear();
        self.channel_view.channels = Default::default();
        self.channel_view.users = Default::default();
        self.feed.clear();
        self.route = Route::Home;

        self.fetcher.fetch_channels(guild_id);
        self.fetcher.fetch_users(guild_id);
    }

    /// Select a channel of the selected guild and load its newest page
    pub fn select_channel(&mut self, channel_id: &str) {
        let Some(guild_id) = self.selected_guild.clone() else {
            return;
        };

        if let Some(index) = self.channels.iter().position(|c| c.name == channel_id) {
            self.channel_view.channels.selected_index = index;
        }

        self.route = Route::Channel {
            guild_id: guild_id.clone(),
            channel_id: channel_id.to_string(),
        };
        self.current_screen = Screen::ChannelView;
        self.channel_view.set_status(format!("Loading #{}...", channel_id));

        let request = self.feed.select_channel(&guild_id, channel_id);
        self.fetcher.fetch_page(request);
    }

    /// Show a user's profile within the selected guild
    pub fn open_user_profile(&mut self, user_id: UserId) {
        let Some(guild_id) = self.selected_guild.clone() else {
            return;
        };

        self.route = Route::UserProfile {
            guild_id: guild_id.clone(),
            user_id: user_id.clone(),
        };
        self.fetcher.fetch_profile(&guild_id, &user_id);
        self.user_profile_screen = Some(UserProfileScreen::new(guild_id, user_id));
        self.current_screen = Screen::UserProfile;
    }

    /// Leave the profile and return to the channel view
    ///
    /// The feed is kept as it was.
    pub fn back_to_channel_view(&mut self) {
        self.user_profile_screen = None;
        self.current_screen = Screen::ChannelView;
        self.route = match (self.feed.guild(), self.feed.channel()) {
            (Some(guild), Some(channel)) => Route::Channel {
                guild_id: guild.to_string(),
                channel_id: channel.to_string(),
            },
            _ => Route::Home,
        };
    }

    /// Move the cursor of the focused list down
    pub fn next(&mut self) {
        match self.channel_view.focus {
            Pane::Guilds => self.channel_view.guilds.next(self.guilds.len()),
            Pane::Channels => self.channel_view.channels.next(self.channels.len()),
            Pane::Users => self.channel_view.users.next(self.users.len()),
            Pane::Messages => self.scroll_messages_down(1),
        }
    }

    /// Move the cursor of the focused list up
    pub fn previous(&mut self) {
        match self.channel_view.focus {
            Pane::Guilds => self.channel_view.guilds.previous(self.guilds.len()),
            Pane::Channels => self.channel_view.channels.previous(self.channels.len()),
            Pane::Users => self.channel_view.users.previous(self.users.len()),
            Pane::Messages => self.scroll_messages_up(1),
        }
    }

    /// Activate the item under the cursor of the focused list
    pub fn select(&mut self) {
        match self.channel_view.focus {
            Pane::Guilds => {
                if let Some(index) = self.channel_view.guilds.get(self.guilds.len()) {
                    let guild_id = self.guilds[index].db_file.clone();
                    self.select_guild(&guild_id);
                    self.channel_view.focus = Pane::Channels;
                }
            }
            Pane::Channels => {
                if let Some(index) = self.channel_view.channels.get(self.channels.len()) {
                    let channel_id = self.channels[index].name.clone();
                    self.select_channel(&channel_id);
                    self.channel_view.focus = Pane::Messages;
                }
            }
            Pane::Users => {
                if let Some(index) = self.channel_view.users.get(self.users.len()) {
                    let user_id = self.users[index].user_id.clone();
                    self.open_user_profile(user_id);
                }
            }
            Pane::Messages => self.feed.scroll_to_bottom(),
        }
    }

    /// Scroll the feed toward older messages, loading a page at the top
    pub fn scroll_messages_up(&mut self, lines: usize) {
        if let Some(request) = self.feed.scroll_up(lines) {
            self.request_page(request);
        }
    }

    /// Scroll the feed toward newer messages
    pub fn scroll_messages_down(&mut self, lines: usize) {
        self.feed.scroll_down(lines);
    }

    fn request_page(&mut self, request: PageRequest) {
        self.channel_view
            .set_status(format!("Loading page {}...", request.page));
        self.fetcher.fetch_page(request);
    }

    /// Add a character to the search box and refilter
    pub fn search_push(&mut self, c: char) {
        self.channel_view.add_char(c);
        self.feed.set_search(&self.channel_view.search_input);
    }

    /// Remove the last character from the search box and refilter
    pub fn search_backspace(&mut self) {
        self.channel_view.backspace();
        self.feed.set_search(&self.channel_view.search_input);
    }

    /// Clear the search box, showing every loaded message again
    pub fn search_clear(&mut self) {
        self.channel_view.clear_search();
        self.feed.set_search("");
    }

    /// Re-issue whatever failed or never loaded
    pub fn retry(&mut self) {
        if self.guilds.is_empty() {
            self.channel_view.set_status("Loading guilds...".to_string());
            self.fetcher.fetch_guilds();
            return;
        }

        if let Some(guild_id) = self.selected_guild.clone() {
            if self.channels.is_empty() {
                self.fetcher.fetch_channels(&guild_id);
            }
            if self.users.is_empty() {
                self.fetcher.fetch_users(&guild_id);
            }
        }

        if self.feed.phase() == FeedPhase::Ready && self.feed.viewport().at_top() {
            if let Some(request) = self.feed.on_scroll_top() {
                self.request_page(request);
            }
        }
    }
}
