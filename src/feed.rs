//! Message feed controller
//!
//! Holds the loaded window of a channel's history and decides which page to
//! request next. The controller never performs I/O: selecting a channel or
//! scrolling to the top hands back a [`PageRequest`], and the caller reports
//! the outcome through [`FeedController::apply_page`] or
//! [`FeedController::apply_failure`].
//!
//! The loaded window is always a gap-free suffix of the channel history:
//! pages are applied strictly in order (1, 2, 3, ...), each page is reversed
//! to oldest-first and prepended. Every channel selection starts a new
//! generation, and a response carrying an older generation is dropped.

pub mod layout;
pub mod viewport;

use crate::api::types::{Message, MessageId, MessagePage};
use crate::Error;
use layout::{layout_messages, FeedLine};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use viewport::Viewport;

/// Lifecycle of the feed for the selected channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No channel selected
    Idle,
    /// Waiting for page 1
    Loading,
    /// Window loaded, older pages may exist
    Ready,
    /// Waiting for an older page
    LoadingOlder,
    /// An empty page was returned; the whole history is loaded
    Exhausted,
}

/// Which fetch a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Page 1, replaces the window
    Initial,
    /// An older page, prepended to the window
    Older,
}

/// A page fetch issued by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Channel generation the request was issued under
    pub generation: u64,
    /// Guild id
    pub guild: String,
    /// Channel id
    pub channel: String,
    /// Page number to fetch (1 = most recent)
    pub page: u32,
    /// Initial or older page
    pub kind: PageKind,
}

/// What applying a response did to the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEffect {
    /// Page 1 replaced the window; the pane is bottom-aligned
    Loaded {
        /// Messages in the window
        count: usize,
    },
    /// An older page was prepended; the pane offset was shifted to keep the
    /// visible content in place
    Prepended {
        /// Messages added
        count: usize,
    },
    /// The page was empty; no further pages will be requested
    Exhausted,
    /// The fetch failed; loaded messages are unchanged
    Failed,
    /// The response belongs to another channel or page and was ignored
    Stale,
}

/// Loaded messages and paging cursor of the selected channel
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Loaded messages, oldest first, unique by id
    pub messages: Vec<Message>,
    /// Highest page applied so far (1 until page 1 arrives)
    pub page: u32,
    /// False once an empty page was returned
    pub has_more: bool,
    /// Current search text
    pub search_term: String,
    pages_loaded: u32,
    ids: HashSet<MessageId>,
}

impl FeedState {
    fn new(search_term: String) -> Self {
        Self {
            messages: Vec::new(),
            page: 1,
            has_more: true,
            search_term,
            pages_loaded: 0,
            ids: HashSet::new(),
        }
    }

    /// Page the next fetch should ask for
    pub fn next_page(&self) -> u32 {
        self.pages_loaded + 1
    }
}

/// Messages whose body or author contains `term`, ignoring case
///
/// An empty term selects everything. Order is preserved.
pub fn filter_messages<'a>(messages: &'a [Message], term: &str) -> Vec<&'a Message> {
    if term.is_empty() {
        return messages.iter().collect();
    }
    let needle = term.to_lowercase();
    messages
        .iter()
        .filter(|message| message.matches_lowercase(&needle))
        .collect()
}

/// Paginated, searchable message feed of one channel at a time
#[derive(Debug)]
pub struct FeedController {
    generation: u64,
    guild: Option<String>,
    channel: Option<String>,
    phase: FeedPhase,
    loading_older: bool,
    state: FeedState,
    viewport: Viewport,
    width: usize,
    lines: Vec<FeedLine>,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self {
            generation: 0,
            guild: None,
            channel: None,
            phase: FeedPhase::Idle,
            loading_older: false,
            state: FeedState::new(String::new()),
            viewport: Viewport::new(),
            width: 0,
            lines: Vec::new(),
        }
    }

    /// Current generation (bumped on every channel change)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase
    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// Guild of the selected channel
    pub fn guild(&self) -> Option<&str> {
        self.guild.as_deref()
    }

    /// Selected channel
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Loaded state of the selected channel
    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Loaded messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Whether older pages may still exist
    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    /// Whether an older page is in flight
    pub fn is_loading_older(&self) -> bool {
        self.loading_older
    }

    /// Scroll position of the message pane
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Select a channel, discarding the previous window
    ///
    /// Returns the page-1 request to issue. Any response still in flight for
    /// the previous channel will be ignored when it arrives.
    pub fn select_channel(&mut self, guild: &str, channel: &str) -> PageRequest {
        self.generation += 1;
        self.guild = Some(guild.to_string());
        self.channel = Some(channel.to_string());
        self.phase = FeedPhase::Loading;
        self.loading_older = false;
        self.state = FeedState::new(std::mem::take(&mut self.state.search_term));
        self.viewport.scroll_to_top();
        self.relayout();

        info!("Selected channel {}/{} (generation {})", guild, channel, self.generation);

        PageRequest {
            generation: self.generation,
            guild: guild.to_string(),
            channel: channel.to_string(),
            page: 1,
            kind: PageKind::Initial,
        }
    }

    /// Drop the selected channel (for example when another guild is chosen)
    pub fn clear(&mut self) {
        self.generation += 1;
        self.guild = None;
        self.channel = None;
        self.phase = FeedPhase::Idle;
        self.loading_older = false;
        self.state = FeedState::new(std::mem::take(&mut self.state.search_term));
        self.viewport.scroll_to_top();
        self.relayout();
    }

    /// The pane reached offset zero
    ///
    /// Returns the next older page to fetch, or `None` when nothing should be
    /// requested: no channel, history exhausted, or a fetch already in flight.
    /// If page 1 never arrived it is requested again.
    pub fn on_scroll_top(&mut self) -> Option<PageRequest> {
        let (guild, channel) = match (&self.guild, &self.channel) {
            (Some(guild), Some(channel)) => (guild.clone(), channel.clone()),
            _ => return None,
        };

        if self.phase != FeedPhase::Ready || !self.state.has_more || self.loading_older {
            return None;
        }

        let page = self.state.next_page();
        let kind = if page == 1 {
            self.phase = FeedPhase::Loading;
            PageKind::Initial
        } else {
            self.loading_older = true;
            self.phase = FeedPhase::LoadingOlder;
            PageKind::Older
        };

        debug!("Requesting page {} of {}/{}", page, guild, channel);

        Some(PageRequest {
            generation: self.generation,
            guild,
            channel,
            page,
            kind,
        })
    }

    /// Apply a successful response
    pub fn apply_page(&mut self, request: &PageRequest, page: MessagePage) -> FeedEffect {
        if !self.is_current(request) || page.page != request.page {
            warn!(
                "Discarding stale page {} for {}/{} (generation {}, current {})",
                request.page, request.guild, request.channel, request.generation, self.generation
            );
            return FeedEffect::Stale;
        }

        self.loading_older = false;

        if page.is_empty() {
            info!(
                "Channel {}/{} has no messages past page {}",
                request.guild, request.channel, self.state.pages_loaded
            );
            self.state.has_more = false;
            self.phase = FeedPhase::Exhausted;
            if request.kind == PageKind::Initial {
                self.relayout();
                self.viewport.scroll_to_bottom();
            }
            return FeedEffect::Exhausted;
        }

        let previous_height = self.lines.len();
        let incoming = page.into_oldest_first();
        let mut fresh = Vec::with_capacity(incoming.len());
        for message in incoming {
            if self.state.ids.insert(message.id.clone()) {
                fresh.push(message);
            } else {
                warn!("Dropping duplicate message {} on page {}", message.id, request.page);
            }
        }
        let count = fresh.len();

        self.state.pages_loaded = request.page;
        self.state.page = request.page;
        self.phase = FeedPhase::Ready;

        match request.kind {
            PageKind::Initial => {
                self.state.messages = fresh;
                self.relayout();
                self.viewport.scroll_to_bottom();
                FeedEffect::Loaded { count }
            }
            PageKind::Older => {
                fresh.append(&mut self.state.messages);
                self.state.messages = fresh;
                self.relayout_keeping(previous_height);
                FeedEffect::Prepended { count }
            }
        }
    }

    /// Apply a failed fetch
    ///
    /// Loaded messages and `has_more` are left alone so the same page can be
    /// requested again by the next scroll to the top.
    pub fn apply_failure(&mut self, request: &PageRequest, error: &Error) -> FeedEffect {
        if !self.is_current(request) {
            debug!("Ignoring failure of stale page {} request: {}", request.page, error);
            return FeedEffect::Stale;
        }

        warn!(
            "Failed to load page {} of {}/{}: {}",
            request.page, request.guild, request.channel, error
        );

        self.loading_older = false;
        self.phase = FeedPhase::Ready;
        FeedEffect::Failed
    }

    /// Set the search text
    pub fn set_search(&mut self, term: &str) {
        if self.state.search_term == term {
            return;
        }
        self.state.search_term = term.to_string();
        self.relayout();
    }

    /// Current search text
    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    /// Loaded messages matching the search text, oldest first
    pub fn filtered(&self) -> Vec<&Message> {
        filter_messages(&self.state.messages, &self.state.search_term)
    }

    /// Resize the message pane
    pub fn set_view_size(&mut self, height: usize, width: usize) {
        self.viewport.set_view_height(height);
        if width != self.width {
            self.width = width;
            let at_bottom = self.viewport.at_bottom();
            self.relayout();
            if at_bottom {
                self.viewport.scroll_to_bottom();
            }
        }
    }

    /// Scroll toward older messages
    ///
    /// Reaching the top returns the request for the next older page, if any.
    pub fn scroll_up(&mut self, lines: usize) -> Option<PageRequest> {
        self.viewport.scroll_up(lines);
        if self.viewport.at_top() {
            self.on_scroll_top()
        } else {
            None
        }
    }

    /// Scroll toward newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.viewport.scroll_down(lines);
    }

    /// Jump to the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.viewport.scroll_to_bottom();
    }

    /// Lines currently inside the pane
    pub fn visible_lines(&self) -> &[FeedLine] {
        let start = self.viewport.offset().min(self.lines.len());
        let end = (start + self.viewport.view_height()).min(self.lines.len());
        &self.lines[start..end]
    }

    /// All laid-out lines of the filtered view
    pub fn lines(&self) -> &[FeedLine] {
        &self.lines
    }

    fn is_current(&self, request: &PageRequest) -> bool {
        request.generation == self.generation
            && request.page == self.state.next_page()
            && self.guild.as_deref() == Some(request.guild.as_str())
            && self.channel.as_deref() == Some(request.channel.as_str())
    }

    fn layout(&self) -> Vec<FeedLine> {
        layout_messages(&self.filtered(), self.width)
    }

    fn relayout(&mut self) {
        self.lines = self.layout();
        self.viewport.set_content_height(self.lines.len());
    }

    fn relayout_keeping(&mut self, previous_height: usize) {
        self.lines = self.layout();
        self.viewport
            .preserve_after_prepend(previous_height, self.lines.len());
    }
}
