//! Scroll bookkeeping for the message pane
//!
//! Heights and offsets are counted in rendered lines. The offset is measured
//! from the top of the content, so an offset of zero means the oldest loaded
//! line is at the top of the pane.

/// Scroll position of a pane over line-based content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    content_height: usize,
    view_height: usize,
}

impl Viewport {
    /// Create an empty viewport
    pub fn new() -> Self {
        Self::default()
    }

    /// First visible line
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total scrollable height
    pub fn content_height(&self) -> usize {
        self.content_height
    }

    /// Visible height
    pub fn view_height(&self) -> usize {
        self.view_height
    }

    /// Largest offset that still fills the pane
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.view_height)
    }

    /// Whether the pane shows the first line
    pub fn at_top(&self) -> bool {
        self.offset == 0
    }

    /// Whether the pane shows the last line
    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Update the pane height (after a terminal resize)
    pub fn set_view_height(&mut self, height: usize) {
        self.view_height = height;
        self.clamp();
    }

    /// Update the content height, keeping the offset in range
    pub fn set_content_height(&mut self, height: usize) {
        self.content_height = height;
        self.clamp();
    }

    /// Move toward older content
    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Move toward newer content
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
        self.clamp();
    }

    /// Jump to the first line
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    /// Bottom-align the content
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Keep the same content under the eye after lines were inserted above it
    ///
    /// `previous_height` must be captured immediately before the insert. The
    /// offset grows by exactly the inserted height, so from offset zero it
    /// becomes `new_height - previous_height`.
    pub fn preserve_after_prepend(&mut self, previous_height: usize, new_height: usize) {
        let inserted = new_height.saturating_sub(previous_height);
        self.content_height = new_height;
        self.offset = self.offset.saturating_add(inserted);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}
