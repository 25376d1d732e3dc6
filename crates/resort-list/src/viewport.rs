use resort_core::{Signal, signal};

/// The engine's handle onto the external scroll position: current offset
/// plus the container and content extents. Scroll physics (flings, rubber
/// banding) live outside; writes from the auto-scroll tick are immediate
/// jumps.
#[derive(Clone)]
pub struct Viewport {
    scroll_offset: Signal<f32>,
    viewport_extent: Signal<f32>,
    content_extent: Signal<f32>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_offset: signal(0.0),
            viewport_extent: signal(0.0),
            content_extent: signal(0.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.scroll_offset.get()
    }

    pub fn viewport_extent(&self) -> f32 {
        self.viewport_extent.get()
    }

    pub fn content_extent(&self) -> f32 {
        self.content_extent.get()
    }

    pub fn max_scroll_extent(&self) -> f32 {
        (self.content_extent.get() - self.viewport_extent.get()).max(0.0)
    }

    pub fn set_viewport_extent(&self, h: f32) {
        self.viewport_extent.set(h.max(0.0));
        self.clamp_offset();
    }

    pub fn set_content_extent(&self, h: f32) {
        self.content_extent.set(h.max(0.0));
        self.clamp_offset();
    }

    pub fn set_offset(&self, off: f32) {
        self.scroll_offset.set(off.clamp(0.0, self.max_scroll_extent()));
    }

    /// Consume a scroll delta in px. Returns the leftover the viewport could
    /// not take (for nested scrolling).
    pub fn scroll_by(&self, delta: f32) -> f32 {
        let before = self.scroll_offset.get();
        let after = (before + delta).clamp(0.0, self.max_scroll_extent());
        self.scroll_offset.set(after);
        delta - (after - before)
    }

    fn clamp_offset(&self) {
        let clamped = self.scroll_offset.get().clamp(0.0, self.max_scroll_extent());
        self.scroll_offset.set(clamped);
    }
}
