use resort_core::AnimationSpec;
use web_time::Duration;

/// Tunables for the reorder engine. One spring profile is shared by every
/// row so simultaneous repositioning reads as one motion.
#[derive(Clone, Copy, Debug)]
pub struct ReorderConfig {
    /// Pixels the auto-scroller advances per tick.
    pub auto_scroll_speed: f32,
    /// Fixed auto-scroll tick period, independent of the gesture rate.
    pub tick: Duration,
    /// Thickness of the top/bottom activation bands, in pixels.
    pub edge_zone: f32,
    /// Hold duration before a press arms a drag.
    pub long_press: Duration,
    /// Movement tolerated while arming; more than this abandons the press.
    pub drag_slop: f32,
    /// Animation profile for every row offset.
    pub spring: AnimationSpec,
    /// Restore the pre-drag permutation when a gesture is cancelled.
    pub rollback_on_cancel: bool,
    /// Ignore user scroll input while a drag session is active.
    pub lock_scroll_while_dragging: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            auto_scroll_speed: 8.0,
            tick: Duration::from_millis(16),
            edge_zone: 32.0,
            long_press: Duration::from_millis(500),
            drag_slop: 10.0,
            spring: AnimationSpec::spring(),
            rollback_on_cancel: true,
            lock_scroll_while_dragging: true,
        }
    }
}
