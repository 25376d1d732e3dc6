use crate::ItemId;
use resort_core::now;
use web_time::{Duration, Instant};

/// A press that survived the hold threshold and arms a drag.
#[derive(Clone, Copy, Debug)]
pub struct ArmedPress {
    pub id: ItemId,
    pub origin_y: f32,
}

/// Long-press recognizer for the drag gesture.
///
/// A press arms a drag only after the hold duration elapses with less than
/// `slop` pixels of movement. Shorter presses are ordinary taps, and
/// movement beyond the slop abandons the press entirely. The threshold fires
/// either from a move event or from the clock-driven [`PressTracker::poll`],
/// so a perfectly still finger still arms.
pub struct PressTracker {
    long_press: Duration,
    slop: f32,
    press: Option<Press>,
}

struct Press {
    id: ItemId,
    started: Instant,
    origin_y: f32,
    abandoned: bool,
}

impl PressTracker {
    pub fn new(long_press: Duration, slop: f32) -> Self {
        Self {
            long_press,
            slop,
            press: None,
        }
    }

    pub fn down(&mut self, id: ItemId, y: f32) {
        self.press = Some(Press {
            id,
            started: now(),
            origin_y: y,
            abandoned: false,
        });
    }

    /// Track movement; may arm if the hold threshold already elapsed.
    pub fn move_to(&mut self, y: f32) -> Option<ArmedPress> {
        let press = self.press.as_mut()?;
        if !press.abandoned && (y - press.origin_y).abs() > self.slop {
            press.abandoned = true;
        }
        self.try_arm()
    }

    /// Clock poll so the threshold fires without a move event.
    pub fn poll(&mut self) -> Option<ArmedPress> {
        self.try_arm()
    }

    /// Pointer released before arming: an ordinary tap, not an error.
    pub fn up(&mut self) {
        self.press = None;
    }

    pub fn cancel(&mut self) {
        self.press = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.press.is_some()
    }

    fn try_arm(&mut self) -> Option<ArmedPress> {
        let press = self.press.as_ref()?;
        if press.abandoned {
            return None;
        }
        if now().saturating_duration_since(press.started) < self.long_press {
            return None;
        }
        // Fires once.
        let press = self.press.take()?;
        Some(ArmedPress {
            id: press.id,
            origin_y: press.origin_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_core::animation::{TestClock, set_clock};
    use std::rc::Rc;

    fn tracker() -> (PressTracker, TestClock) {
        let clock = TestClock::new();
        set_clock(Rc::new(clock.clone()));
        (PressTracker::new(Duration::from_millis(500), 10.0), clock)
    }

    #[test]
    fn test_hold_arms_via_poll() {
        let (mut tracker, clock) = tracker();
        tracker.down(ItemId(7), 42.0);

        clock.advance(Duration::from_millis(499));
        assert!(tracker.poll().is_none());

        clock.advance(Duration::from_millis(1));
        let armed = tracker.poll().expect("press should arm");
        assert_eq!(armed.id, ItemId(7));
        assert_eq!(armed.origin_y, 42.0);

        // Fires once.
        assert!(tracker.poll().is_none());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_short_press_is_a_tap() {
        let (mut tracker, clock) = tracker();
        tracker.down(ItemId(1), 0.0);
        clock.advance(Duration::from_millis(100));
        tracker.up();

        clock.advance(Duration::from_secs(1));
        assert!(tracker.poll().is_none());
    }

    #[test]
    fn test_movement_beyond_slop_abandons() {
        let (mut tracker, clock) = tracker();
        tracker.down(ItemId(1), 0.0);
        assert!(tracker.move_to(11.0).is_none());

        clock.advance(Duration::from_secs(1));
        assert!(tracker.poll().is_none());
        assert!(tracker.move_to(0.0).is_none());
    }

    #[test]
    fn test_movement_within_slop_still_arms() {
        let (mut tracker, clock) = tracker();
        tracker.down(ItemId(1), 0.0);
        tracker.move_to(5.0);

        clock.advance(Duration::from_millis(500));
        assert!(tracker.move_to(6.0).is_some());
    }

    #[test]
    fn test_cancel_clears_press() {
        let (mut tracker, clock) = tracker();
        tracker.down(ItemId(1), 0.0);
        tracker.cancel();
        clock.advance(Duration::from_secs(1));
        assert!(tracker.poll().is_none());
    }
}
