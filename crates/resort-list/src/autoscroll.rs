use crate::events::ControlEvent;
use crate::viewport::Viewport;
use log::debug;
use resort_core::{EventQueue, now};
use std::cell::Cell;
use std::rc::Rc;
use web_time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScrollDirection {
    Up,
    Down,
    Stop,
}

/// Edge-triggered auto-scroll coordinator.
///
/// Knows nothing about the drag. It receives viewport-relative edge checks,
/// forwards *direction transitions* to the control turn (re-announcing the
/// same direction every frame is suppressed so the tick never restarts
/// needlessly), and, once a direction is applied, advances the scroll offset
/// on a fixed-rate tick until stopped or pinned at a boundary.
#[derive(Clone)]
pub struct AutoScroll(Rc<Inner>);

struct Inner {
    viewport: Viewport,
    queue: EventQueue<ControlEvent>,
    speed: f32,
    tick: Duration,
    edge_zone: f32,
    /// Last direction forwarded from an edge check.
    announced: Cell<ScrollDirection>,
    /// Direction currently driving the tick.
    active: Cell<ScrollDirection>,
    last_tick: Cell<Option<Instant>>,
}

impl AutoScroll {
    pub fn new(
        viewport: Viewport,
        queue: EventQueue<ControlEvent>,
        speed: f32,
        tick: Duration,
        edge_zone: f32,
    ) -> Self {
        Self(Rc::new(Inner {
            viewport,
            queue,
            speed,
            tick,
            edge_zone,
            announced: Cell::new(ScrollDirection::Stop),
            active: Cell::new(ScrollDirection::Stop),
            last_tick: Cell::new(None),
        }))
    }

    /// Edge check for the dragged row's viewport-relative box. Posts an
    /// `AutoScroll` event only when the direction transitions.
    pub fn check(&self, top_in_viewport: f32, row_height: f32) {
        let inner = &*self.0;
        let viewport_h = inner.viewport.viewport_extent();
        let dir = if top_in_viewport < inner.edge_zone {
            ScrollDirection::Up
        } else if top_in_viewport + row_height > viewport_h - inner.edge_zone {
            ScrollDirection::Down
        } else {
            ScrollDirection::Stop
        };
        if dir != inner.announced.get() {
            inner.announced.set(dir);
            debug!("auto-scroll direction: {dir:?}");
            inner.queue.push(ControlEvent::AutoScroll(dir));
        }
    }

    /// Control-turn application of a direction request: starts or stops the
    /// repeating tick.
    pub fn set_direction(&self, dir: ScrollDirection) {
        let inner = &*self.0;
        if dir == inner.active.get() {
            return;
        }
        inner.active.set(dir);
        inner.last_tick.set(match dir {
            ScrollDirection::Stop => None,
            _ => Some(now()),
        });
    }

    pub fn direction(&self) -> ScrollDirection {
        self.0.active.get()
    }

    pub fn is_active(&self) -> bool {
        self.0.active.get() != ScrollDirection::Stop
    }

    /// Advances the fixed-rate tick off the clock; slow frames catch up with
    /// multiple ticks. Returns the pixels actually scrolled. Once the offset
    /// is pinned at a boundary the coordinator self-stops.
    pub fn pump(&self) -> f32 {
        let inner = &*self.0;
        let step = match inner.active.get() {
            ScrollDirection::Stop => return 0.0,
            ScrollDirection::Up => -inner.speed,
            ScrollDirection::Down => inner.speed,
        };
        let Some(mut last) = inner.last_tick.get() else {
            return 0.0;
        };

        let mut moved = 0.0;
        let t = now();
        while t.saturating_duration_since(last) >= inner.tick {
            last += inner.tick;
            let consumed = step - inner.viewport.scroll_by(step);
            moved += consumed;
            if consumed == 0.0 {
                debug!("auto-scroll pinned at boundary, stopping");
                inner.active.set(ScrollDirection::Stop);
                inner.announced.set(ScrollDirection::Stop);
                inner.last_tick.set(None);
                inner.queue.push(ControlEvent::AutoScroll(ScrollDirection::Stop));
                return moved;
            }
        }
        inner.last_tick.set(Some(last));
        moved
    }

    /// Immediate stop: used at drag end and container teardown. No tick
    /// survives this call.
    pub fn force_stop(&self) {
        let inner = &*self.0;
        inner.active.set(ScrollDirection::Stop);
        inner.announced.set(ScrollDirection::Stop);
        inner.last_tick.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_core::animation::{TestClock, set_clock};

    fn setup() -> (AutoScroll, Viewport, EventQueue<ControlEvent>, TestClock) {
        let clock = TestClock::new();
        set_clock(Rc::new(clock.clone()));
        let viewport = Viewport::new();
        viewport.set_viewport_extent(400.0);
        viewport.set_content_extent(1000.0);
        let queue = EventQueue::new();
        let scroller = AutoScroll::new(
            viewport.clone(),
            queue.clone(),
            8.0,
            Duration::from_millis(16),
            32.0,
        );
        (scroller, viewport, queue, clock)
    }

    #[test]
    fn test_check_forwards_only_transitions() {
        let (scroller, _, queue, _) = setup();

        scroller.check(10.0, 50.0);
        scroller.check(5.0, 50.0);
        scroller.check(0.0, 50.0);
        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.drain(),
            vec![ControlEvent::AutoScroll(ScrollDirection::Up)]
        );

        scroller.check(200.0, 50.0);
        scroller.check(380.0, 50.0);
        assert_eq!(
            queue.drain(),
            vec![
                ControlEvent::AutoScroll(ScrollDirection::Stop),
                ControlEvent::AutoScroll(ScrollDirection::Down),
            ]
        );
    }

    #[test]
    fn test_tick_cadence() {
        let (scroller, viewport, _, clock) = setup();
        assert_eq!(scroller.direction(), ScrollDirection::Stop);
        scroller.set_direction(ScrollDirection::Down);
        assert_eq!(scroller.direction(), ScrollDirection::Down);

        clock.advance(Duration::from_millis(48));
        assert_eq!(scroller.pump(), 24.0);
        assert_eq!(viewport.offset(), 24.0);

        // Less than one period: nothing happens.
        clock.advance(Duration::from_millis(10));
        assert_eq!(scroller.pump(), 0.0);
        // The remainder carries into the next period.
        clock.advance(Duration::from_millis(6));
        assert_eq!(scroller.pump(), 8.0);
    }

    #[test]
    fn test_self_stops_at_bottom_boundary() {
        let (scroller, viewport, queue, clock) = setup();
        scroller.set_direction(ScrollDirection::Down);
        queue.drain();

        clock.advance(Duration::from_secs(5));
        let moved = scroller.pump();

        // content 1000, container 400: stops exactly at 600.
        assert_eq!(moved, 600.0);
        assert_eq!(viewport.offset(), 600.0);
        assert!(!scroller.is_active());
        assert_eq!(scroller.direction(), ScrollDirection::Stop);
        assert_eq!(
            queue.drain(),
            vec![ControlEvent::AutoScroll(ScrollDirection::Stop)]
        );

        // Nothing moves after the stop.
        clock.advance(Duration::from_secs(1));
        assert_eq!(scroller.pump(), 0.0);
        assert_eq!(viewport.offset(), 600.0);
    }

    #[test]
    fn test_self_stops_at_top() {
        let (scroller, viewport, _, clock) = setup();
        viewport.set_offset(20.0);
        scroller.set_direction(ScrollDirection::Up);

        clock.advance(Duration::from_secs(1));
        scroller.pump();
        assert_eq!(viewport.offset(), 0.0);
        assert!(!scroller.is_active());
    }

    #[test]
    fn test_force_stop_halts_ticking() {
        let (scroller, viewport, _, clock) = setup();
        scroller.set_direction(ScrollDirection::Down);
        scroller.force_stop();

        clock.advance(Duration::from_secs(1));
        assert_eq!(scroller.pump(), 0.0);
        assert_eq!(viewport.offset(), 0.0);
    }
}
