use crate::Slot;
use crate::autoscroll::ScrollDirection;

/// Effects posted by the latency-critical path and drained, in issue order,
/// by the control turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    DragStarted { origin: Slot },
    /// Fires exactly once per completed drag, even when `from == to`.
    DragEnded { from: Slot, to: Slot },
    DragCancelled { origin: Slot },
    AutoScroll(ScrollDirection),
}
