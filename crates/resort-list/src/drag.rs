use crate::autoscroll::AutoScroll;
use crate::error::DragError;
use crate::events::ControlEvent;
use crate::heights::HeightTable;
use crate::positions::{PositionSnapshot, PositionTable};
use crate::resolver;
use crate::viewport::Viewport;
use crate::{ItemId, Slot};
use log::{debug, trace, warn};
use resort_core::EventQueue;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragPhase {
    Idle,
    /// Long-press recognized; waiting for the first movement.
    Armed,
    Dragging,
}

/// Ephemeral record of the in-progress gesture. At most one exists
/// system-wide; it is effectively the mutex over who may mutate the position
/// table through the drag path.
struct DragSession {
    id: ItemId,
    start_slot: Slot,
    /// Absolute Y of the row's top at drag start: summed heights of every
    /// row then occupying an earlier slot.
    start_offset: f32,
    current_offset: f32,
    /// Latest raw pointer delta, kept so auto-scroll can re-run the math
    /// while the pointer is stationary.
    pointer_dy: f32,
    scroll_at_start: f32,
    /// Pre-drag permutation, for cancel rollback.
    snapshot: PositionSnapshot,
}

/// The per-gesture state machine: `Idle → Armed → Dragging → Idle`, with
/// `Dragging → Idle` on cancellation.
///
/// On every update it reads the height table to place the dragged row,
/// asks the resolver for a target slot, commits the reassignment into the
/// position table as one logical step, and requests an edge check from the
/// auto-scroll coordinator. Consumer-visible effects go through the event
/// queue and run in the control turn, never inside the gesture callback.
pub struct DragMachine {
    positions: PositionTable,
    heights: HeightTable,
    viewport: Viewport,
    autoscroll: AutoScroll,
    queue: EventQueue<ControlEvent>,
    rollback_on_cancel: bool,
    phase: DragPhase,
    session: Option<DragSession>,
}

impl DragMachine {
    pub fn new(
        positions: PositionTable,
        heights: HeightTable,
        viewport: Viewport,
        autoscroll: AutoScroll,
        queue: EventQueue<ControlEvent>,
        rollback_on_cancel: bool,
    ) -> Self {
        Self {
            positions,
            heights,
            viewport,
            autoscroll,
            queue,
            rollback_on_cancel,
            phase: DragPhase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_id(&self) -> Option<ItemId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Starts a session for `id`. Rejected while another session is active;
    /// the recognizer normally enforces that before we are called.
    pub fn begin(&mut self, id: ItemId) -> Result<Slot, DragError> {
        if self.session.is_some() {
            warn!("drag rejected: a session is already active");
            return Err(DragError::DragInProgress);
        }
        let slot = self.positions.get(id).ok_or(DragError::UnknownItem(id))?;
        let start_offset = resolver::slot_top(slot, &self.positions, &self.heights);

        self.session = Some(DragSession {
            id,
            start_slot: slot,
            start_offset,
            current_offset: start_offset,
            pointer_dy: 0.0,
            scroll_at_start: self.viewport.offset(),
            snapshot: self.positions.snapshot(),
        });
        self.phase = DragPhase::Armed;
        debug!("drag armed: {id:?} at slot {slot}");
        self.queue.push(ControlEvent::DragStarted { origin: slot });
        Ok(slot)
    }

    /// Gesture update with the raw pointer delta since the press origin.
    /// The absolute offset folds in the net scroll movement since start, so
    /// the row does not drift when auto-scroll fires under a still pointer.
    pub fn update(&mut self, pointer_dy: f32) -> Result<(), DragError> {
        let Some(session) = self.session.as_mut() else {
            return Err(DragError::NoActiveDrag);
        };
        self.phase = DragPhase::Dragging;
        session.pointer_dy = pointer_dy;
        let scroll_moved = self.viewport.offset() - session.scroll_at_start;
        session.current_offset = session.start_offset + pointer_dy + scroll_moved;

        let id = session.id;
        let offset = session.current_offset;

        let current = self.positions.get(id).ok_or(DragError::UnknownItem(id))?;
        let target = resolver::target_slot(id, offset, &self.positions, &self.heights);
        if target != current {
            trace!("swap {id:?}: slot {current} -> {target}");
            self.positions.apply_move(id, current, target);
        }

        let height = self.heights.get(id);
        self.autoscroll.check(offset - self.viewport.offset(), height);
        Ok(())
    }

    /// Re-runs the update math with the last pointer delta. Called after an
    /// auto-scroll tick advances the offset so swaps continue while the
    /// pointer holds still.
    pub fn refresh(&mut self) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        if let Some(dy) = self.session.as_ref().map(|s| s.pointer_dy) {
            let _ = self.update(dy);
        }
    }

    /// Ends the session cleanly and posts exactly one `DragEnded`, even when
    /// the row never left its starting slot.
    pub fn end(&mut self) -> Result<(Slot, Slot), DragError> {
        let session = self.session.take().ok_or(DragError::NoActiveDrag)?;
        let to = self
            .positions
            .get(session.id)
            .unwrap_or(session.start_slot);
        self.phase = DragPhase::Idle;
        self.autoscroll.force_stop();
        debug!(
            "drag ended: {:?} slot {} -> {to}",
            session.id, session.start_slot
        );
        self.queue.push(ControlEvent::DragEnded {
            from: session.start_slot,
            to,
        });
        Ok((session.start_slot, to))
    }

    /// Aborted gesture: no `DragEnded` fires, and with rollback enabled the
    /// pre-drag permutation is restored.
    pub fn cancel(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.phase = DragPhase::Idle;
        self.autoscroll.force_stop();
        if self.rollback_on_cancel {
            self.positions.restore(&session.snapshot);
        }
        debug!("drag cancelled: {:?}", session.id);
        self.queue.push(ControlEvent::DragCancelled {
            origin: session.start_slot,
        });
    }
}
