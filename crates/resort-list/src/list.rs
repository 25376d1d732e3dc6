//! # Reorderable list container
//!
//! `ReorderableList` owns the logical order and wires the engine together:
//! the position/height tables, the drag state machine, the long-press
//! recognizer, and the auto-scroll coordinator.
//!
//! The host (a virtualized list view) renders the *logical* sequence and
//! forwards three kinds of input: pointer events, per-row height
//! measurements, and scroll deltas. Live reorder is expressed purely through
//! per-row translation offsets, so the sequence itself never re-renders
//! mid-drag; the logical order is spliced exactly once, when a drag
//! completes.
//!
//! Two execution contexts cooperate. The pointer/measure entry points are
//! the latency-critical path: they mutate the tables synchronously and only
//! *post* consumer-visible effects. [`ReorderableList::pump`] is the control
//! turn: it polls the recognizer, advances the auto-scroll tick and the row
//! animations, and drains the posted events in issue order. Hosts call it
//! once per frame while it returns true.
//!
//! Every visible row subscribes to its own key in the position table and
//! re-targets its offset when its slot changes. That reactive rule, not
//! central orchestration, is how N rows reposition simultaneously.

use crate::autoscroll::AutoScroll;
use crate::config::ReorderConfig;
use crate::drag::{DragMachine, DragPhase};
use crate::events::ControlEvent;
use crate::gesture::{ArmedPress, PressTracker};
use crate::heights::HeightTable;
use crate::positions::PositionTable;
use crate::resolver;
use crate::viewport::Viewport;
use crate::{ItemId, Slot};
use log::debug;
use resort_core::{AnimatedValue, Dispose, EventQueue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Per-visible-row state: the animated translation offset plus the table
/// subscription that marks it dirty.
struct Row {
    offset: RefCell<AnimatedValue<f32>>,
    dirty: Rc<Cell<bool>>,
    sub: Dispose,
}

/// Drag-to-reorder container for a virtualized vertical list.
///
/// `T` is the caller's row payload; the engine only ever looks at the
/// identity extracted from it, which must be unique per render (a documented
/// precondition, not a runtime-checked error). `V` is whatever the render
/// function produces.
pub struct ReorderableList<T, V> {
    items: Vec<T>,
    key_of: Rc<dyn Fn(&T) -> ItemId>,
    render: Rc<dyn Fn(&T, bool) -> V>,
    config: ReorderConfig,

    positions: PositionTable,
    heights: HeightTable,
    viewport: Viewport,
    autoscroll: AutoScroll,
    queue: EventQueue<ControlEvent>,
    drag: DragMachine,
    tracker: PressTracker,

    rows: HashMap<ItemId, Row>,
    drag_origin_y: f32,

    on_drag_start: Option<Rc<dyn Fn(Slot)>>,
    on_drag_end: Option<Rc<dyn Fn(Slot, Slot)>>,
    can_drag: Option<Rc<dyn Fn(&T) -> bool>>,
    disposed: bool,
}

impl<T, V> ReorderableList<T, V> {
    pub fn new(
        items: Vec<T>,
        key_of: impl Fn(&T) -> ItemId + 'static,
        render: impl Fn(&T, bool) -> V + 'static,
    ) -> Self {
        Self::with_config(items, key_of, render, ReorderConfig::default())
    }

    pub fn with_config(
        items: Vec<T>,
        key_of: impl Fn(&T) -> ItemId + 'static,
        render: impl Fn(&T, bool) -> V + 'static,
        config: ReorderConfig,
    ) -> Self {
        let positions = PositionTable::new();
        let heights = HeightTable::new();
        let viewport = Viewport::new();
        let queue = EventQueue::new();
        let autoscroll = AutoScroll::new(
            viewport.clone(),
            queue.clone(),
            config.auto_scroll_speed,
            config.tick,
            config.edge_zone,
        );
        let drag = DragMachine::new(
            positions.clone(),
            heights.clone(),
            viewport.clone(),
            autoscroll.clone(),
            queue.clone(),
            config.rollback_on_cancel,
        );
        let tracker = PressTracker::new(config.long_press, config.drag_slop);

        let mut list = Self {
            items: Vec::new(),
            key_of: Rc::new(key_of),
            render: Rc::new(render),
            config,
            positions,
            heights,
            viewport,
            autoscroll,
            queue,
            drag,
            tracker,
            rows: HashMap::new(),
            drag_origin_y: 0.0,
            on_drag_start: None,
            on_drag_end: None,
            can_drag: None,
            disposed: false,
        };
        list.set_items(items);
        list
    }

    pub fn on_drag_start(mut self, f: impl Fn(Slot) + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(f));
        self
    }

    pub fn on_drag_end(mut self, f: impl Fn(Slot, Slot) + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(f));
        self
    }

    /// Rows failing the predicate never arm a drag.
    pub fn can_drag(mut self, f: impl Fn(&T) -> bool + 'static) -> Self {
        self.can_drag = Some(Rc::new(f));
        self
    }

    /// Supplies a new ordered sequence. Re-supplying the identical id
    /// sequence leaves the logical order and position table untouched. An
    /// active drag is cancelled first.
    pub fn set_items(&mut self, items: Vec<T>) {
        if self.drag.is_active() {
            self.drag.cancel();
            self.drain_events();
        }
        let ids: Vec<ItemId> = items.iter().map(|t| (self.key_of)(t)).collect();
        self.items = items;
        self.positions.reset_from_order(&ids);
        self.heights.retain(&ids);

        self.rows.retain(|id, row| {
            let keep = ids.contains(id);
            if !keep {
                row.sub.run();
            }
            keep
        });
        for &id in &ids {
            if !self.rows.contains_key(&id) {
                let row = self.make_row(id);
                self.rows.insert(id, row);
            }
        }
        self.viewport.set_content_extent(self.heights.total());
    }

    /// The logical order as of the most recent completed drag. A plain
    /// query; never forces rendering.
    pub fn current_data(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Renders the row at a logical index through the caller's render
    /// function, flagging the actively dragged row.
    pub fn render_row(&self, index: usize) -> Option<V> {
        let item = self.items.get(index)?;
        let id = (self.key_of)(item);
        Some((self.render)(item, self.drag.active_id() == Some(id)))
    }

    /// Current animated translation for a row, relative to its rendered
    /// position in the logical order.
    pub fn row_offset(&self, id: ItemId) -> f32 {
        self.rows
            .get(&id)
            .map(|row| *row.offset.borrow().get())
            .unwrap_or(0.0)
    }

    pub fn is_dragging(&self, id: ItemId) -> bool {
        self.drag.active_id() == Some(id)
    }

    pub fn dragging(&self) -> Option<ItemId> {
        self.drag.active_id()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Measurement input from the view layer, keyed by identity.
    pub fn report_height(&mut self, id: ItemId, height: f32) {
        if self.heights.set(id, height) {
            self.viewport.set_content_extent(self.heights.total());
            if self.drag.is_active() {
                // Next-frame math uses the new value; a visible snap is
                // acceptable and not corrected.
                for row in self.rows.values() {
                    row.dirty.set(true);
                }
            }
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_extent(&self, h: f32) {
        self.viewport.set_viewport_extent(h);
    }

    pub fn scroll_offset(&self) -> f32 {
        self.viewport.offset()
    }

    /// User scroll input. Returns the leftover delta; while a drag is active
    /// and scroll locking is configured, nothing is consumed.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        if self.config.lock_scroll_while_dragging && self.drag.is_active() {
            return delta;
        }
        self.viewport.scroll_by(delta)
    }

    pub fn pointer_down(&mut self, id: ItemId, y: f32) {
        if self.disposed || self.drag.is_active() {
            // One session system-wide; presses during a drag are ignored.
            return;
        }
        if let Some(can) = self.can_drag.clone() {
            match self.item_by_id(id) {
                Some(item) if can(item) => {}
                _ => return,
            }
        }
        self.tracker.down(id, y);
    }

    pub fn pointer_move(&mut self, y: f32) {
        if self.drag.is_active() {
            let _ = self.drag.update(y - self.drag_origin_y);
            return;
        }
        if let Some(press) = self.tracker.move_to(y) {
            self.start_drag(press);
            if self.drag.is_active() {
                let _ = self.drag.update(y - self.drag_origin_y);
            }
        }
    }

    pub fn pointer_up(&mut self) {
        if self.drag.is_active() {
            let _ = self.drag.end();
        } else {
            self.tracker.up();
        }
        self.drain_events();
    }

    /// System-interrupted gesture: the session ends without a reorder.
    pub fn pointer_cancel(&mut self) {
        if self.drag.is_active() {
            self.drag.cancel();
        } else {
            self.tracker.cancel();
        }
        self.drain_events();
    }

    /// Forcibly ends any active drag without reordering.
    pub fn cancel_drag(&mut self) {
        self.pointer_cancel();
    }

    /// One control turn. Polls the recognizer, advances the auto-scroll
    /// tick (then re-runs the drag math so swaps continue under a still
    /// pointer), drains posted events in issue order, and steps the row
    /// animations. Returns true while anything still needs frames.
    pub fn pump(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if let Some(press) = self.tracker.poll() {
            self.start_drag(press);
        }
        if self.autoscroll.pump() != 0.0 {
            self.drag.refresh();
        }
        self.drain_events();
        let animating = self.advance_rows();
        animating || self.autoscroll.is_active() || self.drag.is_active()
    }

    /// Cancels any active session, stops the tick, and tears down every row
    /// subscription. Safe to call twice; also runs from `Drop`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if self.drag.is_active() {
            self.drag.cancel();
        }
        self.autoscroll.force_stop();
        self.queue.drain();
        for row in self.rows.values() {
            row.sub.run();
        }
        self.rows.clear();
        self.disposed = true;
    }

    fn item_by_id(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|t| (self.key_of)(t) == id)
    }

    fn make_row(&self, id: ItemId) -> Row {
        let dirty = Rc::new(Cell::new(false));
        let key = {
            let dirty = dirty.clone();
            self.positions.subscribe_key(id, move |_| dirty.set(true))
        };
        let sub = {
            let positions = self.positions.clone();
            Dispose::new(move || positions.unsubscribe_key(id, key))
        };
        Row {
            offset: RefCell::new(AnimatedValue::new(0.0, self.config.spring)),
            dirty,
            sub,
        }
    }

    fn start_drag(&mut self, press: ArmedPress) {
        match self.drag.begin(press.id) {
            Ok(_) => self.drag_origin_y = press.origin_y,
            Err(err) => debug!("drag not started: {err}"),
        }
    }

    fn drain_events(&mut self) {
        loop {
            let events = self.queue.drain();
            if events.is_empty() {
                break;
            }
            for ev in events {
                match ev {
                    ControlEvent::DragStarted { origin } => {
                        if let Some(cb) = &self.on_drag_start {
                            cb(origin);
                        }
                    }
                    ControlEvent::DragEnded { from, to } => self.finish_reorder(from, to),
                    ControlEvent::DragCancelled { .. } => {
                        // Rollback already republished the table; the dirty
                        // marks drive the rows home.
                    }
                    ControlEvent::AutoScroll(dir) => {
                        // A direction request can trail the end of its drag;
                        // never restart the tick for a finished session.
                        if self.drag.is_active() {
                            self.autoscroll.set_direction(dir);
                        }
                    }
                }
            }
        }
    }

    /// Splices the logical order once per completed drag and rebases every
    /// row's offset so nothing jumps when its base position changes.
    fn finish_reorder(&mut self, from: Slot, to: Slot) {
        let old_base = self.base_offsets();
        if from != to && from < self.items.len() && to < self.items.len() {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        let new_base = self.base_offsets();

        let ids: Vec<ItemId> = self.items.iter().map(|t| (self.key_of)(t)).collect();
        self.positions.reset_from_order(&ids);

        for (id, row) in &self.rows {
            let old = old_base.get(id).copied().unwrap_or(0.0);
            let new = new_base.get(id).copied().unwrap_or(0.0);
            let mut offset = row.offset.borrow_mut();
            let rebased = old + *offset.get() - new;
            if rebased.abs() < 0.5 {
                offset.snap(0.0);
            } else {
                offset.snap(rebased);
                offset.set_target(0.0);
            }
            row.dirty.set(false);
        }

        if let Some(cb) = &self.on_drag_end {
            cb(from, to);
        }
    }

    /// Re-targets dirty rows and steps every animation one frame.
    fn advance_rows(&self) -> bool {
        let drag_active = self.drag.is_active();
        let mut base: Option<HashMap<ItemId, f32>> = None;
        let mut animating = false;
        for (&id, row) in &self.rows {
            if row.dirty.replace(false) {
                let target = if drag_active {
                    let base = base.get_or_insert_with(|| self.base_offsets());
                    let slot = self.positions.get(id).unwrap_or(0);
                    resolver::slot_top(slot, &self.positions, &self.heights)
                        - base.get(&id).copied().unwrap_or(0.0)
                } else {
                    0.0
                };
                row.offset.borrow_mut().set_target(target);
            }
            if row.offset.borrow_mut().update() {
                animating = true;
            }
        }
        animating
    }

    /// Absolute Y of each row's top under the logical order.
    fn base_offsets(&self) -> HashMap<ItemId, f32> {
        let mut map = HashMap::with_capacity(self.items.len());
        let mut y = 0.0;
        for item in &self.items {
            let id = (self.key_of)(item);
            map.insert(id, y);
            y += self.heights.get(id);
        }
        map
    }
}

impl<T, V> Drop for ReorderableList<T, V> {
    fn drop(&mut self) {
        self.dispose();
    }
}
