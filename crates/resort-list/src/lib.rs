//! # resort-list
//!
//! Drag-to-reorder for a virtualized vertical list: long-press a row, drag
//! it, and the list reorders live with variable row heights and
//! edge-triggered auto-scroll. The crate is the *engine* only; the
//! virtualized view, row rendering, and scroll physics stay outside and talk
//! to it through plain calls.
//!
//! The moving parts, leaf first:
//!
//! - [`PositionTable`] — identity → visual slot, a permutation at all times.
//! - [`HeightTable`] — identity → last-measured pixel height.
//! - [`resolver`] — pure swap resolution: pointer offset in, target slot and
//!   the minimal slot reassignments out.
//! - [`DragMachine`] — the per-gesture state machine (`Idle → Armed →
//!   Dragging → Idle`) that owns the drag session.
//! - [`AutoScroll`] — edge-zone watcher driving periodic scroll advances.
//! - [`ReorderableList`] — the container that owns the logical order and
//!   wires everything together.
//!
//! A host embeds the container, forwards pointer and measurement input, and
//! calls [`ReorderableList::pump`] once per frame:
//!
//! ```rust
//! use resort_list::{ItemId, ReorderableList};
//!
//! let mut list = ReorderableList::new(
//!     vec![(0u64, "Inbox"), (1, "Starred"), (2, "Archive")],
//!     |row| ItemId(row.0),
//!     |row, dragging| format!("{}{}", if dragging { "* " } else { "" }, row.1),
//! );
//! list.set_viewport_extent(400.0);
//! for i in 0..3 {
//!     list.report_height(ItemId(i), 56.0);
//! }
//! // forward pointer_down / pointer_move / pointer_up, pump() each frame,
//! // then read the result:
//! let order = list.current_data();
//! assert_eq!(order.len(), 3);
//! ```

mod autoscroll;
mod config;
mod drag;
mod error;
mod events;
mod gesture;
mod heights;
mod list;
mod positions;
pub mod resolver;
mod viewport;

pub use autoscroll::{AutoScroll, ScrollDirection};
pub use config::ReorderConfig;
pub use drag::{DragMachine, DragPhase};
pub use error::DragError;
pub use events::ControlEvent;
pub use gesture::{ArmedPress, PressTracker};
pub use heights::HeightTable;
pub use list::ReorderableList;
pub use positions::{PositionSnapshot, PositionTable};
pub use viewport::Viewport;

/// Stable identity of a list item, distinct from the slot it occupies.
/// String-keyed callers hash their keys to 64 bits on their side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ItemId(pub u64);

/// Integer position in the current visual ordering.
pub type Slot = usize;
