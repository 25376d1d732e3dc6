//! Swap resolution for an in-progress drag.
//!
//! Pure functions over the two tables. Given the dragged item's absolute Y
//! offset (pixels from the top of content), [`target_slot`] scans the
//! non-dragged items in slot order, accumulating their heights, and decides
//! which of them the dragged item has *passed*: an item counts as passed only
//! when the offset strictly exceeds its vertical center. Exact center
//! equality resolves to "not yet past", which pins the dragged item to the
//! lower slot until it truly crosses and keeps the boundary from
//! oscillating.
//!
//! The scan is O(N) per update. N is the rendered window, and updates arrive
//! at most at display refresh rate, so no incremental index structure is
//! kept.
//!
//! Unmeasured rows (height 0) take no part: they contribute nothing to the
//! running total and are never selected as a boundary, so a drag over them
//! resolves as if they were not there.

use crate::heights::HeightTable;
use crate::positions::PositionTable;
use crate::{ItemId, Slot};
use smallvec::SmallVec;

/// One slot reassignment within a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotMove {
    pub from: Slot,
    pub to: Slot,
}

/// Resolves the slot the dragged item currently occupies. The result is
/// always a valid slot of the present table.
pub fn target_slot(
    dragged: ItemId,
    offset_top: f32,
    positions: &PositionTable,
    heights: &HeightTable,
) -> Slot {
    let Some(current) = positions.get(dragged) else {
        return 0;
    };

    let mut order = positions.entries();
    order.sort_by_key(|&(_, s)| s);

    let mut running = 0.0;
    // Deepest slot whose occupant the drag has passed, and the first it has
    // not.
    let mut passed: Option<Slot> = None;
    let mut ahead: Option<Slot> = None;
    for (id, slot) in order {
        if id == dragged {
            continue;
        }
        let h = heights.get(id);
        if h <= 0.0 {
            continue;
        }
        let center = running + h * 0.5;
        if offset_top > center {
            passed = Some(slot);
            running += h;
        } else {
            ahead = Some(slot);
            break;
        }
    }

    match (passed, ahead) {
        // Pulled below its own slot: land on the deepest passed occupant.
        (Some(below), _) if below > current => below,
        // Pulled above it: take the first occupant not yet passed.
        (_, Some(above)) if above < current => above,
        _ => current,
    }
}

/// The minimal reassignments that move a dragged item from `from` to `to`:
/// every slot strictly between them, inclusive of the far end, shifts one
/// toward `from`. Applying these plus `dragged → to` keeps the table a
/// permutation.
pub fn plan_moves(from: Slot, to: Slot) -> SmallVec<[SlotMove; 8]> {
    let mut moves = SmallVec::new();
    if to > from {
        for s in from + 1..=to {
            moves.push(SlotMove { from: s, to: s - 1 });
        }
    } else {
        for s in to..from {
            moves.push(SlotMove { from: s, to: s + 1 });
        }
    }
    moves
}

/// Absolute Y of a slot's top edge under the current permutation: the summed
/// heights of every row occupying an earlier slot.
pub fn slot_top(slot: Slot, positions: &PositionTable, heights: &HeightTable) -> f32 {
    positions
        .entries()
        .into_iter()
        .filter(|&(_, s)| s < slot)
        .map(|(id, _)| heights.get(id))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(n: u64, h: f32) -> (PositionTable, HeightTable) {
        let positions = PositionTable::new();
        let ids: Vec<ItemId> = (0..n).map(ItemId).collect();
        positions.reset_from_order(&ids);
        let heights = HeightTable::new();
        for id in ids {
            heights.set(id, h);
        }
        (positions, heights)
    }

    #[test]
    fn test_uniform_drag_down() {
        // Five 60px rows; non-dragged centers land at 30/90/150/210.
        let (positions, heights) = fixture(5, 60.0);
        assert_eq!(target_slot(ItemId(0), 190.0, &positions, &heights), 3);
    }

    #[test]
    fn test_uniform_drag_up() {
        let (positions, heights) = fixture(5, 60.0);
        positions.apply_move(ItemId(0), 0, 4);
        // Non-dragged centers are 30/90/150/210; offset 100 passes two.
        assert_eq!(target_slot(ItemId(0), 100.0, &positions, &heights), 2);
        assert_eq!(target_slot(ItemId(0), 10.0, &positions, &heights), 0);
    }

    #[test]
    fn test_center_tie_stays_at_lower_slot() {
        let (positions, heights) = fixture(5, 60.0);
        // Exactly on the third center: not yet past.
        assert_eq!(target_slot(ItemId(0), 150.0, &positions, &heights), 2);
        assert_eq!(target_slot(ItemId(0), 150.001, &positions, &heights), 3);
    }

    #[test]
    fn test_no_crossing_keeps_current_slot() {
        let (positions, heights) = fixture(5, 60.0);
        positions.apply_move(ItemId(0), 0, 2);
        // Sitting between the second and third non-dragged centers.
        assert_eq!(target_slot(ItemId(0), 100.0, &positions, &heights), 2);
    }

    #[test]
    fn test_clamped_to_ends() {
        let (positions, heights) = fixture(4, 50.0);
        assert_eq!(target_slot(ItemId(0), 10_000.0, &positions, &heights), 3);
        positions.apply_move(ItemId(0), 0, 3);
        assert_eq!(target_slot(ItemId(0), -10_000.0, &positions, &heights), 0);
    }

    #[test]
    fn test_variable_heights() {
        let positions = PositionTable::new();
        positions.reset_from_order(&[ItemId(0), ItemId(1), ItemId(2)]);
        let heights = HeightTable::new();
        heights.set(ItemId(0), 20.0);
        heights.set(ItemId(1), 200.0);
        heights.set(ItemId(2), 40.0);
        // Dragging the short row: the tall row's center is at 100.
        assert_eq!(target_slot(ItemId(0), 90.0, &positions, &heights), 0);
        assert_eq!(target_slot(ItemId(0), 110.0, &positions, &heights), 1);
    }

    #[test]
    fn test_unmeasured_row_never_targeted() {
        let positions = PositionTable::new();
        positions.reset_from_order(&[ItemId(0), ItemId(1), ItemId(2), ItemId(3)]);
        let heights = HeightTable::new();
        heights.set(ItemId(0), 60.0);
        // ItemId(1) unmeasured; measured non-dragged centers: 30 and 90.
        heights.set(ItemId(2), 60.0);
        heights.set(ItemId(3), 60.0);

        // Barely moved: stays put instead of swapping with the ghost row.
        assert_eq!(target_slot(ItemId(0), 10.0, &positions, &heights), 0);
        // Past the first measured center: lands on that row's slot.
        assert_eq!(target_slot(ItemId(0), 40.0, &positions, &heights), 2);
    }

    #[test]
    fn test_plan_moves_down() {
        let moves = plan_moves(1, 4);
        assert_eq!(
            moves.as_slice(),
            &[
                SlotMove { from: 2, to: 1 },
                SlotMove { from: 3, to: 2 },
                SlotMove { from: 4, to: 3 },
            ]
        );
    }

    #[test]
    fn test_plan_moves_up() {
        let moves = plan_moves(3, 1);
        assert_eq!(
            moves.as_slice(),
            &[SlotMove { from: 1, to: 2 }, SlotMove { from: 2, to: 3 }]
        );
    }

    #[test]
    fn test_plan_moves_noop() {
        assert!(plan_moves(2, 2).is_empty());
    }

    #[test]
    fn test_slot_top() {
        let (positions, heights) = fixture(4, 50.0);
        assert_eq!(slot_top(0, &positions, &heights), 0.0);
        assert_eq!(slot_top(2, &positions, &heights), 100.0);
        positions.apply_move(ItemId(0), 0, 3);
        assert_eq!(slot_top(3, &positions, &heights), 150.0);
    }
}
