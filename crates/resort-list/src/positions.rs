use crate::resolver;
use crate::{ItemId, Slot};
use resort_core::SubKey;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

/// Observable map from item identity to current visual slot.
///
/// The table is a permutation of `[0, N)` at all times: exactly one identity
/// maps to each slot, and the ordering is re-derivable by sorting identities
/// by slot. Mutations complete before subscribers run, so a read scheduled
/// off a publish always observes the post-mutation table.
///
/// Duplicate identities in a supplied order are a documented precondition
/// violation; the table does not validate them.
#[derive(Clone, Default)]
pub struct PositionTable(Rc<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
    slots: HashMap<ItemId, Slot>,
    key_subs: HashMap<ItemId, SlotMap<SubKey, Rc<dyn Fn(Slot)>>>,
    any_subs: SlotMap<SubKey, Rc<dyn Fn()>>,
}

/// Frozen copy of the table, used for cancel rollback.
#[derive(Clone, Debug)]
pub struct PositionSnapshot(HashMap<ItemId, Slot>);

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().slots.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.0.borrow().slots.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<Slot> {
        self.0.borrow().slots.get(&id).copied()
    }

    /// Linear scan; N is a rendered-window count, not the dataset.
    pub fn id_at(&self, slot: Slot) -> Option<ItemId> {
        self.0
            .borrow()
            .slots
            .iter()
            .find(|&(_, s)| *s == slot)
            .map(|(id, _)| *id)
    }

    /// Every `(identity, slot)` pair, in table order.
    pub fn entries(&self) -> Vec<(ItemId, Slot)> {
        self.0.borrow().slots.iter().map(|(id, s)| (*id, *s)).collect()
    }

    /// Identities sorted by slot.
    pub fn ordered_ids(&self) -> Vec<ItemId> {
        let mut entries = self.entries();
        entries.sort_by_key(|&(_, s)| s);
        entries.into_iter().map(|(id, _)| id).collect()
    }

    pub fn set(&self, id: ItemId, slot: Slot) {
        self.0.borrow_mut().slots.insert(id, slot);
        self.publish(&[id]);
    }

    /// Shifts every slot in `range` by `delta`.
    pub fn shift(&self, range: Range<Slot>, delta: isize) {
        let mut changed: SmallVec<[ItemId; 8]> = SmallVec::new();
        {
            let mut inner = self.0.borrow_mut();
            for (id, slot) in inner.slots.iter_mut() {
                if range.contains(slot) {
                    *slot = slot.saturating_add_signed(delta);
                    changed.push(*id);
                }
            }
        }
        self.publish(&changed);
    }

    /// Re-derives the table from a caller-supplied order (identity → its
    /// sequence index). Supplying an identical order is a no-op: nothing is
    /// published.
    pub fn reset_from_order(&self, order: &[ItemId]) {
        let next: HashMap<ItemId, Slot> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let changed: SmallVec<[ItemId; 8]> = {
            let inner = self.0.borrow();
            if inner.slots == next {
                return;
            }
            next.iter()
                .filter(|&(id, slot)| inner.slots.get(id) != Some(slot))
                .map(|(id, _)| *id)
                .collect()
        };
        self.0.borrow_mut().slots = next;
        self.publish(&changed);
    }

    /// Moves `dragged` from slot `from` to slot `to` as one logical step:
    /// every slot strictly between them, inclusive of the far end, shifts
    /// one toward `from`. The table stays a permutation, and subscribers see
    /// it only after the whole reassignment lands.
    pub fn apply_move(&self, dragged: ItemId, from: Slot, to: Slot) {
        if from == to {
            return;
        }
        let moves = resolver::plan_moves(from, to);
        let mut changed: SmallVec<[ItemId; 8]> = SmallVec::new();
        {
            let mut inner = self.0.borrow_mut();
            // Resolve occupants before any slot is rewritten.
            let occupants: SmallVec<[(ItemId, Slot); 8]> = moves
                .iter()
                .filter_map(|m| {
                    inner
                        .slots
                        .iter()
                        .find(|&(id, s)| *s == m.from && *id != dragged)
                        .map(|(id, _)| (*id, m.to))
                })
                .collect();
            for (id, slot) in occupants {
                inner.slots.insert(id, slot);
                changed.push(id);
            }
            inner.slots.insert(dragged, to);
            changed.push(dragged);
        }
        self.publish(&changed);
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot(self.0.borrow().slots.clone())
    }

    pub fn restore(&self, snap: &PositionSnapshot) {
        let changed: SmallVec<[ItemId; 8]> = {
            let inner = self.0.borrow();
            snap.0
                .iter()
                .filter(|&(id, slot)| inner.slots.get(id) != Some(slot))
                .map(|(id, _)| *id)
                .collect()
        };
        if changed.is_empty() {
            return;
        }
        self.0.borrow_mut().slots = snap.0.clone();
        self.publish(&changed);
    }

    /// Subscribe to slot changes for one identity.
    pub fn subscribe_key(&self, id: ItemId, f: impl Fn(Slot) + 'static) -> SubKey {
        self.0
            .borrow_mut()
            .key_subs
            .entry(id)
            .or_default()
            .insert(Rc::new(f))
    }

    pub fn unsubscribe_key(&self, id: ItemId, key: SubKey) {
        if let Some(subs) = self.0.borrow_mut().key_subs.get_mut(&id) {
            subs.remove(key);
        }
    }

    /// Subscribe to any table mutation.
    pub fn subscribe_any(&self, f: impl Fn() + 'static) -> SubKey {
        self.0.borrow_mut().any_subs.insert(Rc::new(f))
    }

    pub fn unsubscribe_any(&self, key: SubKey) {
        self.0.borrow_mut().any_subs.remove(key);
    }

    // Publish after the mutation completes; no table borrow is held across
    // callbacks.
    fn publish(&self, changed: &[ItemId]) {
        if changed.is_empty() {
            return;
        }
        let mut keyed: SmallVec<[(Rc<dyn Fn(Slot)>, Slot); 8]> = SmallVec::new();
        let anys: SmallVec<[Rc<dyn Fn()>; 4]> = {
            let inner = self.0.borrow();
            for id in changed {
                let Some(slot) = inner.slots.get(id).copied() else {
                    continue;
                };
                if let Some(subs) = inner.key_subs.get(id) {
                    keyed.extend(subs.values().map(|cb| (cb.clone(), slot)));
                }
            }
            inner.any_subs.values().cloned().collect()
        };
        for (cb, slot) in keyed {
            cb(slot);
        }
        for cb in anys {
            cb();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ids(n: u64) -> Vec<ItemId> {
        (0..n).map(ItemId).collect()
    }

    fn assert_permutation(table: &PositionTable, n: usize) {
        let mut slots: Vec<Slot> = table.entries().iter().map(|&(_, s)| s).collect();
        slots.sort();
        assert_eq!(slots, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_reset_from_order() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(4));
        assert_eq!(table.get(ItemId(0)), Some(0));
        assert_eq!(table.get(ItemId(3)), Some(3));
        assert_eq!(table.ordered_ids(), ids(4));
        assert_permutation(&table, 4);
    }

    #[test]
    fn test_reset_identical_order_publishes_nothing() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(3));

        let count = Rc::new(RefCell::new(0));
        let count_clone = count.clone();
        table.subscribe_any(move || *count_clone.borrow_mut() += 1);

        table.reset_from_order(&ids(3));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_apply_move_down_shifts_between() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(5));

        table.apply_move(ItemId(0), 0, 3);
        assert_eq!(table.get(ItemId(0)), Some(3));
        assert_eq!(table.get(ItemId(1)), Some(0));
        assert_eq!(table.get(ItemId(2)), Some(1));
        assert_eq!(table.get(ItemId(3)), Some(2));
        assert_eq!(table.get(ItemId(4)), Some(4));
        assert_permutation(&table, 5);
    }

    #[test]
    fn test_apply_move_up_shifts_between() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(5));

        table.apply_move(ItemId(4), 4, 1);
        assert_eq!(table.get(ItemId(4)), Some(1));
        assert_eq!(table.get(ItemId(1)), Some(2));
        assert_eq!(table.get(ItemId(2)), Some(3));
        assert_eq!(table.get(ItemId(3)), Some(4));
        assert_eq!(table.get(ItemId(0)), Some(0));
        assert_permutation(&table, 5);
    }

    #[test]
    fn test_permutation_survives_move_sequences() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(6));

        let script = [(0, 5), (5, 2), (2, 4), (4, 0), (0, 3)];
        let mut dragged = ItemId(0);
        for (from, to) in script {
            assert_eq!(table.get(dragged), Some(from));
            table.apply_move(dragged, from, to);
            assert_permutation(&table, 6);
        }
        // Moving a different item keeps the invariant too.
        dragged = table.id_at(0).unwrap();
        table.apply_move(dragged, 0, 5);
        assert_permutation(&table, 6);
    }

    #[test]
    fn test_shift_then_set_composes_a_move() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(5));
        // Move the slot-0 item to the end via the raw primitives.
        table.shift(1..5, -1);
        table.set(ItemId(0), 4);
        assert_eq!(
            table.ordered_ids(),
            vec![ItemId(1), ItemId(2), ItemId(3), ItemId(4), ItemId(0)]
        );
        assert_permutation(&table, 5);
    }

    #[test]
    fn test_key_subscription_sees_post_mutation_slot() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(3));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let reader = table.clone();
        table.subscribe_key(ItemId(2), move |slot| {
            // The publish runs after the whole reassignment landed.
            assert_eq!(reader.get(ItemId(2)), Some(slot));
            seen_clone.borrow_mut().push(slot);
        });

        table.apply_move(ItemId(0), 0, 2);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_unsubscribe_key_stops_delivery() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(2));

        let count = Rc::new(RefCell::new(0));
        let count_clone = count.clone();
        let key = table.subscribe_key(ItemId(1), move |_| *count_clone.borrow_mut() += 1);

        table.apply_move(ItemId(0), 0, 1);
        table.unsubscribe_key(ItemId(1), key);
        table.apply_move(ItemId(0), 1, 0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_snapshot_restore() {
        let table = PositionTable::new();
        table.reset_from_order(&ids(4));
        let snap = table.snapshot();

        table.apply_move(ItemId(0), 0, 3);
        table.apply_move(ItemId(0), 3, 1);
        table.restore(&snap);

        assert_eq!(table.ordered_ids(), ids(4));
        assert_permutation(&table, 4);
    }
}
