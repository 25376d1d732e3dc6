use crate::ItemId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Last-measured pixel height per identity, populated lazily as each row's
/// view reports its layout. Unmeasured rows read as 0 and take no part in
/// swap math until measured.
#[derive(Clone, Default)]
pub struct HeightTable(Rc<RefCell<HashMap<ItemId, f32>>>);

impl HeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a measurement. Idempotent: re-reporting the same height is a
    /// no-op. Returns true when the stored value changed.
    pub fn set(&self, id: ItemId, height: f32) -> bool {
        if height <= 0.0 {
            return false;
        }
        let mut map = self.0.borrow_mut();
        if map.get(&id) == Some(&height) {
            return false;
        }
        map.insert(id, height);
        true
    }

    /// 0.0 until the first measurement arrives.
    pub fn get(&self, id: ItemId) -> f32 {
        self.0.borrow().get(&id).copied().unwrap_or(0.0)
    }

    pub fn is_measured(&self, id: ItemId) -> bool {
        self.get(id) > 0.0
    }

    /// Content extent: the sum of every measured height.
    pub fn total(&self) -> f32 {
        self.0.borrow().values().sum()
    }

    /// Drops measurements for identities no longer in the list.
    pub fn retain(&self, ids: &[ItemId]) {
        let keep: HashSet<ItemId> = ids.iter().copied().collect();
        self.0.borrow_mut().retain(|id, _| keep.contains(id));
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
