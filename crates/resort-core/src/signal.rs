use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Stable handle to a subscription; never reused while the sub is live.
    pub struct SubKey;
}

#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: SlotMap<SubKey, Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Borrow-read without requiring `T: Clone`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.publish();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        self.publish();
    }

    /// Subscribers may read the signal re-entrantly; writing from a
    /// subscriber is not supported.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubKey {
        self.0.borrow_mut().subs.insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, key: SubKey) {
        self.0.borrow_mut().subs.remove(key);
    }

    // Publish after the mutation completes; the value borrow is not held
    // across callbacks.
    fn publish(&self) {
        let cbs: SmallVec<[Rc<dyn Fn(&T)>; 4]> =
            self.0.borrow().subs.values().cloned().collect();
        for cb in cbs {
            cb(&self.0.borrow().value);
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
