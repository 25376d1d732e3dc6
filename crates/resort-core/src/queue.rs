use log::trace;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Ordered FIFO from the low-latency path to the control turn.
///
/// `push` never blocks and never runs effects inline; `drain` hands
/// everything back in issue order. Handles are cheap clones over shared
/// storage, so producers and the draining owner see one queue.
pub struct EventQueue<T>(Rc<RefCell<VecDeque<T>>>);

impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(VecDeque::new())))
    }

    pub fn push(&self, ev: T) {
        self.0.borrow_mut().push_back(ev);
    }

    pub fn drain(&self) -> Vec<T> {
        let events: Vec<T> = self.0.borrow_mut().drain(..).collect();
        if !events.is_empty() {
            trace!("drained {} queued events", events.len());
        }
        events
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}
