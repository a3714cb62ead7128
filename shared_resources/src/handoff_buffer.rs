/// ----- HANDOFF BUFFER -----
/// The only channel actors share events through. Each item is tagged with
/// the origin of the actor that produced it, and an actor may never remove
/// an item it produced itself while that item is at the head. This keeps
/// the request/response turn-taking between the scheduler and each
/// subsystem honest: nobody consumes their own message straight back.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::event::{Event, Origin};

struct Inner {
    items: VecDeque<(Origin, Event)>,
    closed: bool,
}

pub struct HandoffBuffer {
    inner: Mutex<Inner>,
    state_changed: Condvar,
    capacity: Option<usize>,
}

impl HandoffBuffer {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(Some(capacity))
    }

    fn build(capacity: Option<usize>) -> Self {
        HandoffBuffer {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            state_changed: Condvar::new(),
            capacity,
        }
    }

    /// Appends an event tagged with the producing actor's origin. Blocks
    /// while a bounded buffer is full. Returns false if the buffer was
    /// closed before the event could be stored.
    pub fn add_last(&self, event: Event, origin: Origin) -> bool {
        let mut inner = self.inner.lock();
        while !inner.closed && self.is_full(&inner) {
            self.state_changed.wait(&mut inner);
        }
        if inner.closed {
            return false;
        }
        inner.items.push_back((origin, event));
        self.state_changed.notify_all();
        true
    }

    /// Blocks until the head item was produced by someone other than
    /// `caller`, then removes and returns it. Returns None once the buffer
    /// is closed; closing is the cancellation path for blocked actors.
    pub fn remove_first(&self, caller: Origin) -> Option<Event> {
        let mut inner = self.inner.lock();
        loop {
            if let Some((producer, _)) = inner.items.front() {
                if *producer != caller {
                    let (_, event) = inner.items.pop_front().unwrap();
                    self.state_changed.notify_all();
                    return Some(event);
                }
            }
            if inner.closed {
                return None;
            }
            self.state_changed.wait(&mut inner);
        }
    }

    /// Non-blocking variant of remove_first.
    pub fn try_remove_first(&self, caller: Origin) -> Option<Event> {
        let mut inner = self.inner.lock();
        match inner.items.front() {
            Some((producer, _)) if *producer != caller => {
                let (_, event) = inner.items.pop_front().unwrap();
                self.state_changed.notify_all();
                Some(event)
            }
            _ => None,
        }
    }

    /// True if remove_first would return immediately for `caller`.
    pub fn can_remove(&self, caller: Origin) -> bool {
        let inner = self.inner.lock();
        matches!(inner.items.front(), Some((producer, _)) if *producer != caller)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Wakes every blocked actor; pending items can still be drained with
    /// try_remove_first, but blocking calls return None from here on.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.state_changed.notify_all();
    }

    fn is_full(&self, inner: &Inner) -> bool {
        match self.capacity {
            Some(capacity) => inner.items.len() >= capacity,
            None => false,
        }
    }
}

impl Default for HandoffBuffer {
    fn default() -> Self {
        Self::new()
    }
}
