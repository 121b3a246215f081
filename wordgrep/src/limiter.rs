use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex};
use tracing::trace;

/// Counting limiter bounding how many file searches run at once.
///
/// The walk thread calls [`Limiter::acquire`] before dispatching a worker;
/// the call blocks while all slots are taken. The returned [`SlotGuard`]
/// frees its slot on drop, waking one waiter. There is no FIFO guarantee,
/// only eventual progress.
#[derive(Debug)]
pub struct Limiter {
    slots: Mutex<usize>,
    freed: Condvar,
}

/// Permission to run one file search, returned to the [`Limiter`] on drop.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    limiter: &'a Limiter,
}

impl Limiter {
    /// Creates a limiter with `capacity` slots
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Mutex::new(capacity.get()),
            freed: Condvar::new(),
        }
    }

    /// Blocks until a slot is free, then takes it
    pub fn acquire(&self) -> SlotGuard<'_> {
        let mut slots = self.slots.lock().expect("limiter lock poisoned");
        while *slots == 0 {
            trace!("All slots taken, walk thread waiting");
            slots = self.freed.wait(slots).expect("limiter lock poisoned");
        }
        *slots -= 1;
        SlotGuard { limiter: self }
    }

    /// Number of free slots right now (racy, for diagnostics only)
    pub fn available(&self) -> usize {
        *self.slots.lock().expect("limiter lock poisoned")
    }

    fn release(&self) {
        let mut slots = self.slots.lock().expect("limiter lock poisoned");
        *slots += 1;
        self.freed.notify_one();
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.limiter.release();
    }
}
