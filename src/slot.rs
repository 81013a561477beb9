//! Single-slot "latest value" channel.
//!
//! Producers overwrite, consumers copy out whatever is newest. There is no
//! queue and no backpressure: a reader that falls behind simply skips the
//! intermediate values. Used to hand `TimeSample`s from the polling thread and
//! `TiltVector`s from the sensor callback to the render thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct LatestSlot<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Copy> LatestSlot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace the published value.
    pub fn publish(&self, value: T) {
        *self.guard() = value;
    }

    /// Copy of the most recently published value.
    pub fn latest(&self) -> T {
        *self.guard()
    }

    // A producer that panicked mid-write still leaves a whole `T` behind
    // (writes are a single assignment), so the poisoned value is usable.
    fn guard(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            log::warn!("[slot] recovering value from poisoned lock");
            poisoned.into_inner()
        })
    }
}
