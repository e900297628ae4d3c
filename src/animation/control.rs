use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Flags {
    cancelled: AtomicBool,
    paused: AtomicBool,
}

/// Cancel/pause flags for one animation run.
///
/// Clones share the same flags, so a UI thread can hold a clone while the animator ticks. A new
/// run gets a fresh control; cancelling is one-way.
#[derive(Clone, Debug, Default)]
pub struct AnimationControl {
    flags: Arc<Flags>,
}

impl AnimationControl {
    /// Fresh control: not cancelled, not paused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Observed at the next tick.
    pub fn cancel(&self) {
        self.flags.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flags.cancelled.load(Ordering::SeqCst)
    }

    /// Set the paused flag.
    pub fn set_paused(&self, paused: bool) {
        self.flags.paused.store(paused, Ordering::SeqCst);
    }

    /// Flip the paused flag and return the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.flags.paused.fetch_xor(true, Ordering::SeqCst)
    }

    /// Whether the run is paused.
    pub fn is_paused(&self) -> bool {
        self.flags.paused.load(Ordering::SeqCst)
    }

    /// Whether `other` is a handle to the same run.
    pub fn same_run(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.flags, &other.flags)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/control.rs"]
mod tests;
