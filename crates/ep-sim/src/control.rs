//! Cooperative stop / pause handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle that stops or pauses a running simulation.
///
/// The tick loop checks the flags once per tick, so a request takes effect
/// at the next tick boundary.  Clones share state; hand one to another
/// thread or to an observer.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    stopped: Arc<AtomicBool>,
    paused:  Arc<AtomicBool>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Clear a previous stop request before starting a new run.
    pub(crate) fn rearm(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}
