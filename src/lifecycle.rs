//! Cooperative shutdown.
//!
//! The tray writes the signal, the watch loop reads it once per cycle after
//! sleeping. Nothing else is shared between the two.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cloneable stop request shared between the control surface and the watch loop.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the watch loop to stop after its current cycle.
    ///
    /// Safe to call from any thread; only the first call has an effect.
    pub fn request_stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            tracing::info!("Stop requested, watcher will exit after the current cycle");
        }
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
