//! Asynchronous shutdown trigger.
//!
//! The host (a signal handler, a button interrupt, another thread) fires
//! the trigger; the event loop observes it once per iteration, and the
//! interval sleep polls it, then performs the same transition as an `OFF`
//! command.  The trigger never touches
//! session state itself.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │ SIGINT/TERM │────▶│                 │     │              │
//! │ GPIO ISR    │────▶│ ShutdownTrigger │────▶│  Event loop  │
//! │ Other task  │────▶│  (AtomicBool)   │     │  (consumer)  │
//! └─────────────┘     └─────────────────┘     └──────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable, lock-free shutdown request flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownTrigger {
    requested: Arc<AtomicBool>,
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.  Lock-free and async-signal-safe.
    pub fn fire(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
