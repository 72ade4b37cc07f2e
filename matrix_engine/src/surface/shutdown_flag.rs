/// Cooperative shutdown request shared with signal handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable stop flag checked once per main-loop iteration
///
/// The inner `Arc<AtomicBool>` can be handed to `signal_hook::flag::register`
/// so SIGINT/SIGTERM end the loop at the next frame boundary.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Shared atomic, for registration with signal handlers
    pub fn as_atomic(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[cfg(test)]
#[path = "shutdown_flag_tests.rs"]
mod tests;
