//! Settings change notification
//!
//! Writers (a ground station handler, a config reload) call
//! [`SettingsNotifier::notify`] from any context. The task consumes the
//! flag at the top of its next cycle and re-reads the parameter store, so
//! tunables never change in the middle of a cycle.

use core::sync::atomic::{AtomicBool, Ordering};

/// Pending-change flag shared between writers and the task
#[derive(Debug)]
pub struct SettingsNotifier {
    pending: AtomicBool,
}

impl SettingsNotifier {
    /// Created pending so the first cycle loads the settings
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(true),
        }
    }

    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume a pending notification
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::Acquire)
    }
}

impl Default for SettingsNotifier {
    fn default() -> Self {
        Self::new()
    }
}
