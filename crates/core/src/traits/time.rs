//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! time providers (tokio, an RTOS tick, mock) so the sequencer's timers can
//! be tested on the host.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// The path manager measures segment timers and overshoot cadence in
/// milliseconds.
///
/// # Example
///
/// ```
/// use path_manager_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let start = time.now_ms();
/// time.advance_ms(1500);
/// assert_eq!(time.elapsed_ms_since(start), 1500);
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns elapsed milliseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_ms_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(ms: u64) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set_ms(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount.
    pub fn advance_ms(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
