//! Periodic schedule and cycle statistics
//!
//! The path manager runs as one cooperative periodic task. Wake times are
//! computed from the previous scheduled wake, never from "now", so time
//! spent executing a cycle does not accumulate as drift. Cycles in which
//! guidance is idle stretch to a full frame.

use crate::parameters::MAX_UPDATE_MS;

/// Length of one idle frame in milliseconds
pub const FRAME_MS: u32 = 200;

/// Poll period of the startup barrier in milliseconds
pub const FOLLOWER_POLL_MS: u32 = 1000;

/// Invalid task configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Period outside `1..=MAX_UPDATE_MS`
    InvalidPeriod(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidPeriod(ms) => {
                write!(f, "invalid update period {} ms (1..={})", ms, MAX_UPDATE_MS)
            }
        }
    }
}

/// Drift-free wake time generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicSchedule {
    period_ms: u32,
    next_wake_ms: u64,
}

impl PeriodicSchedule {
    /// Schedule whose first wake is one period after `start_ms`
    pub fn new(period_ms: u32, start_ms: u64) -> Result<Self, ConfigError> {
        validate_period(period_ms)?;
        Ok(Self {
            period_ms,
            next_wake_ms: start_ms + u64::from(period_ms),
        })
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Extra sleep of an idle cycle
    pub fn idle_extra_ms(&self) -> u32 {
        FRAME_MS.saturating_sub(self.period_ms)
    }

    /// Wake time of the upcoming cycle
    pub fn next_wake_ms(&self) -> u64 {
        self.next_wake_ms
    }

    /// Step past the cycle that just ran and return the following wake time
    pub fn advance(&mut self, idle: bool) -> u64 {
        self.next_wake_ms += u64::from(self.period_ms);
        if idle {
            self.next_wake_ms += u64::from(self.idle_extra_ms());
        }
        self.next_wake_ms
    }

    /// Change the period; takes effect from the wake after next
    pub fn set_period(&mut self, period_ms: u32) -> Result<(), ConfigError> {
        validate_period(period_ms)?;
        self.period_ms = period_ms;
        Ok(())
    }
}

fn validate_period(period_ms: u32) -> Result<(), ConfigError> {
    if period_ms == 0 || period_ms > MAX_UPDATE_MS {
        return Err(ConfigError::InvalidPeriod(period_ms));
    }
    Ok(())
}

/// Runtime statistics of the periodic task
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    /// Last cycle execution time in microseconds
    pub last_execution_us: u32,
    /// Average execution time in microseconds (EMA, alpha = 0.1)
    pub avg_execution_us: u32,
    /// Maximum execution time observed in microseconds
    pub max_execution_us: u32,
    /// Cycles whose wake came later than one period after schedule
    pub overruns: u32,
    /// Total number of cycles
    pub cycle_count: u64,
    /// Cycles skipped because guidance was idle
    pub idle_cycles: u64,
}

impl CycleStats {
    /// Record one cycle
    ///
    /// `lateness_ms` is how far the actual wake trailed the scheduled wake.
    pub fn record(&mut self, execution_us: u32, lateness_ms: u64, period_ms: u32, idle: bool) {
        self.last_execution_us = execution_us;
        self.cycle_count = self.cycle_count.saturating_add(1);
        if idle {
            self.idle_cycles = self.idle_cycles.saturating_add(1);
        }

        // avg_new = (value + 9 * avg_old) / 10
        if self.avg_execution_us == 0 {
            self.avg_execution_us = execution_us;
        } else {
            self.avg_execution_us = (execution_us + 9 * self.avg_execution_us) / 10;
        }

        if execution_us > self.max_execution_us {
            self.max_execution_us = execution_us;
        }

        if lateness_ms > u64::from(period_ms) {
            self.overruns = self.overruns.saturating_add(1);
        }
    }
}
