//! Path manager task
//!
//! Everything the periodic guidance task needs besides the sequencing
//! itself: the per-cycle driver, drift-free scheduling, the startup barrier
//! and settings change delivery. The runtime (RTOS task, tokio loop) only
//! sleeps and calls into these types.

mod barrier;
mod path_manager;
mod schedule;
mod settings;

pub use barrier::StartupBarrier;
pub use path_manager::{CycleIo, CycleReport, PathManager};
pub use schedule::{ConfigError, CycleStats, PeriodicSchedule, FOLLOWER_POLL_MS, FRAME_MS};
pub use settings::SettingsNotifier;
