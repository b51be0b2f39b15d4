//! Startup barrier
//!
//! Guidance is pointless without a path follower to fly the segments, so
//! the task does not start its loop until the follower is running. While
//! waiting, the path manager alarm is held critical.

use crate::traits::{AlarmSink, FollowerMonitor};
use crate::{log_info, log_warn};

/// Gate that opens once the path follower runs
#[derive(Debug, Default)]
pub struct StartupBarrier {
    released: bool,
    alarm_held: bool,
}

impl StartupBarrier {
    pub const fn new() -> Self {
        Self {
            released: false,
            alarm_held: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Check the follower once; `true` when the loop may start
    ///
    /// The caller polls again after [`FOLLOWER_POLL_MS`](super::FOLLOWER_POLL_MS)
    /// while this returns `false`.
    pub fn poll(&mut self, follower: &dyn FollowerMonitor, alarm: &mut dyn AlarmSink) -> bool {
        if self.released {
            return true;
        }

        if !follower.follower_running() {
            if !self.alarm_held {
                log_warn!("Path follower not running, holding path manager");
                self.alarm_held = true;
            }
            alarm.set_critical();
            return false;
        }

        alarm.clear();
        self.alarm_held = false;
        self.released = true;
        log_info!("Path follower running, starting path manager");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockFollower, RecordingAlarm};

    #[test]
    fn test_barrier_holds_alarm_until_follower_runs() {
        let mut barrier = StartupBarrier::new();
        let mut follower = MockFollower { running: false };
        let mut alarm = RecordingAlarm::default();

        assert!(!barrier.poll(&follower, &mut alarm));
        assert!(!barrier.poll(&follower, &mut alarm));
        assert!(alarm.critical);
        assert!(!barrier.is_released());

        follower.running = true;
        assert!(barrier.poll(&follower, &mut alarm));
        assert!(!alarm.critical);
        assert_eq!(alarm.cleared, 1);
    }

    #[test]
    fn test_barrier_released_immediately() {
        let mut barrier = StartupBarrier::new();
        let follower = MockFollower { running: true };
        let mut alarm = RecordingAlarm::default();

        assert!(barrier.poll(&follower, &mut alarm));
        assert_eq!(alarm.raised, 0);

        // Later polls do not touch the alarm again
        assert!(barrier.poll(&follower, &mut alarm));
        assert_eq!(alarm.cleared, 1);
    }
}
