// Wall-clock timestamps for state snapshots and torque commands
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Timestamp split into whole seconds and a nanosecond remainder.
///
/// Robot clients report sensor timestamps in this form, and torque
/// commands are stamped the same way on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct StateTimestamp {
    /// Whole seconds since the Unix epoch
    pub seconds: i64,
    /// Nanosecond remainder (0..1_000_000_000)
    pub nanos: u32,
}

impl StateTimestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            seconds: elapsed.as_secs() as i64,
            nanos: elapsed.subsec_nanos(),
        }
    }

    /// Total nanoseconds since the Unix epoch.
    pub fn as_nanos(&self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }
}
