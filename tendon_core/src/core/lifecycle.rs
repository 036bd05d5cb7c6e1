//! Controller lifecycle state machine
//!
//! The single authoritative status of the custom controller, plus episode
//! bookkeeping over the state log. All of it lives inside the controller
//! manager's lifecycle lock; nothing here synchronizes on its own.

use std::fmt;
use tendon_types::{EpisodeInterval, UNSET_INDEX};

/// Lifecycle status of the custom controller.
///
/// Exactly one status variable exists per session; both the tick path and
/// the lifecycle-command path read and write it under the same lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// No custom controller has been loaded this session
    Uninitialized,
    /// A custom controller is installed and waiting for its first tick
    Ready,
    /// The custom controller is producing torques
    Running,
    /// Termination requested; finalized on the next tick
    Terminating,
    /// The episode is closed; control is back on the default policy
    Terminated,
}

impl fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerStatus::Uninitialized => write!(f, "Uninitialized"),
            ControllerStatus::Ready => write!(f, "Ready"),
            ControllerStatus::Running => write!(f, "Running"),
            ControllerStatus::Terminating => write!(f, "Terminating"),
            ControllerStatus::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Episode bookkeeping: the state-log index range over which a custom
/// policy was active, plus the policy's step counter.
///
/// `begin` is recorded exactly once per episode, on the Ready→Running
/// transition; `end` exactly once, on the Terminating→Terminated
/// transition. Both hold -1 until recorded.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeTracker {
    begin: i64,
    end: i64,
    steps: u64,
}

impl EpisodeTracker {
    pub fn new() -> Self {
        Self {
            begin: UNSET_INDEX,
            end: UNSET_INDEX,
            steps: 0,
        }
    }

    /// Clear markers and step counter for a fresh episode.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record the first state-log index of the episode.
    pub fn open(&mut self, log_len: usize) {
        self.begin = log_len as i64;
        self.steps = 0;
    }

    /// Record the last state-log index of the episode.
    pub fn close(&mut self, log_len: usize) {
        self.end = log_len as i64 - 1;
    }

    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn interval(&self) -> EpisodeInterval {
        EpisodeInterval::new(self.begin, self.end)
    }
}

impl Default for EpisodeTracker {
    fn default() -> Self {
        Self::new()
    }
}
