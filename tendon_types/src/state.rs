// Robot state snapshots recorded by the control core
//
// One RobotState arrives per control tick from the robot client; the core
// fills in the computed torques and appends the snapshot to its state log.

use crate::time::StateTimestamp;
use serde::{Deserialize, Serialize};

/// One timestamped snapshot of the actuator state.
///
/// All arrays are sized to the session's degree-of-freedom count.
/// `joint_torques_computed` is empty on the way in and filled by the
/// control core before the snapshot is recorded; snapshots are immutable
/// once appended to the state log.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RobotState {
    /// Sensor timestamp reported by the robot client
    pub timestamp: StateTimestamp,
    /// Measured joint positions (rad or m, per joint type)
    pub joint_positions: Vec<f32>,
    /// Measured joint velocities
    pub joint_velocities: Vec<f32>,
    /// Torques measured at the motors
    pub motor_torques_measured: Vec<f32>,
    /// Externally applied torques estimated at the motors
    pub motor_torques_external: Vec<f32>,
    /// Torques computed by the active policy for this tick
    pub joint_torques_computed: Vec<f32>,
}

impl RobotState {
    /// Build an incoming sample (computed torques still empty).
    pub fn sample(
        timestamp: StateTimestamp,
        joint_positions: Vec<f32>,
        joint_velocities: Vec<f32>,
        motor_torques_measured: Vec<f32>,
        motor_torques_external: Vec<f32>,
    ) -> Self {
        Self {
            timestamp,
            joint_positions,
            joint_velocities,
            motor_torques_measured,
            motor_torques_external,
            joint_torques_computed: Vec::new(),
        }
    }

    /// Degree-of-freedom count implied by the position array.
    pub fn dof(&self) -> usize {
        self.joint_positions.len()
    }

    /// True when every measured array has length `dof`.
    pub fn arrays_sized(&self, dof: usize) -> bool {
        self.joint_positions.len() == dof
            && self.joint_velocities.len() == dof
            && self.motor_torques_measured.len() == dof
            && self.motor_torques_external.len() == dof
    }
}
