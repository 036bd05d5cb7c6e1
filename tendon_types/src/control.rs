// Torque command produced once per control tick
use crate::time::StateTimestamp;
use serde::{Deserialize, Serialize};

/// Joint torque command for one control tick.
///
/// Produced by the active policy, stamped at computation time, and handed
/// to the transport layer. Not persisted beyond being folded into the next
/// recorded state's computed-torques field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TorqueCommand {
    /// Commanded joint torques, one per degree of freedom
    pub joint_torques: Vec<f32>,
    /// Time the command was produced
    pub timestamp: StateTimestamp,
}

impl TorqueCommand {
    pub fn new(joint_torques: Vec<f32>) -> Self {
        Self {
            joint_torques,
            timestamp: StateTimestamp::now(),
        }
    }
}
