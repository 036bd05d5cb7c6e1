// Session metadata sent by a robot client at initialization
use serde::{Deserialize, Serialize};

/// Everything a robot client declares about itself when opening a session.
///
/// The degree-of-freedom count is immutable for the session's lifetime and
/// every subsequent state sample must match it. The default policy binary
/// is instantiated once at session init and serves as the always-available
/// fallback control law.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RobotClientMetadata {
    /// Degrees of freedom of the actuator chain
    pub dof: usize,
    /// Control rate the client intends to tick at, in Hz
    pub hz: f64,
    /// Serialized default policy, instantiated at session init
    pub default_policy: Vec<u8>,
    /// Robot description blob (kinematic model), opaque to the core
    pub robot_model: String,
}

impl RobotClientMetadata {
    pub fn new(dof: usize, hz: f64, default_policy: Vec<u8>) -> Self {
        Self {
            dof,
            hz,
            default_policy,
            robot_model: String::new(),
        }
    }

    pub fn with_robot_model(mut self, robot_model: impl Into<String>) -> Self {
        self.robot_model = robot_model.into();
        self
    }
}
