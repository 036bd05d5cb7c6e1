//! # TENDON Types - Message types with zero TENDON dependencies
//!
//! This is a leaf crate providing the canonical definitions of the types
//! exchanged between the control core and the transport layer:
//!
//! - [`StateTimestamp`] - Wall-clock timestamp split into seconds and nanoseconds
//! - [`RobotState`] - One recorded snapshot of the actuator state (all arrays dof-sized)
//! - [`TorqueCommand`] - The per-tick torque output for the robot client
//! - [`RobotClientMetadata`] - Session description sent by a robot client at init
//! - [`EpisodeInterval`] - A state-log index range with -1 meaning "not yet known"
//!
//! All other TENDON crates depend on this crate for these types.

pub mod control;
pub mod episode;
pub mod metadata;
pub mod state;
pub mod time;

pub use control::TorqueCommand;
pub use episode::{EpisodeInterval, UNSET_INDEX};
pub use metadata::RobotClientMetadata;
pub use state::RobotState;
pub use time::StateTimestamp;
