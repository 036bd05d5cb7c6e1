//! Policy capability interface
//!
//! The numeric inference engine that evaluates a control policy lives
//! outside this core. These traits are the seam: the core drives policies
//! through [`Policy`] and instantiates them from serialized binaries
//! through [`PolicyLoader`], without knowing anything about the engine's
//! internals.

use std::sync::Arc;
use tendon_types::RobotState;

/// Errors crossing the engine boundary are opaque; the controller manager
/// converts them into typed [`TendonError`](crate::error::TendonError)
/// kinds with the message preserved.
pub type PolicyError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for engine-boundary calls.
pub type PolicyResult<T> = std::result::Result<T, PolicyError>;

/// One loaded control policy: a control law mapping robot state to joint
/// torques, plus the out-of-band parameter-update protocol.
///
/// The core guarantees a policy is never evaluated concurrently with a
/// swap or a parameter application: every call below happens under the
/// controller manager's lifecycle lock.
pub trait Policy: Send {
    /// Evaluate one control step, producing one torque per joint.
    fn forward(&mut self, state: &RobotState) -> PolicyResult<Vec<f32>>;

    /// Reset internal state (integrators, recurrent state, step counters).
    fn reset(&mut self);

    /// Whether the policy has signaled completion of its episode.
    fn is_terminated(&self) -> bool;

    /// Ingest a serialized partial-parameter update into the policy's
    /// parameter container. Does not affect the live module until
    /// [`apply_param_update`](Policy::apply_param_update) is called.
    fn load_param_update(&mut self, bytes: &[u8]) -> PolicyResult<()>;

    /// Apply previously loaded parameters to the live module.
    fn apply_param_update(&mut self) -> PolicyResult<()>;
}

/// Instantiates policies from serialized binaries.
///
/// Parsing and compilation of policy binaries is owned by the inference
/// engine; the core only hands bytes across this seam.
pub trait PolicyLoader: Send + Sync {
    fn load(&self, binary: &[u8]) -> PolicyResult<Box<dyn Policy>>;
}

impl<T: PolicyLoader + ?Sized> PolicyLoader for Arc<T> {
    fn load(&self, binary: &[u8]) -> PolicyResult<Box<dyn Policy>> {
        (**self).load(binary)
    }
}
