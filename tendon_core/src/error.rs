//! Unified error handling for TENDON
//!
//! This module provides a centralized error type for the control core,
//! ensuring consistent error handling across all components. Failures of
//! the external policy engine are caught at the capability boundary and
//! converted here with the underlying message preserved.

use thiserror::Error;

/// Main error type for TENDON control-core operations
#[derive(Debug, Error)]
pub enum TendonError {
    /// Session is stale, replaced, or was never initialized
    #[error("Session invalid: {0}")]
    SessionInvalid(String),

    /// A serialized policy binary failed to instantiate
    #[error("Failed to load policy: {0}")]
    PolicyLoad(String),

    /// The active policy's forward pass raised
    #[error("Policy forward pass failed: {0}")]
    PolicyEval(String),

    /// A parameter-update payload could not be ingested
    #[error("Failed to load policy parameters: {0}")]
    ParamLoad(String),

    /// Applying loaded parameters to the live policy module raised
    #[error("Failed to update policy: {0}")]
    PolicyUpdate(String),

    /// A lifecycle command required a loaded/running controller that is absent
    #[error("No active controller: {0}")]
    NoActiveController(String),

    /// State-log index out of range
    #[error("State log index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// An incoming state sample does not match the session's dof
    #[error("Invalid state sample: {0}")]
    InvalidState(String),

    /// A bounded wait for a lifecycle transition expired
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration parsing or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O related errors (config file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using TendonError
pub type TendonResult<T> = std::result::Result<T, TendonError>;

/// Short alias — `Result<T>` is equivalent to `TendonResult<T>`
pub type Result<T> = TendonResult<T>;

impl From<serde_yaml::Error> for TendonError {
    fn from(err: serde_yaml::Error) -> Self {
        TendonError::Config(format!("YAML parse error: {}", err))
    }
}

// Helper methods
impl TendonError {
    /// Create a session-invalid error
    pub fn session_invalid(msg: impl std::fmt::Display) -> Self {
        TendonError::SessionInvalid(msg.to_string())
    }

    /// Create a policy-load error, preserving the engine's message
    pub fn policy_load(err: impl std::fmt::Display) -> Self {
        TendonError::PolicyLoad(err.to_string())
    }

    /// Create a policy-evaluation error, preserving the engine's message
    pub fn policy_eval(err: impl std::fmt::Display) -> Self {
        TendonError::PolicyEval(err.to_string())
    }

    /// Create a parameter-load error, preserving the engine's message
    pub fn param_load(err: impl std::fmt::Display) -> Self {
        TendonError::ParamLoad(err.to_string())
    }

    /// Create a policy-update error, preserving the engine's message
    pub fn policy_update(err: impl std::fmt::Display) -> Self {
        TendonError::PolicyUpdate(err.to_string())
    }

    /// Create a no-active-controller error
    pub fn no_active_controller(msg: impl std::fmt::Display) -> Self {
        TendonError::NoActiveController(msg.to_string())
    }

    /// Create an invalid-state-sample error
    pub fn invalid_state(msg: impl std::fmt::Display) -> Self {
        TendonError::InvalidState(msg.to_string())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl std::fmt::Display) -> Self {
        TendonError::Timeout(msg.to_string())
    }

    /// Create a configuration error
    pub fn config(msg: impl std::fmt::Display) -> Self {
        TendonError::Config(msg.to_string())
    }
}
