//! # TENDON Core
//!
//! The real-time controller lifecycle core of the TENDON actuator server.
//!
//! On every sensor tick the core selects between an always-available
//! default control policy and an operator-supplied custom policy, computes
//! a torque command, and records the interaction in an append-only state
//! log. Policy hot-swaps from the command channel never interleave with an
//! in-flight torque computation, a custom policy that signals completion
//! is retired deterministically, and loss of upstream connectivity reverts
//! control to the default policy automatically.
//!
//! This crate provides the fundamental building blocks:
//!
//! - **ControllerManager**: The tick entrypoint and lifecycle commands
//! - **Policy**: Capability traits over the external inference engine
//! - **StateLog**: Append-only log of recorded robot states
//! - **HeartbeatMonitor**: Staleness detection and safety reversion
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tendon_core::{ControllerManager, ControlConfig};
//! use tendon_types::RobotClientMetadata;
//!
//! let manager = ControllerManager::with_config(engine_loader, ControlConfig::init());
//! manager.init_session(RobotClientMetadata::new(7, 1000.0, default_policy_bytes))?;
//!
//! // Real-time context, once per sensor sample:
//! let command = manager.control_update(sample)?;
//!
//! // Command channel, any time:
//! let episode_begin = manager.set_controller(&policy_bytes)?;
//! ```
//!
//! The network transport that carries states in and torque commands out,
//! and the inference engine that evaluates policies, are external
//! collaborators; see [`core::policy`] for the engine seam.

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used types for easy access
pub use config::ControlConfig;
pub use core::{
    ControllerManager, ControllerStatus, EpisodeTracker, HeartbeatMonitor, LoopStats, Policy,
    PolicyError, PolicyLoader, PolicyResult, StateLog,
};
pub use error::{Result, TendonError, TendonResult};

// Re-export the message types so dependents need a single import
pub use tendon_types::{
    EpisodeInterval, RobotClientMetadata, RobotState, StateTimestamp, TorqueCommand,
};

// Re-export serde_yaml for consistent config handling across crates
pub use serde_yaml;
