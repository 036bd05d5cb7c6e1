//! Controller manager
//!
//! The orchestrator of the control core: owns the robot client session
//! (with its always-available default policy), the custom-controller
//! lifecycle state machine, and the state log. The real-time caller feeds
//! sensor samples into [`ControllerManager::control_update`]; a separate,
//! lower-frequency caller issues lifecycle commands (load, update,
//! terminate, query). Both paths funnel through the single lifecycle lock.

use crate::config::ControlConfig;
use crate::core::heartbeat::HeartbeatMonitor;
use crate::core::lifecycle::{ControllerStatus, EpisodeTracker};
use crate::core::policy::{Policy, PolicyLoader};
use crate::core::state_log::StateLog;
use crate::core::stats::LoopStats;
use crate::error::{Result, TendonError};
use log::{error, info, warn};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Instant;
use tendon_types::{EpisodeInterval, RobotClientMetadata, RobotState, TorqueCommand};

/// Everything a connected robot client established at initialization.
/// Replaced wholesale on re-initialization; `metadata.dof` is immutable
/// for the session's lifetime.
struct RobotClientSession {
    metadata: RobotClientMetadata,
    default_policy: Box<dyn Policy>,
}

/// Lifecycle state guarded by the one lifecycle lock: the session, the
/// currently loaded custom policy, the single authoritative status, and
/// episode bookkeeping. Mutated only while holding the lock.
struct ControllerContext {
    session: Option<RobotClientSession>,
    status: ControllerStatus,
    custom_policy: Option<Box<dyn Policy>>,
    episode: EpisodeTracker,
}

/// Real-time controller lifecycle manager for one robot client session.
pub struct ControllerManager {
    loader: Box<dyn PolicyLoader>,
    config: ControlConfig,
    heartbeat: HeartbeatMonitor,
    lifecycle: Mutex<ControllerContext>,
    /// Signaled on every lifecycle transition; lifecycle commands block on
    /// this instead of busy-polling the status
    lifecycle_changed: Condvar,
    state_log: StateLog,
    stats: Mutex<LoopStats>,
}

impl ControllerManager {
    pub fn new(loader: Box<dyn PolicyLoader>) -> Self {
        Self::with_config(loader, ControlConfig::default())
    }

    pub fn with_config(loader: Box<dyn PolicyLoader>, config: ControlConfig) -> Self {
        let heartbeat = HeartbeatMonitor::new(config.staleness_threshold());
        let state_log = StateLog::with_capacity(config.state_log_capacity);
        Self {
            loader,
            heartbeat,
            lifecycle: Mutex::new(ControllerContext {
                session: None,
                status: ControllerStatus::Uninitialized,
                custom_policy: None,
                episode: EpisodeTracker::new(),
            }),
            lifecycle_changed: Condvar::new(),
            state_log,
            stats: Mutex::new(LoopStats::default()),
            config,
        }
    }

    /// Initialize a fresh robot client session.
    ///
    /// Instantiates the default policy from the metadata's binary; on load
    /// failure no session is installed and a prior session, if any, stays
    /// authoritative. On success the lifecycle resets to Uninitialized with
    /// empty episode markers, and the init time counts as the last accepted
    /// tick for staleness purposes.
    pub fn init_session(&self, metadata: RobotClientMetadata) -> Result<()> {
        info!("==== Initializing new robot client session ====");

        if metadata.dof == 0 {
            return Err(TendonError::invalid_state("session dof must be nonzero"));
        }
        let dof = metadata.dof;

        let default_policy = match self.loader.load(&metadata.default_policy) {
            Ok(policy) => policy,
            Err(e) => {
                error!("Failed to load default policy: {}", e);
                return Err(TendonError::policy_load(e));
            }
        };

        let mut ctx = self.lifecycle.lock();
        ctx.session = Some(RobotClientSession {
            metadata,
            default_policy,
        });
        ctx.custom_policy = None;
        ctx.status = ControllerStatus::Uninitialized;
        ctx.episode.reset();
        self.lifecycle_changed.notify_all();
        drop(ctx);

        self.heartbeat.feed();
        info!("Session initialized (dof={})", dof);
        Ok(())
    }

    /// One control tick: select the active policy, compute torques, record
    /// the resulting state.
    ///
    /// Runs on the real-time calling context. The incoming sample's arrays
    /// must all be sized to the session dof; its computed-torques field is
    /// filled here before the snapshot is appended to the state log. On a
    /// policy evaluation failure no torque command is produced and the log
    /// does not advance, but episode boundaries already finalized this tick
    /// are not rolled back.
    pub fn control_update(&self, sample: RobotState) -> Result<TorqueCommand> {
        let tick_start = Instant::now();

        // Lock held through policy selection and evaluation so a lifecycle
        // command can never swap or mutate the policy mid-computation. The
        // guard is dropped on every exit path, including the error returns.
        let mut ctx = self.lifecycle.lock();
        let ControllerContext {
            session,
            custom_policy,
            status,
            episode,
        } = &mut *ctx;

        let session = session.as_mut().ok_or_else(|| {
            TendonError::session_invalid("no session initialized; call init_session first")
        })?;
        let dof = session.metadata.dof;

        // Staleness forces reversion to the default policy, whatever the
        // lifecycle was doing
        if self.heartbeat.check() {
            warn!(
                "Control gap exceeded threshold of {:?}. Reverting to default policy...",
                self.heartbeat.threshold()
            );
            *status = ControllerStatus::Terminating;
        }

        if !sample.arrays_sized(dof) {
            return Err(TendonError::invalid_state(format!(
                "sample arrays must all have length {} (got positions={}, velocities={})",
                dof,
                sample.joint_positions.len(),
                sample.joint_velocities.len()
            )));
        }

        // Episode boundaries
        match *status {
            ControllerStatus::Ready => {
                // First step of the episode
                episode.open(self.state_log.len());
                *status = ControllerStatus::Running;
                info!(
                    "Custom policy episode begins at state index {}",
                    episode.begin()
                );
            }
            ControllerStatus::Terminating => {
                // Last step of the episode: close it and hand control back
                episode.close(self.state_log.len());
                *status = ControllerStatus::Terminated;
                session.default_policy.reset();
                info!("Terminating custom policy, switching to default policy");
            }
            _ => {}
        }

        // Select the active policy: custom iff Running, default otherwise
        let running = *status == ControllerStatus::Running;
        let policy: &mut Box<dyn Policy> = if running {
            custom_policy.as_mut().ok_or_else(|| {
                TendonError::no_active_controller("lifecycle is Running with no policy installed")
            })?
        } else {
            &mut session.default_policy
        };

        let forward_result = policy.forward(&sample).and_then(|torques| {
            if torques.len() == dof {
                Ok(torques)
            } else {
                Err(format!(
                    "policy produced {} torques for a dof-{} session",
                    torques.len(),
                    dof
                )
                .into())
            }
        });

        // Step bookkeeping and termination detection. A detected
        // termination is finalized on the *next* tick, so this tick's state
        // is still recorded under Running semantics.
        if forward_result.is_ok() && running {
            episode.record_step();
            if policy.is_terminated() {
                *status = ControllerStatus::Terminating;
            }
        }

        self.lifecycle_changed.notify_all();
        drop(ctx);

        let torques = match forward_result {
            Ok(torques) => torques,
            Err(e) => {
                error!("Policy forward pass failed: {}", e);
                return Err(TendonError::policy_eval(e));
            }
        };

        let command = TorqueCommand::new(torques.clone());

        // Record the snapshot: the input sample plus this tick's torques.
        // Append ordering matches tick order because the tick context is
        // strictly sequential.
        let mut recorded = sample;
        recorded.joint_torques_computed = torques;
        self.state_log.append(recorded);

        self.heartbeat.feed();
        self.stats.lock().record_tick(tick_start.elapsed());

        Ok(command)
    }

    /// Load a new custom policy and block until the tick path has taken
    /// its first step with it.
    ///
    /// Returns the state-log index at which the new episode begins. The
    /// previous custom policy, if any, is dropped wholesale. The wait is
    /// bounded by the configured handshake timeout so an absent tick path
    /// surfaces as an error instead of hanging the command channel.
    pub fn set_controller(&self, binary: &[u8]) -> Result<i64> {
        // Instantiate outside the lock; a failed load leaves the current
        // lifecycle untouched
        let new_policy = match self.loader.load(binary) {
            Ok(policy) => policy,
            Err(e) => {
                error!("Failed to load new policy: {}", e);
                return Err(TendonError::policy_load(e));
            }
        };

        let mut ctx = self.lifecycle.lock();
        if ctx.session.is_none() {
            return Err(TendonError::session_invalid(
                "cannot load a controller before a session is initialized",
            ));
        }
        ctx.custom_policy = Some(new_policy);
        ctx.episode.reset();
        ctx.status = ControllerStatus::Ready;
        self.lifecycle_changed.notify_all();
        info!("Loaded new custom policy");

        // The episode-begin index is only known once the tick path consumes
        // the Ready state
        let deadline = Instant::now() + self.config.handshake_timeout();
        while ctx.status == ControllerStatus::Ready {
            if self
                .lifecycle_changed
                .wait_until(&mut ctx, deadline)
                .timed_out()
            {
                return Err(TendonError::timeout(
                    "tick path did not consume the loaded controller",
                ));
            }
        }
        Ok(ctx.episode.begin())
    }

    /// Push a partial-parameter update into the currently loaded custom
    /// policy.
    ///
    /// Returns the state-log index at which the update takes effect. The
    /// lifecycle lock spans both the container load and the module apply,
    /// so a concurrent tick can never observe a half-applied update.
    pub fn update_controller(&self, update: &[u8]) -> Result<i64> {
        let mut ctx = self.lifecycle.lock();
        let ControllerContext {
            custom_policy,
            status,
            ..
        } = &mut *ctx;

        let policy = custom_policy.as_mut().ok_or_else(|| {
            TendonError::no_active_controller("tried to update parameters with no controller loaded")
        })?;

        policy.load_param_update(update).map_err(|e| {
            error!("Failed to load new policy params: {}", e);
            TendonError::param_load(e)
        })?;

        if *status != ControllerStatus::Running {
            return Err(TendonError::no_active_controller(
                "tried to perform a controller update with no controller running",
            ));
        }

        let index = self.state_log.len() as i64;
        policy.apply_param_update().map_err(|e| {
            error!("Failed to update policy: {}", e);
            TendonError::policy_update(e)
        })?;
        Ok(index)
    }

    /// Force-terminate the running custom policy and block until the tick
    /// path finalizes the episode.
    ///
    /// Returns the closed episode interval. Termination is honored on the
    /// next tick, never preempted mid-tick.
    pub fn terminate_controller(&self) -> Result<EpisodeInterval> {
        let mut ctx = self.lifecycle.lock();
        if ctx.status != ControllerStatus::Running {
            return Err(TendonError::no_active_controller(
                "tried to terminate controller with no controller running",
            ));
        }
        ctx.status = ControllerStatus::Terminating;
        self.lifecycle_changed.notify_all();
        info!("Controller termination requested");

        let deadline = Instant::now() + self.config.handshake_timeout();
        while ctx.status == ControllerStatus::Terminating {
            if self
                .lifecycle_changed
                .wait_until(&mut ctx, deadline)
                .timed_out()
            {
                return Err(TendonError::timeout(
                    "tick path did not finalize controller termination",
                ));
            }
        }
        Ok(ctx.episode.interval())
    }

    /// The current episode's state-log interval, with -1 for bounds not
    /// yet known.
    pub fn episode_interval(&self) -> EpisodeInterval {
        let ctx = self.lifecycle.lock();
        if ctx.status == ControllerStatus::Uninitialized {
            EpisodeInterval::unset()
        } else {
            ctx.episode.interval()
        }
    }

    /// Number of recorded state snapshots.
    pub fn state_log_len(&self) -> usize {
        self.state_log.len()
    }

    /// Read one recorded state snapshot by index.
    pub fn state_at(&self, index: usize) -> Result<Arc<RobotState>> {
        self.state_log.get(index)
    }

    /// The session metadata, if the session exists and its heartbeat is
    /// still fresh.
    pub fn session_metadata(&self) -> Result<RobotClientMetadata> {
        let ctx = self.lifecycle.lock();
        let session = ctx
            .session
            .as_ref()
            .ok_or_else(|| TendonError::session_invalid("no session initialized"))?;
        if self.heartbeat.is_stale() {
            return Err(TendonError::session_invalid(
                "robot client heartbeat is stale",
            ));
        }
        Ok(session.metadata.clone())
    }

    /// Current lifecycle status of the custom controller.
    pub fn status(&self) -> ControllerStatus {
        self.lifecycle.lock().status
    }

    /// Tick-timing and staleness statistics.
    pub fn loop_stats(&self) -> LoopStats {
        let mut stats = self.stats.lock().clone();
        stats.stale_events = self.heartbeat.stale_count();
        stats
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }
}
