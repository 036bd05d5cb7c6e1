//! Shared test utilities for tendon_core integration tests
//!
//! Provides a scripted policy engine: policies are "compiled" to YAML
//! blobs, instantiated by a [`ScriptedLoader`], and leave observable
//! counters behind so tests can verify which policy ran when.

#![allow(dead_code)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tendon_core::{ControlConfig, ControllerManager, Policy, PolicyLoader, PolicyResult};
use tendon_types::{RobotClientMetadata, RobotState, StateTimestamp};

/// Observable counters for one instantiated scripted policy.
#[derive(Debug, Default)]
pub struct PolicyProbe {
    pub forwards: AtomicU64,
    pub resets: AtomicU64,
    pub applied_updates: AtomicU64,
}

impl PolicyProbe {
    pub fn forwards(&self) -> u64 {
        self.forwards.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn applied_updates(&self) -> u64 {
        self.applied_updates.load(Ordering::SeqCst)
    }
}

/// Serialized form of a scripted policy "binary" (YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSpec {
    /// Name the loader registers the policy's probe under
    pub name: String,
    /// Torque = gain * joint position
    pub gain: f32,
    /// Report termination after this many forward steps
    #[serde(default)]
    pub terminate_after: Option<u64>,
    /// Every forward call fails
    #[serde(default)]
    pub fail_forward: bool,
    /// Every apply_param_update call fails
    #[serde(default)]
    pub fail_apply: bool,
}

impl ScriptSpec {
    pub fn named(name: &str, gain: f32) -> Self {
        Self {
            name: name.to_string(),
            gain,
            terminate_after: None,
            fail_forward: false,
            fail_apply: false,
        }
    }

    pub fn terminating_after(mut self, steps: u64) -> Self {
        self.terminate_after = Some(steps);
        self
    }

    pub fn failing_forward(mut self) -> Self {
        self.fail_forward = true;
        self
    }

    pub fn failing_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    /// Serialize into the blob the loader accepts.
    pub fn blob(&self) -> Vec<u8> {
        serde_yaml::to_string(self)
            .expect("script spec serializes")
            .into_bytes()
    }
}

/// Parameter-update payload understood by scripted policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamUpdate {
    pub gain: f32,
}

impl ParamUpdate {
    pub fn blob(gain: f32) -> Vec<u8> {
        serde_yaml::to_string(&ParamUpdate { gain })
            .expect("param update serializes")
            .into_bytes()
    }
}

/// A deterministic stand-in for the external inference engine.
pub struct ScriptedPolicy {
    spec: ScriptSpec,
    gain: f32,
    steps: u64,
    pending: Option<ParamUpdate>,
    probe: Arc<PolicyProbe>,
}

impl Policy for ScriptedPolicy {
    fn forward(&mut self, state: &RobotState) -> PolicyResult<Vec<f32>> {
        if self.spec.fail_forward {
            return Err("scripted forward failure".into());
        }
        self.steps += 1;
        self.probe.forwards.fetch_add(1, Ordering::SeqCst);
        Ok(state
            .joint_positions
            .iter()
            .map(|p| self.gain * p)
            .collect())
    }

    fn reset(&mut self) {
        self.steps = 0;
        self.probe.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn is_terminated(&self) -> bool {
        self.spec.terminate_after.map_or(false, |n| self.steps >= n)
    }

    fn load_param_update(&mut self, bytes: &[u8]) -> PolicyResult<()> {
        let update: ParamUpdate =
            serde_yaml::from_slice(bytes).map_err(|e| format!("bad param payload: {}", e))?;
        self.pending = Some(update);
        Ok(())
    }

    fn apply_param_update(&mut self) -> PolicyResult<()> {
        if self.spec.fail_apply {
            return Err("scripted apply failure".into());
        }
        if let Some(update) = self.pending.take() {
            self.gain = update.gain;
        }
        self.probe.applied_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Instantiates scripted policies from YAML blobs and registers a probe
/// per policy name so tests can observe which instance ran.
#[derive(Default)]
pub struct ScriptedLoader {
    probes: Mutex<HashMap<String, Arc<PolicyProbe>>>,
}

impl ScriptedLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The probe of the most recently loaded policy with this name.
    pub fn probe(&self, name: &str) -> Arc<PolicyProbe> {
        self.probes
            .lock()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no policy named {:?} was loaded", name))
    }
}

impl PolicyLoader for ScriptedLoader {
    fn load(&self, binary: &[u8]) -> PolicyResult<Box<dyn Policy>> {
        let spec: ScriptSpec =
            serde_yaml::from_slice(binary).map_err(|e| format!("unparseable policy binary: {}", e))?;
        let probe = Arc::new(PolicyProbe::default());
        self.probes.lock().insert(spec.name.clone(), probe.clone());
        Ok(Box::new(ScriptedPolicy {
            gain: spec.gain,
            steps: 0,
            pending: None,
            probe,
            spec,
        }))
    }
}

/// Config with timing generous enough to keep tests deterministic.
pub fn test_config() -> ControlConfig {
    ControlConfig {
        staleness_threshold_ms: 10_000,
        handshake_timeout_ms: 2_000,
        state_log_capacity: 64,
    }
}

/// A dof-sized sample with every joint at `position`.
pub fn sample(dof: usize, position: f32) -> RobotState {
    RobotState::sample(
        StateTimestamp::now(),
        vec![position; dof],
        vec![0.0; dof],
        vec![0.0; dof],
        vec![0.0; dof],
    )
}

/// Manager with an initialized session whose default policy is a scripted
/// policy named "default" with gain 1.0.
pub fn manager_with_session(
    dof: usize,
    config: ControlConfig,
) -> (Arc<ControllerManager>, Arc<ScriptedLoader>) {
    let loader = ScriptedLoader::new();
    let manager = ControllerManager::with_config(Box::new(loader.clone()), config);
    let metadata = RobotClientMetadata::new(dof, 1000.0, ScriptSpec::named("default", 1.0).blob())
        .with_robot_model("test_arm");
    manager
        .init_session(metadata)
        .expect("session initializes");
    (Arc::new(manager), loader)
}

/// Run a blocking lifecycle command on a worker thread while ticking the
/// manager from this thread until the command returns.
pub fn tick_while<T: Send + 'static>(
    manager: &Arc<ControllerManager>,
    dof: usize,
    position: f32,
    op: impl FnOnce() -> T + Send + 'static,
) -> T {
    let handle = std::thread::spawn(op);
    while !handle.is_finished() {
        let _ = manager.control_update(sample(dof, position));
        std::thread::sleep(Duration::from_millis(1));
    }
    handle.join().expect("lifecycle command thread panicked")
}

/// Load a custom policy with a deterministic tick count: exactly one tick
/// runs between the install and the return, so the caller knows the
/// episode-begin index in advance. Returns what `set_controller` returned.
pub fn load_controller_synced(
    manager: &Arc<ControllerManager>,
    dof: usize,
    blob: Vec<u8>,
) -> i64 {
    let m = manager.clone();
    let handle = std::thread::spawn(move || m.set_controller(&blob));
    while manager.status() != tendon_core::ControllerStatus::Ready {
        assert!(
            !handle.is_finished(),
            "set_controller returned before the tick path consumed Ready"
        );
        std::thread::sleep(Duration::from_micros(200));
    }
    manager
        .control_update(sample(dof, 1.0))
        .expect("consuming tick succeeds");
    handle
        .join()
        .expect("set_controller thread panicked")
        .expect("set_controller succeeds")
}

/// Force-terminate with a deterministic tick count: exactly one tick runs
/// after Terminating is requested, finalizing the episode.
pub fn terminate_synced(
    manager: &Arc<ControllerManager>,
    dof: usize,
) -> tendon_types::EpisodeInterval {
    let m = manager.clone();
    let handle = std::thread::spawn(move || m.terminate_controller());
    while manager.status() != tendon_core::ControllerStatus::Terminating {
        std::thread::sleep(Duration::from_micros(200));
    }
    manager
        .control_update(sample(dof, 1.0))
        .expect("finalizing tick succeeds");
    handle
        .join()
        .expect("terminate_controller thread panicked")
        .expect("terminate_controller succeeds")
}
