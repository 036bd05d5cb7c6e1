//! Session heartbeat watchdog
//!
//! Tracks wall-clock time of the last accepted control tick and exposes
//! the staleness predicate the tick path uses to detect loss of upstream
//! connectivity.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Watchdog over the control tick stream.
///
/// `feed()` on every accepted tick (and at session init); `check()` from
/// the tick path to decide whether control must revert to the default
/// policy. A monitor that has never been fed counts as stale.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    /// Staleness threshold
    threshold: Duration,
    /// Last accepted tick time; None until the first feed
    last_tick: Mutex<Option<Instant>>,
    /// Latched once staleness is observed, cleared on the next feed
    expired: AtomicBool,
    /// Total staleness events observed
    stale_events: AtomicU64,
}

impl HeartbeatMonitor {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_tick: Mutex::new(None),
            expired: AtomicBool::new(false),
            stale_events: AtomicU64::new(0),
        }
    }

    /// Record an accepted tick (reset the watchdog).
    pub fn feed(&self) {
        *self.last_tick.lock() = Some(Instant::now());
        self.expired.store(false, Ordering::SeqCst);
    }

    /// Check staleness, latching and counting a newly observed expiry.
    pub fn check(&self) -> bool {
        let stale = match *self.last_tick.lock() {
            Some(last) => last.elapsed() > self.threshold,
            None => true,
        };
        if stale && !self.expired.swap(true, Ordering::SeqCst) {
            self.stale_events.fetch_add(1, Ordering::SeqCst);
        }
        stale
    }

    /// Non-mutating staleness predicate (no latch update).
    pub fn is_stale(&self) -> bool {
        match *self.last_tick.lock() {
            Some(last) => last.elapsed() > self.threshold,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    /// Number of distinct staleness events observed so far.
    pub fn stale_count(&self) -> u64 {
        self.stale_events.load(Ordering::SeqCst)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}
