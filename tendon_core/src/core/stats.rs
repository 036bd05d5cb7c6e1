//! Control-loop timing statistics

use std::time::Duration;

/// Timing statistics for the control tick path.
#[derive(Debug, Clone, Default)]
pub struct LoopStats {
    /// Total successful ticks
    pub total_ticks: u64,
    /// Worst observed tick duration
    pub worst_tick: Duration,
    /// Last tick duration
    pub last_tick: Duration,
    /// Average tick duration (EMA) in microseconds
    pub avg_tick_us: f64,
    /// Jitter (EMA of absolute deviation from average) in microseconds
    pub jitter_us: f64,
    /// Staleness events observed by the heartbeat monitor
    pub stale_events: u64,
}

impl LoopStats {
    /// Update statistics with one tick's execution time.
    pub fn record_tick(&mut self, duration: Duration) {
        let duration_us = duration.as_micros() as f64;

        if duration > self.worst_tick {
            self.worst_tick = duration;
        }
        self.last_tick = duration;
        self.total_ticks += 1;

        // Moving average (EMA with alpha=0.1)
        if self.total_ticks == 1 {
            self.avg_tick_us = duration_us;
            self.jitter_us = 0.0;
        } else {
            let alpha = 0.1;
            let prev_avg = self.avg_tick_us;
            self.avg_tick_us = (alpha * duration_us) + ((1.0 - alpha) * prev_avg);

            let deviation = (duration_us - self.avg_tick_us).abs();
            self.jitter_us = (alpha * deviation) + ((1.0 - alpha) * self.jitter_us);
        }
    }

    /// Get human-readable statistics
    pub fn summary(&self) -> String {
        format!(
            "Ticks: {}, Worst: {:.1}μs, Avg: {:.1}μs, Jitter: {:.1}μs, Stale events: {}",
            self.total_ticks,
            self.worst_tick.as_micros(),
            self.avg_tick_us,
            self.jitter_us,
            self.stale_events
        )
    }
}
