//! Client-side counters
//!
//! Plain atomics shared between the session loop and whoever reports on it.
//! Nothing here is exported over the network; the run loop logs a summary
//! line periodically and the headless binary prints a final JSON snapshot.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const TICK_HISTORY: usize = 1000;

/// Metrics registry for one client session
#[derive(Debug)]
pub struct ClientMetrics {
    // Loop
    pub tick_count: AtomicU64,
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    // Network
    pub messages_received: AtomicU64,
    pub messages_sent: AtomicU64,
    pub deltas_suppressed: AtomicU64,

    // World
    pub remote_peers: AtomicU64,
    pub enemies: AtomicU64,
    pub relocations: AtomicU64,
    pub placement_failures: AtomicU64,

    start_time: Instant,

    // Rolling tick times for percentile calculation
    #[cfg_attr(not(feature = "metrics_extended"), allow(dead_code))]
    tick_history: RwLock<VecDeque<u64>>,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_seconds: u64,
    pub tick_count: u64,
    pub tick_time_us: u64,
    pub tick_time_p95_us: u64,
    pub tick_time_max_us: u64,
    pub messages_received: u64,
    pub messages_sent: u64,
    pub deltas_suppressed: u64,
    pub remote_peers: u64,
    pub enemies: u64,
    pub relocations: u64,
    pub placement_failures: u64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            messages_sent: AtomicU64::new(0),
            deltas_suppressed: AtomicU64::new(0),
            remote_peers: AtomicU64::new(0),
            enemies: AtomicU64::new(0),
            relocations: AtomicU64::new(0),
            placement_failures: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY)),
        }
    }

    /// Record how long one tick took
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "metrics_extended")]
        {
            let mut history = self.tick_history.write();
            history.push_back(us);
            while history.len() > TICK_HISTORY {
                history.pop_front();
            }

            if history.len() >= 10 {
                let mut sorted: Vec<u64> = history.iter().copied().collect();
                sorted.sort_unstable();

                let p95_idx = (sorted.len() as f32 * 0.95) as usize;
                self.tick_time_p95_us
                    .store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
                self.tick_time_max_us
                    .store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub fn incr(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    #[inline]
    pub fn set(gauge: &AtomicU64, value: u64) {
        gauge.store(value, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.uptime_seconds(),
            tick_count: self.tick_count.load(Ordering::Relaxed),
            tick_time_us: self.tick_time_us.load(Ordering::Relaxed),
            tick_time_p95_us: self.tick_time_p95_us.load(Ordering::Relaxed),
            tick_time_max_us: self.tick_time_max_us.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            deltas_suppressed: self.deltas_suppressed.load(Ordering::Relaxed),
            remote_peers: self.remote_peers.load(Ordering::Relaxed),
            enemies: self.enemies.load(Ordering::Relaxed),
            relocations: self.relocations.load(Ordering::Relaxed),
            placement_failures: self.placement_failures.load(Ordering::Relaxed),
        }
    }

    /// One-line summary for periodic logging
    pub fn summary(&self) -> String {
        let s = self.snapshot();
        format!(
            "{}s, tick {}, {} peers, {} enemies | msgs in {} out {} (suppressed {}) | relocations {}, placement failures {} | tick {}us p95 {}us",
            s.uptime_seconds,
            s.tick_count,
            s.remote_peers,
            s.enemies,
            s.messages_received,
            s.messages_sent,
            s.deltas_suppressed,
            s.relocations,
            s.placement_failures,
            s.tick_time_us,
            s.tick_time_p95_us,
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot()).unwrap_or_default()
    }
}

impl Default for ClientMetrics {
    fn default() -> Self {
        Self::new()
    }
}
