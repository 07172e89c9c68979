//! Time sources and replication-lag signals.
//!
//! The engine never reads the system clock directly. It goes through the
//! [`Clock`] trait so tests can drive staleness windows, collision windows,
//! and confidence decay with a [`ManualClock`] instead of waiting on wall
//! time.

use concord_types::HybridTimestamp;
use std::sync::Mutex;

/// A source of timestamps for the engine.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> HybridTimestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> HybridTimestamp {
        HybridTimestamp::now()
    }
}

/// A clock that only moves when told to. For tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<HybridTimestamp>,
}

impl ManualClock {
    /// Creates a manual clock starting at the given instant.
    #[must_use]
    pub fn starting_at(start: HybridTimestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        let mut now = self.now.lock().unwrap();
        *now = HybridTimestamp::new(now.wall_time() + ms, 0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HybridTimestamp {
        *self.now.lock().unwrap()
    }
}

/// A replication-lag signal from the storage/replication layer.
///
/// The engine does not measure lag itself; a deployment that replicates
/// supplies a probe wired to a real signal (e.g. replica heartbeat
/// timestamps). Without one, lag is reported as zero.
pub trait LagProbe: Send + Sync {
    /// Current replication lag in milliseconds, or `None` when no signal
    /// is available.
    fn replication_lag_ms(&self) -> Option<u64>;
}

/// The default probe: no replication, no signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLagProbe;

impl LagProbe for NoLagProbe {
    fn replication_lag_ms(&self) -> Option<u64> {
        None
    }
}
