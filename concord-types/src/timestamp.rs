//! Hybrid Logical Clock timestamps.
//!
//! Combines physical time with a logical counter to ensure:
//! - Monotonicity (always increasing)
//! - A total order over operations registered at the same wall millisecond
//!
//! Staleness and collision-window math in the engine works on the wall-time
//! component in milliseconds.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Hybrid Logical Clock timestamp.
///
/// Consists of:
/// - `wall_time`: Milliseconds since Unix epoch (physical component)
/// - `logical`: Logical counter for events at the same wall time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HybridTimestamp {
    /// Physical time component (milliseconds since Unix epoch).
    wall_time: u64,
    /// Logical counter for ordering events at the same wall time.
    logical: u32,
}

impl HybridTimestamp {
    /// Creates a new timestamp at the current time.
    #[must_use]
    pub fn now() -> Self {
        let wall_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64;

        Self {
            wall_time,
            logical: 0,
        }
    }

    /// Creates a timestamp from components.
    #[must_use]
    pub const fn new(wall_time: u64, logical: u32) -> Self {
        Self { wall_time, logical }
    }

    /// Returns the wall time component.
    #[must_use]
    pub const fn wall_time(&self) -> u64 {
        self.wall_time
    }

    /// Returns the logical counter.
    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// The immediate successor: same wall time, logical counter + 1.
    ///
    /// The engine stamps each registered operation with
    /// `max(clock_now, previous_stamp.succ())`, which keeps stamps strictly
    /// increasing even when the wall clock stalls or runs backwards.
    #[must_use]
    pub fn succ(&self) -> Self {
        Self {
            wall_time: self.wall_time,
            logical: self.logical.saturating_add(1),
        }
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero
    /// when `earlier` is actually later (clock skew between callers).
    #[must_use]
    pub fn ms_since(&self, earlier: &Self) -> u64 {
        self.wall_time.saturating_sub(earlier.wall_time)
    }

    /// A timestamp `ms` milliseconds before this one, saturating at zero.
    /// Used to compute the lower bound of a collision window.
    #[must_use]
    pub fn minus_ms(&self, ms: u64) -> Self {
        Self {
            wall_time: self.wall_time.saturating_sub(ms),
            logical: 0,
        }
    }
}

impl Default for HybridTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl PartialOrd for HybridTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HybridTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.wall_time.cmp(&other.wall_time) {
            Ordering::Equal => self.logical.cmp(&other.logical),
            other => other,
        }
    }
}
