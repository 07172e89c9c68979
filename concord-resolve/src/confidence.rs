//! Confidence scoring for resolutions.
//!
//! Confidence starts from a base value per violation kind, blends in any
//! confidence the resolver itself supplied, then decays linearly toward 0.5
//! as the resolved data ages: fresh data keeps the full signal, data an hour
//! old or more carries no more certainty than a coin flip either way.

use concord_types::ViolationKind;

/// The age at which confidence has fully decayed to the 0.5 baseline.
pub const DECAY_HORIZON_MS: u64 = 3_600_000;

/// Base confidence per violation kind.
///
/// Staleness resolutions are near-certain (the newest write is simply the
/// answer); write conflicts carry real ambiguity; replication lag is the
/// weakest signal because the measurement itself is an estimate.
#[must_use]
pub fn base_confidence(kind: ViolationKind) -> f64 {
    match kind {
        ViolationKind::Staleness => 0.9,
        ViolationKind::ReadInconsistency => 0.8,
        ViolationKind::WriteConflict => 0.7,
        ViolationKind::ReplicationLag => 0.6,
    }
}

/// Computes the final confidence for a resolution.
///
/// `data_age_ms` is the age of the newest contributing operation at
/// resolution time. The result is clamped to [0, 1].
#[must_use]
pub fn score(kind: ViolationKind, resolver_confidence: Option<f64>, data_age_ms: u64) -> f64 {
    let base = base_confidence(kind);
    let blended = match resolver_confidence {
        Some(c) => (base + c.clamp(0.0, 1.0)) / 2.0,
        None => base,
    };

    let decay = 1.0 - (data_age_ms as f64 / DECAY_HORIZON_MS as f64).min(1.0);
    (0.5 + (blended - 0.5) * decay).clamp(0.0, 1.0)
}
