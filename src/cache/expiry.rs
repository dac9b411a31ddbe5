//! Expiry Module
//!
//! Absolute expiry stamps, the staleness predicate, and the validated
//! time-to-live that produces stamps at write time.

use crate::error::{MemoizeError, Result};

// == Expiry ==
/// Absolute instant after which an entry is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Never goes stale
    Never,
    /// Stale once the clock reaches this Unix timestamp in milliseconds
    At(u64),
}

impl Expiry {
    // == Is Expired ==
    /// See [`is_expired`].
    pub fn is_expired(&self, now_ms: u64) -> bool {
        is_expired(*self, now_ms)
    }
}

/// Reports whether `expires_at` has passed at `now_ms`.
///
/// Boundary condition: an entry is stale as soon as the clock reaches its
/// expiry instant. `Expiry::Never` is never stale.
pub fn is_expired(expires_at: Expiry, now_ms: u64) -> bool {
    match expires_at {
        Expiry::Never => false,
        Expiry::At(instant) => instant <= now_ms,
    }
}

// == Time To Live ==
/// Relative lifetime applied to each entry when it is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeToLive {
    /// Entries never expire
    Forever,
    /// Entries expire this many milliseconds after they are written
    Millis(f64),
}

impl TimeToLive {
    // == Constructor ==
    /// Validates a raw millisecond value.
    ///
    /// `f64::INFINITY` maps to [`TimeToLive::Forever`]. NaN is rejected as an
    /// invalid argument, a negative value as an invalid configuration.
    pub fn from_millis(ms: f64) -> Result<Self> {
        if ms.is_nan() {
            return Err(MemoizeError::InvalidArgument(
                "The time-to-live must be a valid number of milliseconds, but received NaN"
                    .to_string(),
            ));
        }

        if ms < 0.0 {
            return Err(MemoizeError::InvalidConfiguration(format!(
                "The time-to-live cannot be negative, but received {}",
                ms
            )));
        }

        if ms.is_infinite() {
            Ok(Self::Forever)
        } else {
            Ok(Self::Millis(ms))
        }
    }

    // == Is Zero ==
    /// A zero lifetime means results are never retained.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Millis(ms) if *ms == 0.0)
    }

    // == Expiry From ==
    /// Computes the absolute expiry for an entry written at `now_ms`.
    ///
    /// Fractional milliseconds round up, so an entry never expires earlier
    /// than its lifetime allows.
    pub fn expiry_from(&self, now_ms: u64) -> Expiry {
        match self {
            Self::Forever => Expiry::Never,
            Self::Millis(ms) => Expiry::At(now_ms.saturating_add(ms.ceil() as u64)),
        }
    }
}

impl Default for TimeToLive {
    fn default() -> Self {
        Self::Forever
    }
}
