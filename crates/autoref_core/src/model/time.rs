use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: f64 = 1e9;

/// Monotonic frame time in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_secs(secs: f64) -> Self {
        Self((secs * NANOS_PER_SEC).round() as i64)
    }

    pub const fn nanos(self) -> i64 {
        self.0
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn secs_since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / NANOS_PER_SEC
    }

    pub fn plus_secs(self, secs: f64) -> Self {
        Self(self.0 + (secs * NANOS_PER_SEC).round() as i64)
    }
}
