//! Timestamp type used throughout the pipeline.
//!
//! Timestamps are Unix epoch seconds (UTC). Every operation that depends on
//! time takes `now` as an explicit parameter, so the core stays deterministic
//! under test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Seconds remaining until this timestamp (zero if already passed).
    pub fn remaining_from(&self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_advances() {
        let t = Timestamp::new(100);
        assert_eq!(t.plus_secs(50), Timestamp::new(150));
    }

    #[test]
    fn elapsed_and_remaining() {
        let t = Timestamp::new(100);
        assert_eq!(t.elapsed_since(Timestamp::new(130)), 30);
        assert_eq!(t.remaining_from(Timestamp::new(130)), 0);
        assert_eq!(t.remaining_from(Timestamp::new(70)), 30);
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(Timestamp::new(5) < Timestamp::new(6));
        assert!(Timestamp::EPOCH < Timestamp::new(1));
    }
}
