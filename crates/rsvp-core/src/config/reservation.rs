//! Reservation protocol configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deadlines for a single reserve or cancel unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Upper bound for one reserve/cancel call, from `begin` to `commit`.
    /// On expiry the unit of work is rolled back and a transient error returned.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Upper bound for waiting on a row lock held by another unit of work.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,
}

impl ReservationConfig {
    /// Operation deadline as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Lock wait deadline as a [`Duration`].
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout(),
            lock_timeout_ms: default_lock_timeout(),
        }
    }
}

fn default_operation_timeout() -> u64 {
    5_000
}

fn default_lock_timeout() -> u64 {
    2_000
}
