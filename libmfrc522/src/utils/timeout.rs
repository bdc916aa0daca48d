// libmfrc522/src/utils/timeout.rs

use std::time::Duration;

/// Receiver re-arm period while waiting for a card.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Pause between presence sweeps while waiting for removal.
pub const DEFAULT_REMOVAL_BACKOFF_MS: u64 = 500;

pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
