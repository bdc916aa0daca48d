// libmfrc522/src/config.rs

//! Reader wiring and session tuning.
//!
//! Pin numbers use BCM numbering; `0` means "not connected".

use std::time::Duration;

use crate::session::text::{DecodeErrors, TextEncoding};
use crate::types::MifareKey;
use crate::utils::{ms, DEFAULT_POLL_INTERVAL_MS, DEFAULT_REMOVAL_BACKOFF_MS};

/// How the chip is wired to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    pub bus: u8,
    pub device: u8,
    pub speed_hz: u32,
    pub pin_reset: u8,
    pub pin_ce: u8,
    pub pin_irq: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            speed_hz: 1_000_000,
            pin_reset: 25,
            pin_ce: 0,
            pin_irq: 24,
        }
    }
}

/// Timing and policy for [`crate::session::CardSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// How long to block on the interrupt before re-arming the receiver.
    pub poll_interval: Duration,
    /// Back-off between presence sweeps while waiting for card removal.
    pub removal_backoff: Duration,
    /// Consecutive failed WUPAs before a card counts as removed.
    pub removal_retries: usize,
    pub key: MifareKey,
    pub encoding: TextEncoding,
    pub errors: DecodeErrors,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: ms(DEFAULT_POLL_INTERVAL_MS),
            removal_backoff: ms(DEFAULT_REMOVAL_BACKOFF_MS),
            removal_retries: 5,
            key: MifareKey::default(),
            encoding: TextEncoding::Utf8,
            errors: DecodeErrors::Ignore,
        }
    }
}
