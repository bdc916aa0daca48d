// libmfrc522/src/error.rs

use thiserror::Error;

use crate::status::StatusCode;

/// Common error type.
///
/// `Transport` and `Gpio` are hardware faults. Every protocol outcome that is
/// not a success is carried as `Status` so callers can match on the
/// classification (`Timeout`, `Collision`, `MifareNack`, ...).
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("gpio error: {0}")]
    Gpio(String),

    #[error("status: {0}")]
    Status(#[from] StatusCode),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    #[cfg(feature = "rpi")]
    #[error("spi error: {0}")]
    Spi(#[from] rppal::spi::Error),

    #[cfg(feature = "rpi")]
    #[error("gpio error: {0}")]
    RpiGpio(#[from] rppal::gpio::Error),
}

impl Error {
    /// The embedded protocol status, or `None` for hardware faults.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
