// libmfrc522/src/status.rs

use derive_more::Display;

use crate::{Error, Result};

/// Outcome of a reader or card operation.
///
/// `Ok` is the only success value. Use [`StatusCode::is_ok`] or
/// [`StatusCode::into_result`] instead of comparing against `Ok` by hand.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCode {
    #[display(fmt = "Success")]
    Ok,
    #[display(fmt = "Error in communication")]
    Error,
    #[display(fmt = "Collision detected")]
    Collision,
    #[display(fmt = "Timeout in communication")]
    Timeout,
    #[display(fmt = "A buffer is not big enough")]
    NoRoom,
    #[display(fmt = "Internal error in the driver")]
    InternalError,
    #[display(fmt = "Invalid argument")]
    Invalid,
    #[display(fmt = "The CRC_A does not match")]
    CrcWrong,
    #[display(fmt = "A MIFARE PICC responded with NAK")]
    MifareNack,
    #[display(fmt = "Blocking wait was canceled")]
    Canceled,
}

impl StatusCode {
    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }

    /// `Ok` becomes `Ok(())`, anything else `Err(Error::Status(self))`.
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::Status(self))
        }
    }

    /// Numeric code, stable across releases.
    pub fn code(self) -> u8 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::Error => 1,
            StatusCode::Collision => 2,
            StatusCode::Timeout => 3,
            StatusCode::NoRoom => 4,
            StatusCode::InternalError => 5,
            StatusCode::Invalid => 6,
            StatusCode::CrcWrong => 7,
            StatusCode::MifareNack => 8,
            StatusCode::Canceled => 9,
        }
    }
}

impl std::error::Error for StatusCode {}
