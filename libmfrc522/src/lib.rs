// libmfrc522/src/lib.rs

//! libmfrc522
//!
//! Pure Rust driver for the NXP MFRC522 contactless reader: register access
//! over SPI, ISO/IEC 14443A card activation and MIFARE Classic / Ultralight
//! memory operations, plus a blocking card session driven by the IRQ pin.

pub mod card;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod status;
#[doc(hidden)]
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// `crate::Error`, `crate::Result` and the value types in `types` are used
// throughout the crate and by the prelude.
pub use crate::error::*;
pub use crate::status::StatusCode;
pub use crate::types::*;

pub use prelude::*;
