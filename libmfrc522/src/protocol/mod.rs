// libmfrc522/src/protocol/mod.rs

pub mod checksum;
pub mod commands;

pub use checksum::{bcc, check_crc_a, crc_a};
pub use commands::*;
