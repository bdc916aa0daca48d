// libmfrc522/src/card/mod.rs

//! PICC side: card classification, ISO 14443-3 activation, MIFARE
//! commands and memory dumps. The commands are methods on
//! `Device<Initialized>`.

pub mod dump;
pub mod operations;
mod picc_type;
pub mod select;

pub use dump::{dump_details, AccessBits};
pub use picc_type::{PiccType, SectorDefinition};
