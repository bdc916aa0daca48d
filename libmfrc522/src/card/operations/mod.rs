// libmfrc522/src/card/operations/mod.rs

//! MIFARE Classic and Ultralight commands on an ACTIVE card.

pub mod auth;
pub mod read;
pub mod value;
pub mod write;
