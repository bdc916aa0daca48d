// libmfrc522/src/protocol/commands/mifare.rs
//
// Frame encoders for the ISO14443A / MIFARE commands that carry arguments.
// CRC_A is not included; the device layer appends it with the coprocessor.

use super::PiccCommand;
use crate::types::{MifareKey, Uid};

/// HLTA: `50 00`.
pub fn encode_halt() -> [u8; 2] {
    [PiccCommand::Hlta.code(), 0x00]
}

/// MFAuthent payload: `[cmd, block, key(6), uid[size-4..size]]`.
pub fn encode_authenticate(cmd: PiccCommand, block_addr: u8, key: &MifareKey, uid: &Uid) -> [u8; 12] {
    let mut out = [0u8; 12];
    out[0] = cmd.code();
    out[1] = block_addr;
    out[2..8].copy_from_slice(key.as_bytes());
    let raw = uid.raw();
    let start = (uid.size() as usize).saturating_sub(4);
    out[8..12].copy_from_slice(&raw[start..start + 4]);
    out
}

pub fn encode_read(block_addr: u8) -> [u8; 2] {
    [PiccCommand::MfRead.code(), block_addr]
}

/// First phase of a 16-byte write.
pub fn encode_write(block_addr: u8) -> [u8; 2] {
    [PiccCommand::MfWrite.code(), block_addr]
}

pub fn encode_ultralight_write(page: u8, data: &[u8; 4]) -> [u8; 6] {
    [PiccCommand::UlWrite.code(), page, data[0], data[1], data[2], data[3]]
}

/// First phase of increment/decrement/restore, and the whole transfer frame.
pub fn encode_two_step(cmd: PiccCommand, block_addr: u8) -> [u8; 2] {
    [cmd.code(), block_addr]
}
