// fixtures.rs: UIDs, keys and block contents used across the tests

use libmfrc522::MifareKey;

pub const SINGLE_UID: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

pub const DOUBLE_UID: [u8; 7] = [0x04, 0x1F, 0x2E, 0x3D, 0x4C, 0x5B, 0x6A];

pub const TRIPLE_UID: [u8; 10] = [0x08, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x99, 0xAA];

/// MAD key A from NXP AN10787.
pub fn custom_key() -> MifareKey {
    let bytes: [u8; 6] = hex::decode("a0a1a2a3a4a5")
        .unwrap()
        .try_into()
        .unwrap();
    MifareKey::new(bytes)
}

pub fn text_block(text: &str) -> [u8; 16] {
    let mut block = [0u8; 16];
    let n = text.len().min(16);
    block[..n].copy_from_slice(&text.as_bytes()[..n]);
    block
}

pub fn patterned_block(seed: u8) -> [u8; 16] {
    let mut block = [0u8; 16];
    for (i, b) in block.iter_mut().enumerate() {
        *b = seed.wrapping_mul(31).wrapping_add(i as u8);
    }
    block
}
