// libmfrc522/src/types.rs

use std::fmt;

use crate::Error;
use crate::card::PiccType;
use crate::constants::{MF_BLOCK_SIZE, MF_KEY_SIZE, UID_MAX_SIZE};

/// UID of a selected PICC (4, 7 or 10 bytes) plus the SAK returned by the
/// final cascade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid {
    bytes: [u8; UID_MAX_SIZE],
    size: u8,
    sak: Option<u8>,
}

impl Uid {
    /// Empty UID (size 0, no SAK).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a UID from its 4, 7 or 10 bytes. The SAK stays unset until a
    /// select succeeds.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match bytes.len() {
            4 | 7 | 10 => {
                let mut buf = [0u8; UID_MAX_SIZE];
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(Self {
                    bytes: buf,
                    size: bytes.len() as u8,
                    sak: None,
                })
            }
            n => Err(Error::InvalidLength {
                expected: if n < 4 {
                    4
                } else if n < 7 {
                    7
                } else {
                    10
                },
                actual: n,
            }),
        }
    }

    pub(crate) fn from_parts(bytes: [u8; UID_MAX_SIZE], size: u8, sak: Option<u8>) -> Self {
        Self { bytes, size, sak }
    }

    /// The `size` valid UID bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size as usize]
    }

    /// Whole 10-byte buffer, including bytes past `size`.
    pub fn raw(&self) -> &[u8; UID_MAX_SIZE] {
        &self.bytes
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn sak(&self) -> Option<u8> {
        self.sak
    }

    /// Number of cascade levels needed for this UID size.
    pub fn cascade_levels(&self) -> u8 {
        match self.size {
            0..=4 => 1,
            5..=7 => 2,
            _ => 3,
        }
    }

    /// Legacy numeric fingerprint: big-endian fold over the first five bytes
    /// of the UID buffer.
    pub fn to_number(&self) -> u64 {
        self.bytes[..5]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    /// Classify the card from `sak & 0x7F`.
    pub fn picc_type(&self) -> PiccType {
        PiccType::from_sak(self.sak)
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Uid::from_bytes(bytes)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<UID: [{}], SAK: {:#04x}, Type: {}>",
            crate::utils::bytes_to_hex_spaced(self.as_bytes()),
            self.sak.unwrap_or(0),
            self.picc_type()
        )
    }
}

/// 6-byte Crypto1 key. Every instance owns its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MifareKey([u8; MF_KEY_SIZE]);

impl MifareKey {
    /// Key all cards ship with: FF FF FF FF FF FF.
    pub const FACTORY: MifareKey = MifareKey([0xFF; MF_KEY_SIZE]);

    pub const fn new(bytes: [u8; MF_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MF_KEY_SIZE] {
        &self.0
    }
}

impl Default for MifareKey {
    fn default() -> Self {
        Self::FACTORY
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != MF_KEY_SIZE {
            return Err(Error::InvalidLength {
                expected: MF_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; MF_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// MIFARE Classic value block: a signed 32-bit counter stored three times
/// (plain, inverted, plain) followed by its address (plain, inverted,
/// plain, inverted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueBlock {
    pub value: i32,
    pub addr: u8,
}

impl ValueBlock {
    pub fn new(value: i32, addr: u8) -> Self {
        Self { value, addr }
    }

    pub fn encode(&self) -> [u8; MF_BLOCK_SIZE] {
        let v = self.value.to_le_bytes();
        let mut block = [0u8; MF_BLOCK_SIZE];
        block[0..4].copy_from_slice(&v);
        for i in 0..4 {
            block[4 + i] = !v[i];
        }
        block[8..12].copy_from_slice(&v);
        block[12] = self.addr;
        block[13] = !self.addr;
        block[14] = self.addr;
        block[15] = !self.addr;
        block
    }

    /// Value stored in bytes 0..4, without checking the redundancy.
    pub fn raw_value(block: &[u8; MF_BLOCK_SIZE]) -> i32 {
        i32::from_le_bytes([block[0], block[1], block[2], block[3]])
    }

    /// True when all copies of value and address agree.
    pub fn is_valid(block: &[u8; MF_BLOCK_SIZE]) -> bool {
        (0..4).all(|i| block[i] == block[8 + i] && block[i] == !block[4 + i])
            && block[12] == block[14]
            && block[13] == block[15]
            && block[12] == !block[13]
    }

    pub fn decode(block: &[u8; MF_BLOCK_SIZE]) -> Result<Self, Error> {
        if !Self::is_valid(block) {
            return Err(Error::Decode(format!(
                "not a value block: [{}]",
                crate::utils::bytes_to_hex_spaced(block)
            )));
        }
        Ok(Self {
            value: Self::raw_value(block),
            addr: block[12],
        })
    }
}
