// libmfrc522/src/card/picc_type.rs

use std::fmt;

use log::error;

use crate::constants::MF_BLOCK_SIZE;

/// Card family, derived from the SAK (NXP AN10833, 3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PiccType {
    #[default]
    Unknown,
    Iso14443_4,
    Iso18092,
    MifareMini,
    Mifare1K,
    Mifare4K,
    MifareUltralight,
    MifarePlus,
    MifareDesfire,
    Tnp3xxx,
    NotComplete,
}

impl fmt::Display for PiccType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Block layout of one MIFARE Classic sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorDefinition {
    pub first_data_block: u8,
    pub trailer_block: u8,
    pub data_block_count: u8,
}

impl SectorDefinition {
    /// Addresses of the data blocks, ascending.
    pub fn data_blocks(&self) -> impl Iterator<Item = u8> {
        let first = self.first_data_block;
        (0..self.data_block_count).map(move |i| first + i)
    }

    /// First block of the sector, including manufacturer data in sector 0.
    pub fn first_block(&self) -> u8 {
        if self.first_data_block == 1 {
            0
        } else {
            self.first_data_block
        }
    }
}

impl PiccType {
    /// Classify from a SAK. Bit 8 is ignored (Infineon sets it). Unmapped
    /// values are logged and reported as `Unknown`.
    pub fn from_sak(sak: Option<u8>) -> PiccType {
        let Some(sak) = sak else {
            return PiccType::Unknown;
        };
        match sak & 0x7F {
            0x00 => PiccType::MifareUltralight,
            0x01 => PiccType::Tnp3xxx,
            0x04 => PiccType::NotComplete,
            0x08 => PiccType::Mifare1K,
            0x09 => PiccType::MifareMini,
            0x10 => PiccType::MifarePlus,
            0x11 => PiccType::MifareDesfire,
            0x18 => PiccType::Mifare4K,
            0x20 => PiccType::Iso14443_4,
            0x40 => PiccType::Iso18092,
            other => {
                error!("unknown SAK value {:#04x}, cannot identify PICC type", other);
                PiccType::Unknown
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PiccType::Unknown => "Unknown PICC type",
            PiccType::Iso14443_4 => "PICC compliant with ISO/IEC 14443-4",
            PiccType::Iso18092 => "PICC compliant with ISO/IEC 18092 (NFC)",
            PiccType::MifareMini => "MIFARE Classic protocol, 320 bytes",
            PiccType::Mifare1K => "MIFARE Classic protocol, 1KB",
            PiccType::Mifare4K => "MIFARE Classic protocol, 4KB",
            PiccType::MifareUltralight => "MIFARE Ultralight or Ultralight C",
            PiccType::MifarePlus => "MIFARE Plus",
            PiccType::MifareDesfire => "MIFARE DESFire",
            PiccType::Tnp3xxx => "TNP3XXX",
            PiccType::NotComplete => "SAK indicates UID is not complete",
        }
    }

    pub fn is_mifare_classic(self) -> bool {
        matches!(
            self,
            PiccType::MifareMini | PiccType::Mifare1K | PiccType::Mifare4K
        )
    }

    pub fn is_mifare_ultralight(self) -> bool {
        self == PiccType::MifareUltralight
    }

    /// 5 sectors for Mini, 16 for 1K, 40 for 4K, 0 otherwise.
    pub fn sector_count(self) -> u8 {
        match self {
            PiccType::MifareMini => 5,
            PiccType::Mifare1K => 16,
            PiccType::Mifare4K => 40,
            _ => 0,
        }
    }

    /// Layout of `sector`, or `None` past the last sector of this type.
    ///
    /// Sectors 0..31 have four blocks (sector 0 loses block 0 to
    /// manufacturer data), sectors 32..39 have sixteen.
    pub fn sector_definition(self, sector: u8) -> Option<SectorDefinition> {
        if sector >= self.sector_count() {
            return None;
        }
        let def = match sector {
            0 => SectorDefinition {
                first_data_block: 1,
                trailer_block: 3,
                data_block_count: 2,
            },
            1..=31 => SectorDefinition {
                first_data_block: sector * 4,
                trailer_block: sector * 4 + 3,
                data_block_count: 3,
            },
            _ => {
                let first = 128 + (sector - 32) * 16;
                SectorDefinition {
                    first_data_block: first,
                    trailer_block: first + 15,
                    data_block_count: 15,
                }
            }
        };
        Some(def)
    }

    /// Sector layouts in ascending order.
    pub fn sectors(self) -> impl Iterator<Item = SectorDefinition> {
        (0..self.sector_count()).filter_map(move |s| self.sector_definition(s))
    }

    /// User data capacity in bytes, summed over every data block.
    pub fn max_data_bytes(self) -> usize {
        self.sectors()
            .map(|s| s.data_block_count as usize * MF_BLOCK_SIZE)
            .sum()
    }
}
