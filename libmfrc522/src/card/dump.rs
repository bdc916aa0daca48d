// libmfrc522/src/card/dump.rs

//! Human readable dumps of the reader and of card memory.

use std::fmt::Write;

use log::warn;

use crate::card::PiccType;
use crate::constants::{MF_BLOCK_SIZE, UL_PAGE_COUNT, UL_PAGE_SIZE};
use crate::device::{Device, Initialized};
use crate::protocol::PiccCommand;
use crate::types::{MifareKey, Uid};
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

/// Access conditions decoded from bytes 6..9 of a sector trailer.
///
/// Group 3 covers the trailer itself. In 4-block sectors groups 0..2 are
/// one block each; in 16-block sectors they cover five blocks each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessBits {
    /// `[C1 C2 C3]` per group, C1 in bit 2.
    pub groups: [u8; 4],
    /// The inverted copies did not match the plain nibbles.
    pub inverted_error: bool,
}

impl AccessBits {
    pub fn from_trailer(trailer: &[u8; MF_BLOCK_SIZE]) -> Self {
        let c1 = trailer[7] >> 4;
        let c2 = trailer[8] & 0x0F;
        let c3 = trailer[8] >> 4;
        let c1_inv = trailer[6] & 0x0F;
        let c2_inv = trailer[6] >> 4;
        let c3_inv = trailer[7] & 0x0F;
        let inverted_error =
            c1 != (!c1_inv & 0x0F) || c2 != (!c2_inv & 0x0F) || c3 != (!c3_inv & 0x0F);

        let mut groups = [0u8; 4];
        for (i, g) in groups.iter_mut().enumerate() {
            *g = (((c1 >> i) & 1) << 2) | (((c2 >> i) & 1) << 1) | ((c3 >> i) & 1);
        }
        Self {
            groups,
            inverted_error,
        }
    }

    /// `[C1 C2 C3]` of `group` as three bits.
    pub fn group(&self, group: usize) -> u8 {
        self.groups[group & 0x03]
    }

    /// Data block groups configured as value blocks (110 or 001).
    pub fn is_value_group(&self, group: usize) -> bool {
        group < 3 && matches!(self.group(group), 0b110 | 0b001)
    }
}

/// UID, SAK and card type, one per line.
pub fn dump_details(uid: &Uid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Card UID:     [{}]", bytes_to_hex_spaced(uid.as_bytes()));
    let _ = writeln!(out, "Card SAK:     {:#04x}", uid.sak().unwrap_or(0));
    let _ = writeln!(out, "PICC type:    {}", uid.picc_type());
    out
}

impl<State> Device<State> {
    pub fn dump_version(&mut self) -> Result<String> {
        let version = self.version()?;
        let mut out = format!("Firmware Version: {:#04x} = {}\n", version.raw(), version);
        if version.is_bus_failure() {
            out.push_str("WARNING: Communication failure, is the MFRC522 properly connected?\n");
        }
        Ok(out)
    }
}

impl Device<Initialized> {
    /// Details plus memory contents of the selected card. Classic cards are
    /// read with the factory key. The card is halted afterwards.
    pub fn dump(&mut self, uid: &Uid) -> Result<String> {
        let mut out = dump_details(uid);
        let picc_type = uid.picc_type();
        match picc_type {
            t if t.is_mifare_classic() => {
                out.push_str(&self.dump_mifare_classic(uid, &MifareKey::FACTORY)?);
                return Ok(out);
            }
            PiccType::MifareUltralight => out.push_str(&self.dump_mifare_ultralight()?),
            PiccType::Iso14443_4
            | PiccType::MifareDesfire
            | PiccType::Iso18092
            | PiccType::MifarePlus
            | PiccType::Tnp3xxx => {
                out.push_str("Dumping memory contents not implemented for that PICC type.\n")
            }
            _ => {}
        }
        self.halt_quietly();
        Ok(out)
    }

    /// Every sector with key A, trailers decoded. Halts the card and stops
    /// Crypto1 at the end.
    pub fn dump_mifare_classic(&mut self, uid: &Uid, key: &MifareKey) -> Result<String> {
        let picc_type = uid.picc_type();
        let mut out = String::new();
        if picc_type.sector_count() > 0 {
            out.push_str("Sector Block  ");
            for i in 0..MF_BLOCK_SIZE {
                let _ = write!(out, " {:>2}", i);
            }
            out.push_str("  AccessBits\n");
            for sector in 0..picc_type.sector_count() {
                self.dump_classic_sector(&mut out, uid, key, picc_type, sector)?;
            }
        }
        self.halt_quietly();
        self.stop_crypto1()?;
        Ok(out)
    }

    fn dump_classic_sector(
        &mut self,
        out: &mut String,
        uid: &Uid,
        key: &MifareKey,
        picc_type: PiccType,
        sector: u8,
    ) -> Result<()> {
        let Some(def) = picc_type.sector_definition(sector) else {
            return Ok(());
        };
        let first_block = def.first_block();
        let block_count = def.trailer_block - first_block + 1;

        if let Err(e) = self.authenticate(PiccCommand::MfAuthKeyA, first_block, key, uid) {
            return dump_failure(out, "PCD_Authenticate()", e);
        }

        let mut access = None;
        for offset in (0..block_count).rev() {
            let block_addr = first_block + offset;
            let data = match self.mifare_read(block_addr) {
                Ok(data) => data,
                Err(e) => {
                    dump_failure(out, "MIFARE_Read()", e)?;
                    continue;
                }
            };

            // rows run from the trailer down, so a failed trailer read
            // leaves the whole sector without access bits
            if block_addr == def.trailer_block {
                access = Some(AccessBits::from_trailer(&data));
            }
            let sector_label = if block_addr == def.trailer_block {
                sector.to_string()
            } else {
                String::new()
            };

            let (group, first_in_group) = if block_count == 4 {
                (offset as usize, true)
            } else {
                let group = offset as usize / 5;
                (group, group == 3 || group != (offset as usize + 1) / 5)
            };

            let _ = write!(
                out,
                "{:>6} {:>5}  {}  ",
                sector_label,
                block_addr,
                bytes_to_hex_spaced(&data)
            );
            let Some(bits) = access else {
                if first_in_group {
                    out.push_str("access bits unavailable");
                }
                out.push('\n');
                continue;
            };
            if first_in_group {
                let g = bits.group(group);
                let _ = write!(out, "[{} {} {}] ", (g >> 2) & 1, (g >> 1) & 1, g & 1);
                if bits.inverted_error {
                    out.push_str(" Inverted access bits did not match! ");
                }
            }
            if bits.is_value_group(group) {
                let value = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
                let _ = write!(out, "Value={:#x} Adr={:#04x} ", value, data[12]);
            }
            out.push('\n');
        }
        Ok(())
    }

    /// Pages 0..15, four per READ.
    pub fn dump_mifare_ultralight(&mut self) -> Result<String> {
        let mut out = String::from("Page   0  1  2  3\n");
        for page in (0..UL_PAGE_COUNT).step_by(4) {
            let data = match self.mifare_read(page) {
                Ok(data) => data,
                Err(e) => {
                    dump_failure(&mut out, "MIFARE_Read()", e)?;
                    break;
                }
            };
            for (offset, chunk) in data.chunks(UL_PAGE_SIZE).enumerate() {
                let _ = writeln!(out, "{:>4}  {}", page as usize + offset, bytes_to_hex_spaced(chunk));
            }
        }
        Ok(out)
    }

    fn halt_quietly(&mut self) {
        if let Err(e) = self.halt_a() {
            warn!("halt after dump failed: {}", e);
        }
    }
}

/// Protocol failures are written into the dump; bus faults abort it.
fn dump_failure(out: &mut String, what: &str, err: Error) -> Result<()> {
    match err.status() {
        Some(status) => {
            let _ = writeln!(out, "{} failed: {}", what, status);
            Ok(())
        }
        None => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SimCard, SimChip};

    const DEFAULT_TRAILER: [u8; 16] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x80, 0x69, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF,
    ];

    #[test]
    fn transport_configuration_access_bits() {
        let bits = AccessBits::from_trailer(&DEFAULT_TRAILER);
        assert!(!bits.inverted_error);
        assert_eq!(bits.groups, [0b000, 0b000, 0b000, 0b001]);
        assert!(!bits.is_value_group(3));
    }

    #[test]
    fn value_group_and_inverted_error() {
        // C1=0b0010, C2=0b0010, C3=0b0000 -> group 1 is 110
        let mut trailer = DEFAULT_TRAILER;
        let (c1, c2, c3) = (0x2u8, 0x2u8, 0x0u8);
        trailer[6] = ((!c2 & 0x0F) << 4) | (!c1 & 0x0F);
        trailer[7] = (c1 << 4) | (!c3 & 0x0F);
        trailer[8] = (c3 << 4) | c2;
        let bits = AccessBits::from_trailer(&trailer);
        assert!(!bits.inverted_error);
        assert_eq!(bits.group(1), 0b110);
        assert!(bits.is_value_group(1));

        trailer[6] ^= 0x01;
        assert!(AccessBits::from_trailer(&trailer).inverted_error);
    }

    #[test]
    fn details_lines() {
        let uid = Uid::from_parts([0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0, 0, 0], 4, Some(0x08));
        let text = dump_details(&uid);
        assert!(text.contains("Card UID:     [de ad be ef]"));
        assert!(text.contains("Card SAK:     0x08"));
        assert!(text.contains("1KB"));
    }

    #[test]
    fn classic_dump_covers_every_block() {
        let chip = SimChip::new();
        chip.add_card(SimCard::mifare_mini(&[0x10, 0x20, 0x30, 0x40]));
        let mut dev = chip.initialized_device().unwrap();
        dev.request_a().unwrap();
        let uid = dev.read_card_serial().unwrap();
        assert_eq!(uid.picc_type(), PiccType::MifareMini);

        let text = dev.dump(&uid).unwrap();
        // 5 sectors of 4 blocks, each row carrying its access bits
        let rows = text.lines().filter(|l| l.contains("[0 0 ")).count();
        assert_eq!(rows, 20);
        assert!(text.contains("[0 0 1]"));
        assert!(!text.contains("failed"));
        assert!(!dev.is_crypto1_on().unwrap());
        // card is halted
        assert!(!dev.is_new_card_present().unwrap());
    }

    #[test]
    fn unreadable_trailer_leaves_sector_without_access_bits() {
        let chip = SimChip::new();
        // sector 1 trailer is block 7
        chip.add_card(SimCard::mifare_mini(&[0x10, 0x20, 0x30, 0x40]).with_unreadable_block(7));
        let mut dev = chip.initialized_device().unwrap();
        dev.request_a().unwrap();
        let uid = dev.read_card_serial().unwrap();

        let text = dev.dump(&uid).unwrap();
        assert!(text.contains("MIFARE_Read() failed"));
        let unavailable: Vec<&str> = text.lines().filter(|l| l.contains("access bits unavailable")).collect();
        assert_eq!(unavailable.len(), 3);
        assert!(unavailable.iter().all(|l| !l.contains("[0 ")));
        // the other four sectors still decode from their own trailers
        let rows = text.lines().filter(|l| l.contains("[0 0 ")).count();
        assert_eq!(rows, 16);
    }

    #[test]
    fn ultralight_dump_lists_sixteen_pages() {
        let chip = SimChip::new();
        chip.add_card(SimCard::ultralight(&[0x04, 0x1F, 0x2E, 0x3D, 0x4C, 0x5B, 0x6A]));
        let mut dev = chip.initialized_device().unwrap();
        dev.request_a().unwrap();
        let uid = dev.read_card_serial().unwrap();
        let text = dev.dump(&uid).unwrap();
        assert!(text.contains("MIFARE Ultralight"));
        assert!(text.contains("  15  "));
        assert!(!text.contains("failed"));
    }

    #[test]
    fn version_dump() {
        let chip = SimChip::with_version(0x91);
        let mut dev = chip.initialized_device().unwrap();
        assert_eq!(dev.dump_version().unwrap(), "Firmware Version: 0x91 = v1.0\n");
    }
}
