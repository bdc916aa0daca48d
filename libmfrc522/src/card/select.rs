// libmfrc522/src/card/select.rs

//! ISO/IEC 14443-3 activation: REQA/WUPA, anti-collision, SELECT and HLTA.

use log::{debug, error, info, trace, warn};

use crate::constants::{
    CASCADE_LEVEL_BITS, COLL_POS_MASK, COLL_POS_NOT_VALID, COLL_VALUES_AFTER_COLL, INIT_MOD_WIDTH,
    SELECT_MAX_KNOWN_BITS, UID_MAX_SIZE,
};
use crate::device::access::merge_rx_aligned;
use crate::device::{Device, Framing, Initialized, Register};
use crate::protocol::{bcc, encode_halt, PiccCommand};
use crate::status::StatusCode;
use crate::types::Uid;
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

/// Where one cascade level reads and writes the UID.
#[derive(Debug, Clone, Copy)]
struct CascadeLevel {
    sel: PiccCommand,
    /// First UID byte resolved by this level.
    uid_index: usize,
    /// Byte 2 of the frame carries the cascade tag instead of UID data.
    cascade_tag: bool,
}

impl CascadeLevel {
    fn new(level: u8, known_size: u8, known_bits: u8) -> Option<Self> {
        let partial = known_bits > 0;
        match level {
            1 => Some(Self {
                sel: PiccCommand::SelCl1,
                uid_index: 0,
                cascade_tag: partial && known_size > 4,
            }),
            2 => Some(Self {
                sel: PiccCommand::SelCl2,
                uid_index: 3,
                cascade_tag: partial && known_size > 7,
            }),
            3 => Some(Self {
                sel: PiccCommand::SelCl3,
                uid_index: 6,
                cascade_tag: false,
            }),
            _ => None,
        }
    }
}

/// SEL + NVB + 4 UID/CT bytes + BCC + CRC_A.
type SelectFrame = [u8; 9];

impl Device<Initialized> {
    /// REQA: invite cards in IDLE to READY. Returns the ATQA.
    pub fn request_a(&mut self) -> Result<[u8; 2]> {
        self.reqa_or_wupa(PiccCommand::Reqa)
    }

    /// WUPA: invite cards in IDLE or HALT to READY. Returns the ATQA.
    pub fn wakeup_a(&mut self) -> Result<[u8; 2]> {
        self.reqa_or_wupa(PiccCommand::Wupa)
    }

    pub fn reqa_or_wupa(&mut self, command: PiccCommand) -> Result<[u8; 2]> {
        trace!("reqa_or_wupa {}", command);
        self.clear_bits(Register::Coll, COLL_VALUES_AFTER_COLL)?;
        // short frame: 7 bits of the only byte
        let ex = self.transceive(&[command.code()], true, Framing::bits(7))?;
        ex.status.into_result()?;
        match ex.data.as_slice() {
            [a, b] if ex.valid_bits == 0 => Ok([*a, *b]),
            other => {
                debug!(
                    "ATQA must be exactly 16 bits, got [{}] with {} extra bits",
                    bytes_to_hex_spaced(other),
                    ex.valid_bits
                );
                Err(StatusCode::Error.into())
            }
        }
    }

    /// True when a card in IDLE answers REQA, or several cards collide.
    pub fn is_new_card_present(&mut self) -> Result<bool> {
        self.reset_baud_rates()?;
        presence(self.request_a())
    }

    /// Like `is_new_card_present` but uses WUPA, so halted cards answer too.
    pub fn is_card_present(&mut self) -> Result<bool> {
        self.reset_baud_rates()?;
        presence(self.wakeup_a())
    }

    fn reset_baud_rates(&mut self) -> Result<()> {
        self.write_register(Register::TxMode, 0x00)?;
        self.write_register(Register::RxMode, 0x00)?;
        self.write_register(Register::ModWidth, INIT_MOD_WIDTH)
    }

    /// Select one card after `is_new_card_present` returned true.
    pub fn read_card_serial(&mut self) -> Result<Uid> {
        let uid = self.select(None, 0)?;
        info!("card selected: {}", uid);
        Ok(uid)
    }

    /// Run anti-collision and SELECT over all cascade levels.
    ///
    /// `known` and `known_bits` let the caller supply leading UID bits that
    /// are already certain; pass `None, 0` to discover the UID from
    /// scratch. On success the chosen card is ACTIVE and the returned UID
    /// carries its SAK. Cards must be in READY, see [`Self::request_a`].
    pub fn select(&mut self, known: Option<&Uid>, known_bits: u8) -> Result<Uid> {
        if known_bits > SELECT_MAX_KNOWN_BITS {
            error!("select: {} known bits is more than a 10 byte UID", known_bits);
            return Err(StatusCode::Invalid.into());
        }
        let known_size = known.map(Uid::size).unwrap_or(0);
        let mut uid_bytes = known.map(|u| *u.raw()).unwrap_or([0u8; UID_MAX_SIZE]);

        self.clear_bits(Register::Coll, COLL_VALUES_AFTER_COLL)?;

        let mut level = 1u8;
        let sak = loop {
            let Some(cascade) = CascadeLevel::new(level, known_size, known_bits) else {
                error!("select: cascade level {} out of range", level);
                return Err(StatusCode::InternalError.into());
            };
            trace!("select: cascade level {}", level);

            let mut frame: SelectFrame = [0; 9];
            frame[0] = cascade.sel.code();
            let mut level_bits = (known_bits as usize).saturating_sub(8 * cascade.uid_index);
            let mut dst = 2;
            if cascade.cascade_tag {
                frame[2] = PiccCommand::CascadeTag.code();
                dst = 3;
            }
            let max_bytes = if cascade.cascade_tag { 3 } else { 4 };
            let copy = level_bits.div_ceil(8).min(max_bytes);
            frame[dst..dst + copy]
                .copy_from_slice(&uid_bytes[cascade.uid_index..cascade.uid_index + copy]);
            if cascade.cascade_tag {
                level_bits += 8;
            }

            let response = self.resolve_level(&mut frame, level_bits)?;

            let (src, count) = if frame[2] == PiccCommand::CascadeTag.code() {
                (3, 3)
            } else {
                (2, 4)
            };
            uid_bytes[cascade.uid_index..cascade.uid_index + count]
                .copy_from_slice(&frame[src..src + count]);

            let sak = self.check_sak(&response)?;
            if sak & 0x04 != 0 {
                debug!("select: SAK {:#04x} has the cascade bit set", sak);
                level += 1;
            } else {
                break sak;
            }
        };

        let size = 3 * level + 1;
        let uid = Uid::from_parts(uid_bytes, size, Some(sak));
        debug!("select: resolved [{}]", bytes_to_hex_spaced(uid.as_bytes()));
        Ok(uid)
    }

    /// Anti-collision loop for one cascade level. Returns the raw SAK
    /// response once SELECT succeeds.
    ///
    /// Every collision strictly increases `level_bits`, so the loop ends
    /// after at most 32 anti-collision rounds and one SELECT.
    fn resolve_level(&mut self, frame: &mut SelectFrame, mut level_bits: usize) -> Result<ExchangeBits> {
        let limit = CASCADE_LEVEL_BITS as usize + 1;
        for _ in 0..=limit {
            if level_bits >= CASCADE_LEVEL_BITS as usize {
                trace!("select: all 32 bits known, SELECT");
                frame[1] = 0x70;
                frame[6] = bcc(&frame[2..6]);
                let crc = self.calculate_crc(&frame[..7])?;
                frame[7..9].copy_from_slice(&crc);

                let ex = self.transceive(&frame[..], true, Framing::default())?;
                match ex.status {
                    StatusCode::Ok => {
                        return Ok(ExchangeBits {
                            data: ex.data,
                            valid_bits: ex.valid_bits,
                        });
                    }
                    StatusCode::Collision => self.force_collision_bit(frame, &mut level_bits)?,
                    other => return Err(other.into()),
                }
            } else {
                let tx_last_bits = (level_bits % 8) as u8;
                let whole = 2 + level_bits / 8;
                frame[1] = ((whole as u8) << 4) | tx_last_bits;
                let used = whole + usize::from(tx_last_bits > 0);
                trace!(
                    "select: ANTICOLLISION with {} known bits, nvb={:#04x}",
                    level_bits,
                    frame[1]
                );

                let framing = Framing {
                    tx_last_bits,
                    rx_align: tx_last_bits,
                    check_crc: false,
                };
                let ex = self.transceive(&frame[..used], true, framing)?;
                if ex.data.is_empty() {
                    warn!("select: no data received during anti-collision");
                }
                merge_rx_aligned(&mut frame[whole..], &ex.data, tx_last_bits);

                match ex.status {
                    StatusCode::Collision => self.force_collision_bit(frame, &mut level_bits)?,
                    StatusCode::Ok => level_bits = CASCADE_LEVEL_BITS as usize,
                    other => return Err(other.into()),
                }
            }
        }
        error!("select: anti-collision did not converge");
        Err(StatusCode::InternalError.into())
    }

    /// Pick the card that sent a 1 at the collision position.
    fn force_collision_bit(&mut self, frame: &mut SelectFrame, level_bits: &mut usize) -> Result<()> {
        let coll = self.read_register(Register::Coll)?;
        if coll & COLL_POS_NOT_VALID != 0 {
            error!("select: collision position not valid");
            return Err(StatusCode::Collision.into());
        }
        let mut position = (coll & COLL_POS_MASK) as usize;
        if position == 0 {
            position = 32;
        }
        if position <= *level_bits {
            error!(
                "select: no progress, collision at bit {} with {} bits known",
                position, level_bits
            );
            return Err(StatusCode::InternalError.into());
        }
        debug!("select: collision at bit {}", position);
        *level_bits = position;
        let bit = (position - 1) % 8;
        let index = 1 + position / 8 + usize::from(position % 8 != 0);
        frame[index] |= 1 << bit;
        Ok(())
    }

    fn check_sak(&mut self, response: &ExchangeBits) -> Result<u8> {
        if response.data.len() != 3 || response.valid_bits != 0 {
            error!(
                "select: SAK must be exactly 24 bits, got {} bytes and {} extra bits",
                response.data.len(),
                response.valid_bits
            );
            return Err(StatusCode::Error.into());
        }
        let crc = self.calculate_crc(&response.data[..1])?;
        if response.data[1..3] != crc {
            error!("select: wrong CRC_A on SAK");
            return Err(StatusCode::CrcWrong.into());
        }
        Ok(response.data[0])
    }

    /// HLTA. Any answer within the timeout counts as NAK, so only
    /// `Timeout` from the exchange means success.
    pub fn halt_a(&mut self) -> Result<()> {
        trace!("halt_a");
        let halt = encode_halt();
        let crc = self.calculate_crc(&halt)?;
        let frame = [halt[0], halt[1], crc[0], crc[1]];
        let ex = self.transceive(&frame, false, Framing::default())?;
        match ex.status {
            StatusCode::Timeout => Ok(()),
            StatusCode::Ok => {
                warn!("card answered HLTA");
                Err(StatusCode::Error.into())
            }
            other => Err(other.into()),
        }
    }
}

struct ExchangeBits {
    data: Vec<u8>,
    valid_bits: u8,
}

fn presence(answer: Result<[u8; 2]>) -> Result<bool> {
    match answer {
        Ok(_) => Ok(true),
        Err(Error::Status(StatusCode::Collision)) => Ok(true),
        Err(Error::Status(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
