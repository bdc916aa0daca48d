// libmfrc522/src/test_support/card.rs

use crate::constants::{MF_ACK, MF_BLOCK_SIZE, UL_PAGE_COUNT, UL_PAGE_SIZE};
use crate::protocol::{bcc, check_crc_a, crc_a, PiccCommand};
use crate::types::{MifareKey, ValueBlock};

/// NAK sent for commands the card refuses (not authenticated, bad address).
const NAK_INVALID: u8 = 0x04;

const DEFAULT_TRAILER: [u8; MF_BLOCK_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x80, 0x69, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// ISO/IEC 14443-3 PICC states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Idle,
    /// Taking part in anti-collision at the given cascade level.
    Ready(u8),
    Active,
    Halt,
}

/// What the card puts on the air in reply to a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reply {
    Silent,
    Bytes(Vec<u8>),
    /// 4-bit ACK/NAK.
    Nibble(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Classic,
    Ultralight,
}

/// Second phase a card is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Write(u8),
    Value(PiccCommand, u8),
}

/// A simulated MIFARE Classic or Ultralight card.
#[derive(Debug, Clone)]
pub struct SimCard {
    uid: Vec<u8>,
    atqa: [u8; 2],
    sak: u8,
    family: Family,
    memory: Vec<u8>,
    state: CardState,
    auth_sector: Option<u8>,
    pending: Option<Pending>,
    transfer_buffer: Option<i32>,
    unreadable: Vec<u8>,
}

impl SimCard {
    fn classic(uid: &[u8], blocks: usize, sak: u8, atqa_base: u8) -> Self {
        let mut card = Self {
            uid: uid.to_vec(),
            atqa: [atqa_base | size_bits(uid.len()), 0x00],
            sak,
            family: Family::Classic,
            memory: vec![0u8; blocks * MF_BLOCK_SIZE],
            state: CardState::Idle,
            auth_sector: None,
            pending: None,
            transfer_buffer: None,
            unreadable: Vec::new(),
        };

        let mut block0 = [0u8; MF_BLOCK_SIZE];
        block0[..uid.len()].copy_from_slice(uid);
        let mut at = uid.len();
        if uid.len() == 4 {
            block0[4] = bcc(uid);
            at = 5;
        }
        block0[at] = sak;
        block0[at + 1] = card.atqa[0];
        block0[at + 2] = card.atqa[1];
        card.set_block(0, block0);

        for block in card.blocks() {
            if card.trailer_of(block) == Some(block) {
                card.set_block(block, DEFAULT_TRAILER);
            }
        }
        card
    }

    /// MIFARE Mini: 5 sectors of 4 blocks.
    pub fn mifare_mini(uid: &[u8]) -> Self {
        Self::classic(uid, 20, 0x09, 0x04)
    }

    /// MIFARE Classic 1K. Accepts 4, 7 or 10 byte UIDs.
    pub fn mifare_1k(uid: &[u8]) -> Self {
        Self::classic(uid, 64, 0x08, 0x04)
    }

    /// MIFARE Classic 4K: 32 sectors of 4 blocks, 8 of 16.
    pub fn mifare_4k(uid: &[u8]) -> Self {
        Self::classic(uid, 256, 0x18, 0x02)
    }

    /// Original MIFARE Ultralight, 16 pages.
    pub fn ultralight(uid: &[u8; 7]) -> Self {
        let mut memory = vec![0u8; UL_PAGE_COUNT as usize * UL_PAGE_SIZE];
        memory[..3].copy_from_slice(&uid[..3]);
        memory[3] = PiccCommand::CascadeTag.code() ^ bcc(&uid[..3]);
        memory[4..8].copy_from_slice(&uid[3..]);
        memory[8] = bcc(&uid[3..]);
        memory[9] = 0x48;
        Self {
            uid: uid.to_vec(),
            atqa: [0x44, 0x00],
            sak: 0x00,
            family: Family::Ultralight,
            memory,
            state: CardState::Idle,
            auth_sector: None,
            pending: None,
            transfer_buffer: None,
            unreadable: Vec::new(),
        }
    }

    /// Replace key A and key B in every sector trailer.
    pub fn with_keys(mut self, key_a: MifareKey, key_b: MifareKey) -> Self {
        if self.family == Family::Classic {
            for block in self.blocks() {
                if self.trailer_of(block) == Some(block) {
                    let at = block as usize * MF_BLOCK_SIZE;
                    self.memory[at..at + 6].copy_from_slice(key_a.as_bytes());
                    self.memory[at + 10..at + 16].copy_from_slice(key_b.as_bytes());
                }
            }
        }
        self
    }

    /// NAK every READ of `block`, as a card with a damaged block would.
    pub fn with_unreadable_block(mut self, block: u8) -> Self {
        self.unreadable.push(block);
        self
    }

    pub fn set_block(&mut self, block: u8, data: [u8; MF_BLOCK_SIZE]) {
        let at = block as usize * MF_BLOCK_SIZE;
        if let Some(dst) = self.memory.get_mut(at..at + MF_BLOCK_SIZE) {
            dst.copy_from_slice(&data);
        }
    }

    pub fn set_page(&mut self, page: u8, data: [u8; UL_PAGE_SIZE]) {
        let at = page as usize * UL_PAGE_SIZE;
        if let Some(dst) = self.memory.get_mut(at..at + UL_PAGE_SIZE) {
            dst.copy_from_slice(&data);
        }
    }

    pub fn block(&self, block: u8) -> Option<[u8; MF_BLOCK_SIZE]> {
        let at = block as usize * MF_BLOCK_SIZE;
        let src = self.memory.get(at..at + MF_BLOCK_SIZE)?;
        let mut out = [0u8; MF_BLOCK_SIZE];
        out.copy_from_slice(src);
        Some(out)
    }

    pub fn page(&self, page: u8) -> Option<[u8; UL_PAGE_SIZE]> {
        let at = page as usize * UL_PAGE_SIZE;
        let src = self.memory.get(at..at + UL_PAGE_SIZE)?;
        let mut out = [0u8; UL_PAGE_SIZE];
        out.copy_from_slice(src);
        Some(out)
    }

    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub(crate) fn leave_field(&mut self) {
        self.state = CardState::Idle;
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.auth_sector = None;
        self.pending = None;
        self.transfer_buffer = None;
    }

    fn blocks(&self) -> impl Iterator<Item = u8> + use<> {
        (0..self.memory.len() / MF_BLOCK_SIZE).map(|b| b as u8)
    }

    fn sector_of(&self, block: u8) -> Option<u8> {
        if self.family != Family::Classic || block as usize * MF_BLOCK_SIZE >= self.memory.len() {
            return None;
        }
        Some(if block < 128 {
            block / 4
        } else {
            32 + (block - 128) / 16
        })
    }

    fn trailer_of(&self, block: u8) -> Option<u8> {
        self.sector_of(block)
            .map(|_| if block < 128 { block | 0x03 } else { block | 0x0F })
    }

    /// Cascade levels needed for this UID.
    pub(crate) fn levels(&self) -> u8 {
        match self.uid.len() {
            0..=4 => 1,
            5..=7 => 2,
            _ => 3,
        }
    }

    /// CLn bytes plus BCC as sent during anti-collision at `level`.
    pub(crate) fn cascade_stream(&self, level: u8) -> [u8; 5] {
        let mut cl = [0u8; 4];
        let last = level >= self.levels();
        let start = 3 * (level.max(1) as usize - 1);
        if last {
            for (i, b) in cl.iter_mut().enumerate() {
                *b = self.uid.get(start + i).copied().unwrap_or(0);
            }
        } else {
            cl[0] = PiccCommand::CascadeTag.code();
            for i in 0..3 {
                cl[i + 1] = self.uid.get(start + i).copied().unwrap_or(0);
            }
        }
        [cl[0], cl[1], cl[2], cl[3], bcc(&cl)]
    }

    /// REQA (`wupa == false`) or WUPA. Returns the ATQA when the card
    /// answers.
    pub(crate) fn wake(&mut self, wupa: bool) -> Option<[u8; 2]> {
        match self.state {
            CardState::Idle => {}
            CardState::Halt if wupa => {}
            CardState::Halt => return None,
            CardState::Ready(_) | CardState::Active => {
                // unexpected command outside IDLE: back to IDLE, no answer
                self.leave_field();
                return None;
            }
        }
        self.state = CardState::Ready(1);
        self.reset_session();
        Some(self.atqa)
    }

    /// SELECT matched this card at `level`. Returns the SAK.
    pub(crate) fn select(&mut self, level: u8) -> u8 {
        if level < self.levels() {
            self.state = CardState::Ready(level + 1);
            0x04
        } else {
            self.state = CardState::Active;
            self.sak
        }
    }

    /// MFAuthent payload `[cmd, block, key(6), uid(4)]`.
    pub(crate) fn authenticate(&mut self, payload: &[u8]) -> bool {
        let ok = self.check_auth(payload);
        if ok {
            self.auth_sector = payload.get(1).and_then(|&b| self.sector_of(b));
        } else {
            // a failed authentication drops the card out of ACTIVE
            self.leave_field();
        }
        ok
    }

    fn check_auth(&self, payload: &[u8]) -> bool {
        if self.state != CardState::Active || payload.len() != 12 {
            return false;
        }
        let Some(trailer) = self.trailer_of(payload[1]).and_then(|t| self.block(t)) else {
            return false;
        };
        let key = match PiccCommand::from_code(payload[0]) {
            Some(PiccCommand::MfAuthKeyA) => &trailer[..6],
            Some(PiccCommand::MfAuthKeyB) => &trailer[10..],
            _ => return false,
        };
        let tail = &self.uid[self.uid.len().saturating_sub(4)..];
        key == &payload[2..8] && tail == &payload[8..12]
    }

    /// The PCD stopped Crypto1.
    pub(crate) fn drop_crypto(&mut self) {
        self.auth_sector = None;
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.auth_sector.is_some()
    }

    /// Handle a standard frame (CRC_A appended) while ACTIVE.
    pub(crate) fn handle(&mut self, frame: &[u8]) -> Reply {
        if self.state != CardState::Active || !check_crc_a(frame) {
            return Reply::Silent;
        }
        let body = &frame[..frame.len() - 2];

        if let Some(pending) = self.pending.take() {
            return self.second_phase(pending, body);
        }

        let Some(&addr) = body.get(1) else {
            return Reply::Silent;
        };
        match PiccCommand::from_code(body[0]) {
            Some(PiccCommand::Hlta) => {
                self.state = CardState::Halt;
                self.reset_session();
                Reply::Silent
            }
            Some(PiccCommand::MfRead) => self.read(addr),
            Some(PiccCommand::MfWrite) => {
                if self.writable(addr) {
                    self.pending = Some(Pending::Write(addr));
                    Reply::Nibble(MF_ACK)
                } else {
                    Reply::Nibble(NAK_INVALID)
                }
            }
            Some(PiccCommand::UlWrite) if self.family == Family::Ultralight => {
                if body.len() == 6 && self.writable(addr) {
                    self.set_page(addr, [body[2], body[3], body[4], body[5]]);
                    Reply::Nibble(MF_ACK)
                } else {
                    Reply::Nibble(NAK_INVALID)
                }
            }
            Some(
                cmd @ (PiccCommand::MfIncrement | PiccCommand::MfDecrement | PiccCommand::MfRestore),
            ) => {
                let valid = self.accessible(addr)
                    && self.block(addr).is_some_and(|b| ValueBlock::is_valid(&b));
                if valid {
                    self.pending = Some(Pending::Value(cmd, addr));
                    Reply::Nibble(MF_ACK)
                } else {
                    Reply::Nibble(NAK_INVALID)
                }
            }
            Some(PiccCommand::MfTransfer) => match self.transfer_buffer {
                Some(value) if self.writable(addr) => {
                    self.set_block(addr, ValueBlock::new(value, addr).encode());
                    Reply::Nibble(MF_ACK)
                }
                _ => Reply::Nibble(NAK_INVALID),
            },
            _ => Reply::Silent,
        }
    }

    fn second_phase(&mut self, pending: Pending, body: &[u8]) -> Reply {
        match pending {
            Pending::Write(addr) => {
                if body.len() != MF_BLOCK_SIZE {
                    return Reply::Nibble(NAK_INVALID);
                }
                match self.family {
                    Family::Classic => {
                        let mut block = [0u8; MF_BLOCK_SIZE];
                        block.copy_from_slice(body);
                        self.set_block(addr, block);
                    }
                    // compatibility write keeps the first page worth
                    Family::Ultralight => self.set_page(addr, [body[0], body[1], body[2], body[3]]),
                }
                Reply::Nibble(MF_ACK)
            }
            Pending::Value(cmd, addr) => {
                let (Some(block), Ok(delta)) = (self.block(addr), <[u8; 4]>::try_from(body)) else {
                    return Reply::Silent;
                };
                let current = ValueBlock::raw_value(&block);
                let delta = i32::from_le_bytes(delta);
                self.transfer_buffer = Some(match cmd {
                    PiccCommand::MfIncrement => current.wrapping_add(delta),
                    PiccCommand::MfDecrement => current.wrapping_sub(delta),
                    _ => current,
                });
                // no answer to the data phase
                Reply::Silent
            }
        }
    }

    fn accessible(&self, addr: u8) -> bool {
        match self.family {
            Family::Classic => self.auth_sector.is_some() && self.sector_of(addr) == self.auth_sector,
            Family::Ultralight => addr < UL_PAGE_COUNT,
        }
    }

    fn writable(&self, addr: u8) -> bool {
        match self.family {
            // block 0 is manufacturer data
            Family::Classic => addr != 0 && self.accessible(addr),
            // pages 0 and 1 hold the UID
            Family::Ultralight => (2..UL_PAGE_COUNT).contains(&addr),
        }
    }

    fn read(&self, addr: u8) -> Reply {
        if !self.accessible(addr) || self.unreadable.contains(&addr) {
            return Reply::Nibble(NAK_INVALID);
        }
        let mut data = Vec::with_capacity(MF_BLOCK_SIZE + 2);
        match self.family {
            Family::Classic => {
                let Some(mut block) = self.block(addr) else {
                    return Reply::Nibble(NAK_INVALID);
                };
                if self.trailer_of(addr) == Some(addr) {
                    // key A is never readable
                    block[..6].fill(0);
                }
                data.extend_from_slice(&block);
            }
            Family::Ultralight => {
                for i in 0..4 {
                    let page = (addr + i) % UL_PAGE_COUNT;
                    data.extend_from_slice(&self.page(page).unwrap_or_default());
                }
            }
        }
        let crc = crc_a(&data);
        data.extend_from_slice(&crc);
        Reply::Bytes(data)
    }
}

fn size_bits(uid_len: usize) -> u8 {
    match uid_len {
        0..=4 => 0x00,
        5..=7 => 0x40,
        _ => 0x80,
    }
}
