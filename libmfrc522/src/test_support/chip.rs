// libmfrc522/src/test_support/chip.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::constants::{
    AUTO_TEST_ENABLE, BIT_FRAMING_START_SEND, COLL_POS_NOT_VALID, COLL_VALUES_AFTER_COLL,
    DIV_IRQ_CRC, ERR_COLL, FIFO_FLUSH, FIFO_SIZE, IRQ_IDLE, IRQ_RX, IRQ_TIMER,
    STATUS2_CRYPTO1_ON,
};
use crate::device::control::FirmwareVersion;
use crate::device::selftest::reference_for;
use crate::device::{Device, Initialized, PcdCommand, Register};
use crate::protocol::{bcc, check_crc_a, crc_a, PiccCommand};
use crate::test_support::card::{CardState, Reply, SimCard};
use crate::test_support::irq::{IrqSlot, SimInterruptLine};
use crate::transport::Transport;
use crate::Result;

/// ErrIRq, set alongside RxIRq when a collision was received.
const IRQ_ERR: u8 = 0x02;

/// RxIEn in ComIEnReg.
const IEN_RX: u8 = 0x20;

pub(crate) struct ChipState {
    regs: [u8; 64],
    version: u8,
    fifo: VecDeque<u8>,
    cards: Vec<SimCard>,
    corrupt_self_test: bool,
    exchanges: usize,
    irq_pending: bool,
    /// Delay before a REQA/WUPA answer shows up as RxIRq in ComIrq.
    answer_latency: Duration,
    answer_at: Option<Instant>,
    /// Raw CollReg value reported for every collision instead of the real one.
    forced_coll: Option<u8>,
    frames: Vec<Vec<u8>>,
    pub(crate) irq: IrqSlot,
}

/// What the receiver saw after one transmission.
enum Air {
    Silent,
    Frame { data: Vec<u8>, last_bits: u8 },
    Collision { data: Vec<u8>, position: usize },
}

/// Register-level MFRC522 model with a field of [`SimCard`]s.
///
/// Implements [`Transport`], so it can stand in for the SPI bus. Clones
/// share state; keep one to inspect the chip after handing another to a
/// `Device`. Commands complete instantly.
#[derive(Clone)]
pub struct SimChip {
    state: Arc<Mutex<ChipState>>,
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

impl SimChip {
    /// A v2.0 chip with an empty field.
    pub fn new() -> Self {
        Self::with_version(0x92)
    }

    pub fn with_version(version: u8) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChipState {
                regs: [0u8; 64],
                version,
                fifo: VecDeque::new(),
                cards: Vec::new(),
                corrupt_self_test: false,
                exchanges: 0,
                irq_pending: false,
                answer_latency: Duration::ZERO,
                answer_at: None,
                forced_coll: None,
                frames: Vec::new(),
                irq: IrqSlot::default(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChipState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flip one byte of the self-test output.
    pub fn corrupt_self_test(&self, corrupt: bool) {
        self.lock().corrupt_self_test = corrupt;
    }

    pub fn add_card(&self, card: SimCard) {
        self.lock().cards.push(card);
    }

    pub fn remove_cards(&self) {
        self.lock().cards.clear();
    }

    /// Take every card out of the field and put it back: all end up IDLE.
    pub fn cycle_field(&self) {
        for card in self.lock().cards.iter_mut() {
            card.leave_field();
        }
    }

    pub fn card(&self, index: usize) -> Option<SimCard> {
        self.lock().cards.get(index).cloned()
    }

    pub fn card_page(&self, index: usize, page: u8) -> Option<[u8; 4]> {
        self.lock().cards.get(index)?.page(page)
    }

    pub fn card_block(&self, index: usize, block: u8) -> Option<[u8; 16]> {
        self.lock().cards.get(index)?.block(block)
    }

    pub fn card_state(&self, index: usize) -> Option<CardState> {
        self.lock().cards.get(index).map(SimCard::state)
    }

    /// Let REQA/WUPA answers reach ComIrq only `latency` after StartSend,
    /// the way a real field takes a while to respond. The IRQ pin still
    /// fires at once.
    pub fn set_answer_latency(&self, latency: Duration) {
        self.lock().answer_latency = latency;
    }

    /// Report `coll` in CollReg for every collision, whatever bit collided.
    pub fn force_collision_register(&self, coll: Option<u8>) {
        self.lock().forced_coll = coll;
    }

    /// Every frame transmitted to the field, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().frames.clone()
    }

    /// Number of SPI transactions so far.
    pub fn exchange_count(&self) -> usize {
        self.lock().exchanges
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.lock().read(reg.address())
    }

    /// IRQ pin wired to this chip.
    pub fn interrupt_line(&self) -> SimInterruptLine {
        SimInterruptLine::new(self.state.clone())
    }

    /// `Device` on this chip, already initialized.
    pub fn initialized_device(&self) -> Result<Device<Initialized>> {
        Device::new_with_transport(Box::new(self.clone())).initialize()
    }
}

impl Transport for SimChip {
    fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>> {
        let (resp, irq) = {
            let mut st = self.lock();
            st.exchanges += 1;
            let resp = st.spi(out);
            let fire = std::mem::take(&mut st.irq_pending);
            (resp, if fire { st.irq.callback() } else { None })
        };
        // the callback runs without the chip lock, like a GPIO thread would
        if let Some(irq) = irq {
            let mut f = irq.lock().unwrap_or_else(|e| e.into_inner());
            (*f)();
        }
        Ok(resp)
    }
}

impl ChipState {
    fn spi(&mut self, out: &[u8]) -> Vec<u8> {
        let mut resp = vec![0u8; out.len()];
        let Some(&first) = out.first() else {
            return resp;
        };
        if first & 0x80 != 0 {
            // reads: byte i + 1 carries the register addressed by byte i
            for i in 0..out.len().saturating_sub(1) {
                if out[i] & 0x80 != 0 {
                    resp[i + 1] = self.read((out[i] >> 1) & 0x3F);
                }
            }
        } else {
            let addr = (first >> 1) & 0x3F;
            for &value in &out[1..] {
                self.write(addr, value);
            }
        }
        resp
    }

    fn read(&mut self, addr: u8) -> u8 {
        match Register::from_address(addr) {
            Some(Register::FifoData) => self.fifo.pop_front().unwrap_or(0),
            Some(Register::FifoLevel) => self.fifo.len() as u8,
            // power-down ends immediately
            Some(Register::Command) => self.regs[addr as usize] & 0x0F,
            Some(Register::Version) => self.version,
            Some(Register::ComIrq) => {
                let value = self.regs[addr as usize];
                match self.answer_at {
                    Some(at) if Instant::now() < at => value & !IRQ_RX,
                    _ => value,
                }
            }
            _ => self.regs[addr as usize & 0x3F],
        }
    }

    fn write(&mut self, addr: u8, value: u8) {
        let idx = addr as usize & 0x3F;
        match Register::from_address(addr) {
            Some(Register::Command) => {
                self.regs[idx] = value;
                self.execute(value);
            }
            Some(Register::ComIrq | Register::DivIrq) => {
                let bits = value & 0x7F;
                if value & 0x80 != 0 {
                    self.regs[idx] |= bits;
                } else {
                    self.regs[idx] &= !bits;
                }
            }
            Some(Register::FifoData) => {
                if self.fifo.len() < FIFO_SIZE {
                    self.fifo.push_back(value);
                }
            }
            Some(Register::FifoLevel) => {
                if value & FIFO_FLUSH != 0 {
                    self.fifo.clear();
                }
            }
            Some(Register::BitFraming) => {
                self.regs[idx] = value & !BIT_FRAMING_START_SEND;
                let transceive = PcdCommand::from_code(self.regs[Register::Command.address() as usize])
                    == Some(PcdCommand::Transceive);
                if value & BIT_FRAMING_START_SEND != 0 && transceive {
                    self.transceive(value & 0x07);
                }
            }
            Some(Register::Status2) => {
                self.regs[idx] = value;
                if value & STATUS2_CRYPTO1_ON == 0 {
                    for card in self.cards.iter_mut() {
                        card.drop_crypto();
                    }
                }
            }
            Some(Register::Version) => {}
            _ => self.regs[idx] = value,
        }
    }

    fn execute(&mut self, value: u8) {
        let command = PcdCommand::from_code(value);
        let done = match command {
            Some(PcdCommand::Mem) => {
                for _ in 0..25 {
                    self.fifo.pop_front();
                }
                true
            }
            Some(PcdCommand::CalcCrc) => {
                self.calc_crc();
                true
            }
            Some(PcdCommand::MfAuthent) => {
                self.authenticate();
                true
            }
            Some(PcdCommand::SoftReset) => {
                self.regs = [0u8; 64];
                self.fifo.clear();
                true
            }
            _ => false,
        };
        if done {
            self.regs[Register::Command.address() as usize] = PcdCommand::Idle.code();
        }
    }

    fn calc_crc(&mut self) {
        if self.regs[Register::AutoTest.address() as usize] & 0x0F == AUTO_TEST_ENABLE {
            let mut output = reference_for(FirmwareVersion::from_register(self.version))
                .copied()
                .unwrap_or([0u8; 64]);
            if self.corrupt_self_test {
                output[5] ^= 0xFF;
            }
            self.fifo = output.iter().copied().collect();
            return;
        }
        let data: Vec<u8> = self.fifo.drain(..).collect();
        let crc = crc_a(&data);
        self.regs[Register::CrcResultL.address() as usize] = crc[0];
        self.regs[Register::CrcResultH.address() as usize] = crc[1];
        self.regs[Register::DivIrq.address() as usize] |= DIV_IRQ_CRC;
    }

    fn authenticate(&mut self) {
        let payload: Vec<u8> = self.fifo.drain(..).collect();
        let ok = self
            .cards
            .iter_mut()
            .find(|c| c.state() == CardState::Active)
            .is_some_and(|card| card.authenticate(&payload));
        let irq = Register::ComIrq.address() as usize;
        if ok {
            self.regs[Register::Status2.address() as usize] |= STATUS2_CRYPTO1_ON;
            self.regs[irq] |= IRQ_IDLE;
        } else {
            self.regs[irq] |= IRQ_TIMER;
        }
    }

    fn transceive(&mut self, tx_last_bits: u8) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.frames.push(frame.clone());
        self.answer_at = None;
        self.regs[Register::Error.address() as usize] = 0;
        self.regs[Register::Control.address() as usize] &= !0x07;

        let antenna = self.regs[Register::TxControl.address() as usize] & 0x03 == 0x03;
        let air = if antenna {
            self.on_air(&frame, tx_last_bits)
        } else {
            Air::Silent
        };

        let irq = Register::ComIrq.address() as usize;
        match air {
            Air::Silent => self.regs[irq] |= IRQ_TIMER,
            Air::Frame { data, last_bits } => {
                if tx_last_bits == 7 && !self.answer_latency.is_zero() {
                    self.answer_at = Some(Instant::now() + self.answer_latency);
                }
                self.fifo = data.into_iter().collect();
                self.regs[Register::Control.address() as usize] |= last_bits & 0x07;
                self.regs[irq] |= IRQ_RX | IRQ_IDLE;
                self.raise_rx_irq();
            }
            Air::Collision { data, position } => {
                self.fifo = data.into_iter().collect();
                self.regs[Register::Error.address() as usize] = ERR_COLL;
                let coll = Register::Coll.address() as usize;
                let pos = if let Some(forced) = self.forced_coll {
                    forced & !COLL_VALUES_AFTER_COLL
                } else if position > 32 {
                    COLL_POS_NOT_VALID
                } else {
                    (position % 32) as u8
                };
                self.regs[coll] = (self.regs[coll] & COLL_VALUES_AFTER_COLL) | pos;
                self.regs[irq] |= IRQ_RX | IRQ_IDLE | IRQ_ERR;
                self.raise_rx_irq();
            }
        }
    }

    fn raise_rx_irq(&mut self) {
        if self.regs[Register::ComIEn.address() as usize] & IEN_RX != 0 {
            self.irq_pending = true;
        }
    }

    fn on_air(&mut self, frame: &[u8], tx_last_bits: u8) -> Air {
        let Some(&cmd) = frame.first() else {
            return Air::Silent;
        };

        if frame.len() == 1 && tx_last_bits == 7 {
            let wupa = match PiccCommand::from_code(cmd & 0x7F) {
                Some(PiccCommand::Reqa) => false,
                Some(PiccCommand::Wupa) => true,
                _ => return Air::Silent,
            };
            let answers: Vec<[u8; 2]> = self.cards.iter_mut().filter_map(|c| c.wake(wupa)).collect();
            return match answers.as_slice() {
                [] => Air::Silent,
                [first, rest @ ..] if rest.iter().all(|a| a == first) => Air::Frame {
                    data: first.to_vec(),
                    last_bits: 0,
                },
                [first, ..] => Air::Collision {
                    data: first.to_vec(),
                    position: 1,
                },
            };
        }

        let level = match PiccCommand::from_code(cmd) {
            Some(PiccCommand::SelCl1) => Some(1),
            Some(PiccCommand::SelCl2) => Some(2),
            Some(PiccCommand::SelCl3) => Some(3),
            _ => None,
        };
        if let (Some(level), Some(&nvb)) = (level, frame.get(1)) {
            return if nvb == 0x70 {
                self.select(level, frame)
            } else {
                self.anticollision(level, nvb, frame)
            };
        }

        match self.cards.iter_mut().find(|c| c.state() == CardState::Active) {
            Some(card) => match card.handle(frame) {
                Reply::Silent => Air::Silent,
                Reply::Bytes(data) => Air::Frame { data, last_bits: 0 },
                Reply::Nibble(n) => Air::Frame {
                    data: vec![n & 0x0F],
                    last_bits: 4,
                },
            },
            None => Air::Silent,
        }
    }

    fn anticollision(&mut self, level: u8, nvb: u8, frame: &[u8]) -> Air {
        let whole = (nvb >> 4) as usize;
        if whole < 2 {
            return Air::Silent;
        }
        let known = (whole - 2) * 8 + (nvb & 0x0F) as usize;
        if known >= 40 {
            return Air::Silent;
        }

        let streams: Vec<[u8; 5]> = self
            .cards
            .iter()
            .filter(|c| c.state() == CardState::Ready(level))
            .map(|c| c.cascade_stream(level))
            .filter(|s| (0..known).all(|i| bit(s, i) == bit(&frame[2..], i)))
            .collect();
        let Some(first) = streams.first() else {
            return Air::Silent;
        };

        let start = known / 8;
        let collision = (known..40).find(|&i| streams.iter().any(|s| bit(s, i) != bit(first, i)));
        match collision {
            None => Air::Frame {
                data: first[start..].to_vec(),
                last_bits: 0,
            },
            Some(i) => {
                let mut data = first[start..=i / 8].to_vec();
                // ValuesAfterColl cleared: nothing from the collision on
                if let Some(last) = data.last_mut() {
                    *last &= (1u8 << (i % 8)).wrapping_sub(1);
                }
                Air::Collision {
                    data,
                    position: i + 1,
                }
            }
        }
    }

    fn select(&mut self, level: u8, frame: &[u8]) -> Air {
        if frame.len() != 9 || !check_crc_a(frame) || bcc(&frame[2..6]) != frame[6] {
            return Air::Silent;
        }
        let mut sak = None;
        for card in self.cards.iter_mut() {
            if card.state() != CardState::Ready(level) {
                continue;
            }
            if sak.is_none() && card.cascade_stream(level)[..4] == frame[2..6] {
                sak = Some(card.select(level));
            } else {
                card.leave_field();
            }
        }
        match sak {
            Some(sak) => {
                let crc = crc_a(&[sak]);
                Air::Frame {
                    data: vec![sak, crc[0], crc[1]],
                    last_bits: 0,
                }
            }
            None => Air::Silent,
        }
    }
}

/// Bit `i` of a little-endian bit stream (bit 0 = LSB of byte 0).
fn bit(bytes: &[u8], i: usize) -> u8 {
    bytes.get(i / 8).map_or(0, |b| (b >> (i % 8)) & 1)
}
