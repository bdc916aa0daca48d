// libmfrc522/src/session/mod.rs

//! Blocking card workflows: wait for a card on the IRQ line, read or write
//! the data area of a MIFARE Classic card, wait until the card is gone.
//!
//! A session owns the reader. Only [`WaitHandle`] is meant to be shared
//! with other threads.

pub mod text;
pub mod wait;

use derive_more::Display;
use log::{debug, error, info, trace, warn};

use crate::config::SessionConfig;
use crate::constants::{
    BIT_FRAMING_SHORT_FRAME_START, COM_IEN_RX_INVERTED, IRQ_ALL, IRQ_RX, MF_BLOCK_SIZE,
    UL_PAGE_COUNT, UL_PAGE_SIZE,
};
use crate::device::{Device, Initialized, PcdCommand, Register};
use crate::protocol::PiccCommand;
use crate::status::StatusCode;
use crate::transport::InterruptLine;
use crate::types::Uid;
use crate::{Error, Result};

pub use text::{DecodeErrors, TextEncoding};
pub use wait::{WaitHandle, WaitOutcome};

/// Where the session is in its card workflow.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    WaitingForCard,
    CardPresent,
    Authenticating,
    Transferring,
    Halted,
}

pub struct CardSession {
    device: Device<Initialized>,
    irq: Option<Box<dyn InterruptLine>>,
    config: SessionConfig,
    wait: WaitHandle,
    state: SessionState,
}

impl CardSession {
    /// Take over `device` and hook the falling edge of `irq` to the wait
    /// flag. Without an IRQ line, waits poll ComIrqReg instead.
    pub fn new(
        device: Device<Initialized>,
        mut irq: Option<Box<dyn InterruptLine>>,
        config: SessionConfig,
    ) -> Result<Self> {
        let wait = WaitHandle::new();
        if let Some(line) = irq.as_mut() {
            let handle = wait.clone();
            line.on_falling_edge(Box::new(move || handle.signal_interrupt()))?;
        }
        Ok(Self {
            device,
            irq,
            config,
            wait,
            state: SessionState::Idle,
        })
    }

    pub fn device(&self) -> &Device<Initialized> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device<Initialized> {
        &mut self.device
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle for [`WaitHandle::cancel`] from another thread.
    pub fn wait_handle(&self) -> WaitHandle {
        self.wait.clone()
    }

    pub fn cancel_wait(&self) {
        self.wait.cancel();
    }

    pub fn is_new_card_present(&mut self) -> Result<bool> {
        self.device.is_new_card_present()
    }

    pub fn is_card_present(&mut self) -> Result<bool> {
        self.device.is_card_present()
    }

    pub fn read_card_serial(&mut self) -> Result<Uid> {
        self.device.read_card_serial()
    }

    /// Block until a card answers the periodic REQA. Returns `false` when
    /// the wait was canceled.
    pub fn wait_for_interrupt(&mut self) -> Result<bool> {
        self.wait.reset();
        self.state = SessionState::WaitingForCard;
        debug!("waiting for interrupt from MFRC522");

        let outcome = self.wait_loop();
        let cleared = self.device.write_register(Register::ComIrq, IRQ_ALL);
        self.wait.reset();

        let fired = outcome?;
        cleared?;
        self.state = if fired {
            SessionState::CardPresent
        } else {
            SessionState::Idle
        };
        Ok(fired)
    }

    fn wait_loop(&mut self) -> Result<bool> {
        loop {
            // the receiver does not stay armed across a timeout
            self.activate_reception()?;
            match self.wait.wait_timeout(self.config.poll_interval) {
                WaitOutcome::Interrupt => {
                    debug!("interrupt from MFRC522");
                    return Ok(true);
                }
                WaitOutcome::Canceled => {
                    debug!("wait for card canceled");
                    return Ok(false);
                }
                WaitOutcome::TimedOut => {}
            }
            // without an IRQ pin the answer is only visible in ComIrq, so
            // look before the next re-arm clears it
            if self.irq.is_none() && self.device.read_register(Register::ComIrq)? & IRQ_RX != 0 {
                debug!("RxIRq set while polling");
                return Ok(true);
            }
            trace!("no card yet, re-arming receiver");
        }
    }

    fn activate_reception(&mut self) -> Result<()> {
        self.device.write_register(Register::ComIrq, IRQ_ALL)?;
        self.device.write_register(Register::ComIEn, COM_IEN_RX_INVERTED)?;
        self.device.write_register(Register::FifoData, PiccCommand::Reqa.code())?;
        self.device.write_register(Register::Command, PcdCommand::Transceive.code())?;
        self.device.write_register(Register::BitFraming, BIT_FRAMING_SHORT_FRAME_START)
    }

    /// Block until `retries` WUPAs in a row go unanswered. Returns `false`
    /// when canceled during a back-off.
    pub fn wait_for_card_removed(&mut self, retries: usize) -> Result<bool> {
        self.wait.reset();
        let outcome = self.removal_loop(retries);
        self.wait.reset();
        outcome
    }

    fn removal_loop(&mut self, retries: usize) -> Result<bool> {
        loop {
            let mut present = false;
            for _ in 0..retries {
                if self.device.is_card_present()? {
                    present = true;
                }
            }
            if !present {
                debug!("card removed");
                self.state = SessionState::Idle;
                return Ok(true);
            }
            if self.wait.sleep_unless_canceled(self.config.removal_backoff) {
                debug!("wait for card removal canceled");
                return Ok(false);
            }
        }
    }

    /// Wait for a card and read its data blocks up to the first `terminal`
    /// byte, or all of them with `None`.
    ///
    /// MIFARE Classic sectors are read with key A. Ultralight pages 0..15
    /// are read as they are. The card is halted and Crypto1 stopped before
    /// returning, also on failure.
    pub fn read_bytes(&mut self, terminal: Option<u8>) -> Result<(Uid, Vec<u8>)> {
        let uid = self.wait_for_card(true)?;
        let result = if uid.picc_type().is_mifare_ultralight() {
            self.read_ultralight(terminal)
        } else {
            self.read_classic(&uid, terminal)
        };
        let released = self.release_card();
        let data = result?;
        released?;
        Ok((uid, data))
    }

    /// Wait for a MIFARE Classic card, read its current content, then write
    /// `data` followed by `terminal` from the first data block on.
    ///
    /// Sectors are written with key B. Data beyond the card capacity is
    /// dropped with an error log. Returns the previous content.
    pub fn write_bytes(&mut self, data: &[u8], terminal: Option<u8>) -> Result<(Uid, Vec<u8>)> {
        let uid = self.wait_for_card(false)?;
        let result = match self.read_classic(&uid, terminal) {
            Ok(old) => self.write_classic(&uid, data, terminal).map(|()| old),
            Err(e) => Err(e),
        };
        let released = self.release_card();
        let old = result?;
        released?;
        Ok((uid, old))
    }

    /// `read_bytes` decoded with the configured text encoding.
    pub fn read_text(&mut self, terminal: Option<u8>) -> Result<(Uid, String)> {
        let (uid, bytes) = self.read_bytes(terminal)?;
        let text = self.config.encoding.decode(&bytes, self.config.errors)?;
        Ok((uid, text))
    }

    /// Encode `text`, write it and return the previous text.
    pub fn write_text(&mut self, text: &str, terminal: Option<u8>) -> Result<(Uid, String)> {
        let bytes = self.config.encoding.encode(text, self.config.errors)?;
        let (uid, old) = self.write_bytes(&bytes, terminal)?;
        let old = self.config.encoding.decode(&old, self.config.errors)?;
        Ok((uid, old))
    }

    /// Release the IRQ line, the reset pin and the bus.
    pub fn cleanup(&mut self) -> Result<()> {
        let irq = match self.irq.take() {
            Some(mut line) => line.release(),
            None => Ok(()),
        };
        let device = self.device.cleanup();
        self.state = SessionState::Idle;
        irq.and(device)
    }

    pub fn into_device(self) -> Device<Initialized> {
        self.device
    }

    fn wait_for_card(&mut self, allow_ultralight: bool) -> Result<Uid> {
        loop {
            if !self.wait_for_interrupt()? {
                return Err(StatusCode::Canceled.into());
            }
            let uid = match self.device.read_card_serial() {
                Ok(uid) => uid,
                Err(Error::Status(status)) => {
                    warn!("failed to read UID: {}", status);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let picc_type = uid.picc_type();
            if picc_type.is_mifare_classic() || (allow_ultralight && picc_type.is_mifare_ultralight()) {
                info!("card found: {} (uid: {})", picc_type, uid.to_hex());
                return Ok(uid);
            }
            warn!("unsupported PICC type {} (uid: {})", picc_type, uid.to_hex());
            self.halt_quietly();
        }
    }

    fn read_classic(&mut self, uid: &Uid, terminal: Option<u8>) -> Result<Vec<u8>> {
        let key = self.config.key;
        let mut data = Vec::new();
        for sector in uid.picc_type().sectors() {
            self.state = SessionState::Authenticating;
            if let Err(e) = self.device.authenticate(PiccCommand::MfAuthKeyA, sector.trailer_block, &key, uid) {
                error!(
                    "authentication failed (block_addr: {:#04x}, uid: {})",
                    sector.trailer_block,
                    uid.to_hex()
                );
                return Err(e);
            }

            self.state = SessionState::Transferring;
            for block_addr in sector.data_blocks() {
                let block = match self.device.mifare_read(block_addr) {
                    Ok(block) => block,
                    Err(e) => {
                        error!("read of block {:#04x} failed: {}", block_addr, e);
                        return Err(e);
                    }
                };
                if append_until(&mut data, &block, terminal) {
                    return Ok(data);
                }
            }
        }
        Ok(data)
    }

    fn read_ultralight(&mut self, terminal: Option<u8>) -> Result<Vec<u8>> {
        self.state = SessionState::Transferring;
        let mut data = Vec::with_capacity(UL_PAGE_COUNT as usize * UL_PAGE_SIZE);
        // one READ returns four pages
        for page in (0..UL_PAGE_COUNT).step_by(4) {
            let chunk = self.device.mifare_read(page)?;
            if append_until(&mut data, &chunk, terminal) {
                break;
            }
        }
        Ok(data)
    }

    fn write_classic(&mut self, uid: &Uid, data: &[u8], terminal: Option<u8>) -> Result<()> {
        let mut payload = data.to_vec();
        payload.extend(terminal);
        let mut chunks = payload.chunks(MF_BLOCK_SIZE).peekable();
        if chunks.peek().is_none() {
            return Ok(());
        }

        let key = self.config.key;
        for sector in uid.picc_type().sectors() {
            self.state = SessionState::Authenticating;
            if let Err(e) = self.device.authenticate(PiccCommand::MfAuthKeyB, sector.trailer_block, &key, uid) {
                error!(
                    "authentication failed (block_addr: {:#04x}, uid: {})",
                    sector.trailer_block,
                    uid.to_hex()
                );
                return Err(e);
            }

            self.state = SessionState::Transferring;
            for block_addr in sector.data_blocks() {
                let Some(chunk) = chunks.next() else {
                    return Ok(());
                };
                let mut block = [0u8; MF_BLOCK_SIZE];
                block[..chunk.len()].copy_from_slice(chunk);
                if let Err(e) = self.device.mifare_write(block_addr, &block) {
                    error!("write of block {:#04x} failed: {}", block_addr, e);
                    return Err(e);
                }
                if chunks.peek().is_none() {
                    return Ok(());
                }
            }
        }

        let dropped: usize = chunks.map(<[u8]>::len).sum();
        error!(
            "too much data, {} bytes did not fit on the card (uid: {})",
            dropped,
            uid.to_hex()
        );
        Ok(())
    }

    /// Halt the card and stop Crypto1. Only bus faults are reported.
    fn release_card(&mut self) -> Result<()> {
        self.halt_quietly();
        self.device.stop_crypto1()?;
        self.state = SessionState::Halted;
        Ok(())
    }

    fn halt_quietly(&mut self) {
        if let Err(e) = self.device.halt_a() {
            debug!("halt failed: {}", e);
        }
    }
}

/// Append `chunk` to `data`, stopping before `terminal`. Returns `true`
/// when the terminal byte was found.
fn append_until(data: &mut Vec<u8>, chunk: &[u8], terminal: Option<u8>) -> bool {
    match terminal.and_then(|t| chunk.iter().position(|&b| b == t)) {
        Some(end) => {
            data.extend_from_slice(&chunk[..end]);
            true
        }
        None => {
            data.extend_from_slice(chunk);
            false
        }
    }
}
