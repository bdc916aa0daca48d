// libmfrc522/src/card/operations/auth.rs

use log::{debug, warn};

use crate::constants::{IRQ_IDLE, STATUS2_CRYPTO1_ON};
use crate::device::{Device, Framing, Initialized, PcdCommand, Register};
use crate::protocol::{encode_authenticate, PiccCommand};
use crate::status::StatusCode;
use crate::types::{MifareKey, Uid};
use crate::Result;

impl Device<Initialized> {
    /// MFAuthent against the sector holding `block_addr`.
    ///
    /// `command` is `MfAuthKeyA` or `MfAuthKeyB`. A wrong key usually shows
    /// up as `Timeout`. On success Crypto1 stays on until
    /// [`Self::stop_crypto1`]; no other card can be reached until then.
    pub fn authenticate(&mut self, command: PiccCommand, block_addr: u8, key: &MifareKey, uid: &Uid) -> Result<()> {
        if !matches!(command, PiccCommand::MfAuthKeyA | PiccCommand::MfAuthKeyB) {
            warn!("authenticate called with {}", command);
            return Err(StatusCode::Invalid.into());
        }
        debug!("authenticate {} block {}", command, block_addr);
        let frame = encode_authenticate(command, block_addr, key, uid);
        let ex = self.communicate(PcdCommand::MfAuthent, IRQ_IDLE, &frame, false, Framing::default())?;
        if !ex.is_ok() {
            warn!("authentication of block {} failed: {}", block_addr, ex.status);
        }
        ex.status.into_result()
    }

    /// Leave the authenticated state (clear MFCrypto1On).
    pub fn stop_crypto1(&mut self) -> Result<()> {
        self.clear_bits(Register::Status2, STATUS2_CRYPTO1_ON)
    }

    pub fn is_crypto1_on(&mut self) -> Result<bool> {
        Ok(self.read_register(Register::Status2)? & STATUS2_CRYPTO1_ON != 0)
    }
}
