// libmfrc522/src/card/operations/value.rs

//! Value block commands. Blocks must be in value mode (access bits 110 or
//! 001) and their sector authenticated.

use log::{trace, warn};

use crate::device::{Device, Initialized};
use crate::protocol::{encode_two_step, PiccCommand};
use crate::types::ValueBlock;
use crate::Result;

impl Device<Initialized> {
    /// Add `delta` to the block value and keep the result in the card's
    /// transfer buffer. Commit with [`Self::mifare_transfer`].
    pub fn mifare_increment(&mut self, block_addr: u8, delta: i32) -> Result<()> {
        self.two_step(PiccCommand::MfIncrement, block_addr, delta.to_le_bytes())
    }

    pub fn mifare_decrement(&mut self, block_addr: u8, delta: i32) -> Result<()> {
        self.two_step(PiccCommand::MfDecrement, block_addr, delta.to_le_bytes())
    }

    /// Copy the block value into the transfer buffer.
    pub fn mifare_restore(&mut self, block_addr: u8) -> Result<()> {
        // the data phase carries no meaning but must be sent
        self.two_step(PiccCommand::MfRestore, block_addr, [0u8; 4])
    }

    /// Write the transfer buffer to `block_addr`.
    pub fn mifare_transfer(&mut self, block_addr: u8) -> Result<()> {
        trace!("mifare_transfer {}", block_addr);
        self.mifare_transceive(&encode_two_step(PiccCommand::MfTransfer, block_addr), false)
    }

    /// Value stored in a value block.
    pub fn mifare_get_value(&mut self, block_addr: u8) -> Result<i32> {
        let block = self.mifare_read(block_addr)?;
        if !ValueBlock::is_valid(&block) {
            warn!("block {} does not hold a consistent value block", block_addr);
        }
        Ok(ValueBlock::raw_value(&block))
    }

    /// Format `block_addr` as a value block holding `value`.
    pub fn mifare_set_value(&mut self, block_addr: u8, value: i32) -> Result<()> {
        let block = ValueBlock::new(value, block_addr).encode();
        self.mifare_write(block_addr, &block)
    }

    fn two_step(&mut self, command: PiccCommand, block_addr: u8, data: [u8; 4]) -> Result<()> {
        trace!("{} block {}", command, block_addr);
        self.mifare_transceive(&encode_two_step(command, block_addr), false)?;
        self.mifare_transceive(&data, true)
    }
}
