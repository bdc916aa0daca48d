// libmfrc522/src/card/operations/read.rs

use log::{trace, warn};

use crate::constants::MF_BLOCK_SIZE;
use crate::device::{Device, Framing, Initialized};
use crate::protocol::encode_read;
use crate::status::StatusCode;
use crate::Result;

impl Device<Initialized> {
    /// READ one 16-byte block (CRC_A checked and stripped).
    ///
    /// MIFARE Classic needs the sector authenticated first. Ultralight
    /// returns four pages starting at `block_addr`, wrapping after page 15.
    pub fn mifare_read(&mut self, block_addr: u8) -> Result<[u8; MF_BLOCK_SIZE]> {
        trace!("mifare_read {}", block_addr);
        let cmd = encode_read(block_addr);
        let crc = self.calculate_crc(&cmd)?;
        let frame = [cmd[0], cmd[1], crc[0], crc[1]];
        let ex = self.transceive(&frame, true, Framing::with_crc())?.into_result()?;
        if ex.data.len() != MF_BLOCK_SIZE + 2 {
            warn!("READ of block {} returned {} bytes", block_addr, ex.data.len());
            return Err(StatusCode::Error.into());
        }
        let mut block = [0u8; MF_BLOCK_SIZE];
        block.copy_from_slice(&ex.data[..MF_BLOCK_SIZE]);
        Ok(block)
    }
}
