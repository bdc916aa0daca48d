// libmfrc522/src/card/operations/write.rs

use log::{debug, trace, warn};

use crate::constants::{MF_ACK, MF_BLOCK_SIZE, UL_PAGE_SIZE};
use crate::device::{Device, Framing, Initialized};
use crate::protocol::{encode_ultralight_write, encode_write};
use crate::status::StatusCode;
use crate::utils::bytes_to_hex_spaced;
use crate::Result;

impl Device<Initialized> {
    /// Send `payload` + CRC_A and expect a 4-bit ACK.
    ///
    /// With `accept_timeout` a missing answer also counts as success; the
    /// data phase of increment, decrement and restore is not acknowledged
    /// by every card.
    pub fn mifare_transceive(&mut self, payload: &[u8], accept_timeout: bool) -> Result<()> {
        if payload.is_empty() || payload.len() > MF_BLOCK_SIZE {
            warn!("mifare_transceive: payload of {} bytes", payload.len());
            return Err(StatusCode::Invalid.into());
        }
        let crc = self.calculate_crc(payload)?;
        let mut frame = Vec::with_capacity(payload.len() + 2);
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&crc);

        let ex = self.transceive(&frame, true, Framing::default())?;
        if accept_timeout && ex.status == StatusCode::Timeout {
            return Ok(());
        }
        ex.status.into_result()?;
        if ex.data.len() != 1 || ex.valid_bits != 4 {
            warn!(
                "invalid ACK: [{}] with {} valid bits",
                bytes_to_hex_spaced(&ex.data),
                ex.valid_bits
            );
            return Err(StatusCode::Error.into());
        }
        if ex.data[0] != MF_ACK {
            debug!("card answered NAK {:#03x}", ex.data[0]);
            return Err(StatusCode::MifareNack.into());
        }
        Ok(())
    }

    /// Two-phase WRITE of one 16-byte block. Only the first 16 bytes of
    /// `data` are used.
    ///
    /// On Ultralight this is COMPATIBILITY WRITE: only bytes 0..4 land in
    /// the page.
    pub fn mifare_write(&mut self, block_addr: u8, data: &[u8]) -> Result<()> {
        trace!("mifare_write {}", block_addr);
        if data.len() < MF_BLOCK_SIZE {
            warn!("mifare_write needs {} bytes, got {}", MF_BLOCK_SIZE, data.len());
            return Err(StatusCode::Invalid.into());
        }
        self.mifare_transceive(&encode_write(block_addr), false)?;
        self.mifare_transceive(&data[..MF_BLOCK_SIZE], false)
    }

    /// WRITE one 4-byte Ultralight page.
    pub fn ultralight_write(&mut self, page: u8, data: &[u8]) -> Result<()> {
        trace!("ultralight_write {}", page);
        let Some(bytes) = data.get(..UL_PAGE_SIZE) else {
            warn!("ultralight_write needs {} bytes, got {}", UL_PAGE_SIZE, data.len());
            return Err(StatusCode::Invalid.into());
        };
        let mut page_data = [0u8; UL_PAGE_SIZE];
        page_data.copy_from_slice(bytes);
        self.mifare_transceive(&encode_ultralight_write(page, &page_data), false)
    }
}
