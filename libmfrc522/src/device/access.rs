// libmfrc522/src/device/access.rs

//! Register access over SPI.
//!
//! Address bytes follow the datasheet (8.1.2.3): bit 7 selects read, bits
//! 6..1 carry the register address and bit 0 is always zero.

use crate::device::handle::Device;
use crate::device::registers::Register;
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

macro_rules! spi_trace {
    ($($arg:tt)*) => {
        if cfg!(feature = "diagnostics") {
            log::trace!(target: "libmfrc522::spi", $($arg)*);
        }
    };
}

/// Copy `src` into `dst`, keeping the bits of `dst[0]` below `rx_align`.
///
/// The first byte of a bit-oriented frame only carries valid bits from
/// position `rx_align` upwards; the rest belong to what the caller already
/// holds.
pub(crate) fn merge_rx_aligned(dst: &mut [u8], src: &[u8], rx_align: u8) {
    let n = dst.len().min(src.len());
    if n == 0 {
        return;
    }
    let rx_align = rx_align & 0x07;
    if rx_align == 0 {
        dst[..n].copy_from_slice(&src[..n]);
        return;
    }
    let mask = 0xFFu8 << rx_align;
    dst[0] = (dst[0] & !mask) | (src[0] & mask);
    dst[1..n].copy_from_slice(&src[1..n]);
}

impl<State> Device<State> {
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        spi_trace!("write {} <- {:#04x}", reg, value);
        self.transport.exchange(&[reg.write_address(), value])?;
        Ok(())
    }

    /// Burst write, used to load the FIFO.
    pub fn write_register_block(&mut self, reg: Register, values: &[u8]) -> Result<()> {
        spi_trace!("write {} <- [{}]", reg, bytes_to_hex_spaced(values));
        let mut out = Vec::with_capacity(values.len() + 1);
        out.push(reg.write_address());
        out.extend_from_slice(values);
        self.transport.exchange(&out)?;
        Ok(())
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8> {
        let rx = self.transport.exchange(&[reg.read_address(), 0x00])?;
        let value = rx.get(1).copied().ok_or(Error::InvalidLength {
            expected: 2,
            actual: rx.len(),
        })?;
        spi_trace!("read {} -> {:#04x}", reg, value);
        Ok(value)
    }

    pub fn read_register_block(&mut self, reg: Register, count: usize, rx_align: u8) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_register_block_into(reg, &mut buf, rx_align)?;
        Ok(buf)
    }

    /// Read `buf.len()` bytes from `reg` into `buf`. Bits of `buf[0]` below
    /// `rx_align` are left untouched.
    pub fn read_register_block_into(&mut self, reg: Register, buf: &mut [u8], rx_align: u8) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        // address repeated once per byte, then a dummy to clock out the last one
        let mut out = vec![reg.read_address(); buf.len()];
        out.push(0x00);
        let rx = self.transport.exchange(&out)?;
        if rx.len() != out.len() {
            return Err(Error::InvalidLength {
                expected: out.len(),
                actual: rx.len(),
            });
        }
        merge_rx_aligned(buf, &rx[1..], rx_align);
        spi_trace!("read {} -> [{}]", reg, bytes_to_hex_spaced(buf));
        Ok(())
    }

    pub fn set_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let current = self.read_register(reg)?;
        self.write_register(reg, current | mask)
    }

    pub fn clear_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        let current = self.read_register(reg)?;
        self.write_register(reg, current & !mask)
    }
}
