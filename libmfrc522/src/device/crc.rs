// libmfrc522/src/device/crc.rs

use log::warn;

use crate::constants::{CRC_POLL_LIMIT, DIV_IRQ_CRC, FIFO_FLUSH};
use crate::device::handle::Device;
use crate::device::registers::{PcdCommand, Register};
use crate::status::StatusCode;
use crate::Result;

impl<State> Device<State> {
    /// Run `data` through the CRC coprocessor and return CRC_A as
    /// `[low, high]`, ready to append to a frame.
    ///
    /// Fails with `StatusCode::Timeout` when the coprocessor does not finish
    /// within the poll budget.
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2]> {
        self.write_register(Register::Command, PcdCommand::Idle.code())?;
        self.write_register(Register::DivIrq, DIV_IRQ_CRC)?;
        self.write_register(Register::FifoLevel, FIFO_FLUSH)?;
        self.write_register_block(Register::FifoData, data)?;
        self.write_register(Register::Command, PcdCommand::CalcCrc.code())?;

        for _ in 0..CRC_POLL_LIMIT {
            let irq = self.read_register(Register::DivIrq)?;
            if irq & DIV_IRQ_CRC != 0 {
                self.write_register(Register::Command, PcdCommand::Idle.code())?;
                let low = self.read_register(Register::CrcResultL)?;
                let high = self.read_register(Register::CrcResultH)?;
                return Ok([low, high]);
            }
        }

        warn!("CRC calculation timed out, communication with the MFRC522 might be down");
        Err(StatusCode::Timeout.into())
    }
}
