// libmfrc522/src/device/communicate.rs

use log::{debug, warn};

use crate::constants::{
    BIT_FRAMING_START_SEND, COMMAND_POLL_LIMIT, ERR_BUFFER_OVFL, ERR_COLL, ERR_PARITY,
    ERR_PROTOCOL, FIFO_FLUSH, IRQ_ALL, IRQ_IDLE, IRQ_RX, IRQ_TIMER,
};
use crate::device::handle::{Device, Initialized};
use crate::device::registers::{PcdCommand, Register};
use crate::status::StatusCode;
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

/// Bit-level framing of a single exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Framing {
    /// Number of valid bits in the last transmitted byte, 0 = all eight.
    pub tx_last_bits: u8,
    /// Bit position where the first received bit is stored.
    pub rx_align: u8,
    /// Validate a trailing CRC_A on the response.
    pub check_crc: bool,
}

impl Framing {
    pub fn bits(tx_last_bits: u8) -> Self {
        Self {
            tx_last_bits,
            ..Self::default()
        }
    }

    pub fn with_crc() -> Self {
        Self {
            check_crc: true,
            ..Self::default()
        }
    }

    fn bit_framing(&self) -> u8 {
        ((self.rx_align & 0x07) << 4) | (self.tx_last_bits & 0x07)
    }
}

/// Outcome of one command round trip.
///
/// `Collision` still carries the bytes received before the collision, the
/// anti-collision loop depends on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status: StatusCode,
    pub data: Vec<u8>,
    /// Valid bits in the last received byte, 0 = all eight.
    pub valid_bits: u8,
}

impl Exchange {
    fn status_only(status: StatusCode) -> Self {
        Self {
            status,
            data: Vec::new(),
            valid_bits: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Turn a non-`Ok` outcome into `Error::Status`.
    pub fn into_result(self) -> Result<Self> {
        self.status.into_result()?;
        Ok(self)
    }
}

impl Device<Initialized> {
    /// Run `command` with `send` in the FIFO and classify the outcome.
    ///
    /// The outer `Result` fails only when the bus fails. Timeouts, chip
    /// errors, collisions and CRC problems come back in
    /// [`Exchange::status`].
    pub fn communicate(
        &mut self,
        command: PcdCommand,
        wait_irq: u8,
        send: &[u8],
        want_response: bool,
        framing: Framing,
    ) -> Result<Exchange> {
        debug!(
            "communicate {:?} [{}] framing={:#04x}",
            command,
            bytes_to_hex_spaced(send),
            framing.bit_framing()
        );

        self.write_register(Register::Command, PcdCommand::Idle.code())?;
        self.write_register(Register::ComIrq, IRQ_ALL)?;
        self.write_register(Register::FifoLevel, FIFO_FLUSH)?;
        self.write_register_block(Register::FifoData, send)?;
        self.write_register(Register::BitFraming, framing.bit_framing())?;
        self.write_register(Register::Command, command.code())?;
        if command == PcdCommand::Transceive {
            self.set_bits(Register::BitFraming, BIT_FRAMING_START_SEND)?;
        }

        let mut completed = false;
        for _ in 0..COMMAND_POLL_LIMIT {
            let irq = self.read_register(Register::ComIrq)?;
            if irq & wait_irq != 0 {
                completed = true;
                break;
            }
            if irq & IRQ_TIMER != 0 {
                debug!("no answer within the timer period");
                return Ok(Exchange::status_only(StatusCode::Timeout));
            }
        }
        if !completed {
            warn!("command {:?} did not complete, communication with the MFRC522 might be down", command);
            return Ok(Exchange::status_only(StatusCode::Timeout));
        }

        let error = self.read_register(Register::Error)?;
        if error & (ERR_BUFFER_OVFL | ERR_PARITY | ERR_PROTOCOL) != 0 {
            warn!("chip reported error {:#04x}", error);
            return Ok(Exchange::status_only(StatusCode::Error));
        }

        let mut data = Vec::new();
        let mut valid_bits = 0;
        if want_response {
            let level = (self.read_register(Register::FifoLevel)? & 0x7F) as usize;
            if level > 0 {
                data = self.read_register_block(Register::FifoData, level, framing.rx_align)?;
            }
            valid_bits = self.read_register(Register::Control)? & 0x07;
        }

        if error & ERR_COLL != 0 {
            return Ok(Exchange {
                status: StatusCode::Collision,
                data,
                valid_bits,
            });
        }

        if want_response && !data.is_empty() && framing.check_crc {
            if data.len() == 1 && valid_bits == 4 {
                return Ok(Exchange::status_only(StatusCode::MifareNack));
            }
            if data.len() < 2 || valid_bits != 0 {
                warn!("response too short for CRC_A: {} bytes, {} bits", data.len(), valid_bits);
                return Ok(Exchange::status_only(StatusCode::CrcWrong));
            }
            let split = data.len() - 2;
            let crc = match self.calculate_crc(&data[..split]) {
                Ok(crc) => crc,
                Err(Error::Status(status)) => return Ok(Exchange::status_only(status)),
                Err(e) => return Err(e),
            };
            if data[split..] != crc {
                warn!(
                    "CRC_A mismatch: received [{}], computed [{}]",
                    bytes_to_hex_spaced(&data[split..]),
                    bytes_to_hex_spaced(&crc)
                );
                return Ok(Exchange::status_only(StatusCode::CrcWrong));
            }
        }

        Ok(Exchange {
            status: StatusCode::Ok,
            data,
            valid_bits,
        })
    }

    /// `communicate` with the Transceive command, waiting for RxIRq or IdleIRq.
    pub fn transceive(&mut self, send: &[u8], want_response: bool, framing: Framing) -> Result<Exchange> {
        self.communicate(PcdCommand::Transceive, IRQ_RX | IRQ_IDLE, send, want_response, framing)
    }
}
