// libmfrc522/src/device/control.rs

use std::thread;
use std::time::Duration;

use derive_more::Display;
use log::{debug, trace, warn};

use crate::constants::{
    COMMAND_POWER_DOWN, POWER_UP_POLL_LIMIT, RF_CFG_RX_GAIN_MASK, SOFT_RESET_ATTEMPTS,
    SOFT_RESET_WAIT_MS, TX_CONTROL_ANTENNA,
};
use crate::device::handle::Device;
use crate::device::registers::{PcdCommand, Register, RxGain};
use crate::status::StatusCode;
use crate::Result;

/// Chip identity decoded from VersionReg.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirmwareVersion {
    #[display(fmt = "FM17522 clone")]
    Fm17522,
    #[display(fmt = "v0.0")]
    V0_0,
    #[display(fmt = "v1.0")]
    V1_0,
    #[display(fmt = "v2.0")]
    V2_0,
    #[display(fmt = "counterfeit chip")]
    Counterfeit,
    #[display(fmt = "unknown")]
    Unknown(u8),
}

impl FirmwareVersion {
    pub fn from_register(value: u8) -> Self {
        match value {
            0x88 => FirmwareVersion::Fm17522,
            0x90 => FirmwareVersion::V0_0,
            0x91 => FirmwareVersion::V1_0,
            0x92 => FirmwareVersion::V2_0,
            0x12 => FirmwareVersion::Counterfeit,
            other => FirmwareVersion::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            FirmwareVersion::Fm17522 => 0x88,
            FirmwareVersion::V0_0 => 0x90,
            FirmwareVersion::V1_0 => 0x91,
            FirmwareVersion::V2_0 => 0x92,
            FirmwareVersion::Counterfeit => 0x12,
            FirmwareVersion::Unknown(v) => v,
        }
    }

    /// 0x00 and 0xFF are what a floating or disconnected bus reads back.
    pub fn is_bus_failure(self) -> bool {
        matches!(self, FirmwareVersion::Unknown(0x00) | FirmwareVersion::Unknown(0xFF))
    }
}

impl<State> Device<State> {
    /// Issue SoftReset and wait up to 3 x 50 ms for PowerDown to clear.
    pub fn soft_reset(&mut self) -> Result<()> {
        trace!("soft_reset");
        self.write_register(Register::Command, PcdCommand::SoftReset.code())?;
        for _ in 0..SOFT_RESET_ATTEMPTS {
            thread::sleep(Duration::from_millis(SOFT_RESET_WAIT_MS));
            if self.read_register(Register::Command)? & COMMAND_POWER_DOWN == 0 {
                return Ok(());
            }
        }
        warn!("chip still in power down after soft reset");
        Ok(())
    }

    /// Enable the TX1 and TX2 drivers. They are off after a reset.
    pub fn antenna_on(&mut self) -> Result<()> {
        let value = self.read_register(Register::TxControl)?;
        if value & TX_CONTROL_ANTENNA != TX_CONTROL_ANTENNA {
            self.write_register(Register::TxControl, value | TX_CONTROL_ANTENNA)?;
        }
        Ok(())
    }

    pub fn antenna_off(&mut self) -> Result<()> {
        self.clear_bits(Register::TxControl, TX_CONTROL_ANTENNA)
    }

    /// Receiver gain, RFCfgReg bits 6..4.
    pub fn antenna_gain(&mut self) -> Result<RxGain> {
        let value = self.read_register(Register::RfCfg)?;
        Ok(RxGain::from_register(value))
    }

    pub fn set_antenna_gain(&mut self, gain: RxGain) -> Result<()> {
        if self.antenna_gain()? == gain {
            return Ok(());
        }
        debug!("setting receiver gain to {}", gain);
        // clear first so a 000 pattern sticks
        self.clear_bits(Register::RfCfg, RF_CFG_RX_GAIN_MASK)?;
        self.set_bits(Register::RfCfg, gain.mask() & RF_CFG_RX_GAIN_MASK)
    }

    /// Enter soft power-down. Any later write to CommandReg wakes the chip.
    pub fn soft_power_down(&mut self) -> Result<()> {
        self.set_bits(Register::Command, COMMAND_POWER_DOWN)
    }

    /// Leave soft power-down and wait for the oscillator to come back.
    pub fn soft_power_up(&mut self) -> Result<()> {
        self.clear_bits(Register::Command, COMMAND_POWER_DOWN)?;
        for _ in 0..POWER_UP_POLL_LIMIT {
            if self.read_register(Register::Command)? & COMMAND_POWER_DOWN == 0 {
                return Ok(());
            }
        }
        warn!("chip did not leave power down");
        Err(StatusCode::Timeout.into())
    }

    pub fn version(&mut self) -> Result<FirmwareVersion> {
        let version = FirmwareVersion::from_register(self.read_register(Register::Version)?);
        if version.is_bus_failure() {
            warn!(
                "version register reads {:#04x}, communication with the MFRC522 probably failed",
                version.raw()
            );
        }
        Ok(version)
    }
}
