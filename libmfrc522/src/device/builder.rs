// libmfrc522/src/device/builder.rs

use crate::device::handle::{Device, Uninitialized};
use crate::transport::{ResetLine, Transport};
use crate::{Error, Result};

/// Helper to construct a Device from its collaborators.
#[derive(Default)]
pub struct DeviceBuilder {
    transport: Option<Box<dyn Transport>>,
    reset: Option<Box<dyn ResetLine>>,
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_reset_line(mut self, line: Box<dyn ResetLine>) -> Self {
        self.reset = Some(line);
        self
    }

    /// Consume the builder and return an uninitialized Device.
    /// Requires a transport to be provided; otherwise returns NotConfigured.
    pub fn build_uninitialized(self) -> Result<Device<Uninitialized>> {
        let transport = self.transport.ok_or(Error::NotConfigured("transport"))?;
        let device = Device::new_with_transport(transport);
        Ok(match self.reset {
            Some(line) => device.with_reset_line(line),
            None => device,
        })
    }

    /// Wire up SPI and the reset pin on a Raspberry Pi.
    #[cfg(feature = "rpi")]
    pub fn from_config(config: &crate::config::ReaderConfig) -> Result<Self> {
        use crate::transport::{RpiResetLine, RpiSpiTransport};

        let mut builder = Self::new().with_transport(Box::new(RpiSpiTransport::new(config)));
        if config.pin_reset != 0 {
            builder = builder.with_reset_line(Box::new(RpiResetLine::new(config.pin_reset)?));
        }
        Ok(builder)
    }
}
