#![cfg(feature = "rpi")]

//! Helpers for tests against a real MFRC522. Opening the reader fails
//! softly (`Ok(None)`) when the SPI device or GPIO chip is missing, so the
//! tests can run on any machine.

use libmfrc522::config::ReaderConfig;
use libmfrc522::device::{Device, DeviceBuilder, Initialized};
use libmfrc522::{Error, Result};

pub fn open_and_initialize_device() -> Result<Option<Device<Initialized>>> {
    let builder = match DeviceBuilder::from_config(&ReaderConfig::default()) {
        Ok(builder) => builder,
        Err(Error::RpiGpio(e)) => {
            eprintln!("no GPIO access: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    match builder.build_uninitialized()?.initialize() {
        Ok(dev) => Ok(Some(dev)),
        Err(Error::Spi(e)) => {
            eprintln!("no SPI access: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
