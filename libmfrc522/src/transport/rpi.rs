// libmfrc522/src/transport/rpi.rs
//
// Raspberry Pi backend on top of rppal (spidev + /dev/gpiomem).

use log::{debug, info};
use rppal::gpio::{Gpio, InputPin, IoPin, Level, Mode as PinMode, OutputPin, Trigger};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::config::ReaderConfig;
use crate::transport::traits::{InterruptLine, ResetLine, Transport};
use crate::{Error, Result};

fn spi_bus(bus: u8) -> Result<Bus> {
    match bus {
        0 => Ok(Bus::Spi0),
        1 => Ok(Bus::Spi1),
        2 => Ok(Bus::Spi2),
        3 => Ok(Bus::Spi3),
        4 => Ok(Bus::Spi4),
        5 => Ok(Bus::Spi5),
        6 => Ok(Bus::Spi6),
        other => Err(Error::Transport(format!("unsupported spi bus {}", other))),
    }
}

fn slave_select(device: u8) -> Result<SlaveSelect> {
    match device {
        0 => Ok(SlaveSelect::Ss0),
        1 => Ok(SlaveSelect::Ss1),
        2 => Ok(SlaveSelect::Ss2),
        other => Err(Error::Transport(format!("unsupported spi device {}", other))),
    }
}

/// SPI transport with an optional GPIO driven chip-select.
pub struct RpiSpiTransport {
    bus: u8,
    device: u8,
    speed_hz: u32,
    pin_ce: u8,
    spi: Option<Spi>,
    ce: Option<OutputPin>,
}

impl RpiSpiTransport {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            bus: config.bus,
            device: config.device,
            speed_hz: config.speed_hz,
            pin_ce: config.pin_ce,
            spi: None,
            ce: None,
        }
    }
}

impl Transport for RpiSpiTransport {
    fn open(&mut self) -> Result<()> {
        info!(
            "opening spi bus={} device={} speed={}",
            self.bus, self.device, self.speed_hz
        );
        let spi = Spi::new(
            spi_bus(self.bus)?,
            slave_select(self.device)?,
            self.speed_hz,
            Mode::Mode0,
        )?;
        if self.pin_ce != 0 {
            let mut ce = Gpio::new()?.get(self.pin_ce)?.into_output();
            ce.set_high();
            self.ce = Some(ce);
        }
        self.spi = Some(spi);
        Ok(())
    }

    fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>> {
        let spi = self
            .spi
            .as_ref()
            .ok_or_else(|| Error::Transport("spi not open".to_string()))?;
        let mut rx = vec![0u8; out.len()];
        if let Some(ce) = self.ce.as_mut() {
            ce.set_low();
        }
        let res = spi.transfer(&mut rx, out);
        if let Some(ce) = self.ce.as_mut() {
            ce.set_high();
        }
        res?;
        Ok(rx)
    }

    fn close(&mut self) -> Result<()> {
        if self.spi.take().is_some() {
            debug!("spi closed");
        }
        self.ce = None;
        Ok(())
    }
}

/// Reset line on a GPIO that is read as an input before being driven.
pub struct RpiResetLine {
    pin: Option<IoPin>,
}

impl RpiResetLine {
    pub fn new(pin: u8) -> Result<Self> {
        let pin = Gpio::new()?.get(pin)?.into_io(PinMode::Input);
        Ok(Self { pin: Some(pin) })
    }

    fn pin(&mut self) -> Result<&mut IoPin> {
        self.pin
            .as_mut()
            .ok_or_else(|| Error::Gpio("reset pin released".to_string()))
    }
}

impl ResetLine for RpiResetLine {
    fn is_low(&mut self) -> Result<bool> {
        let pin = self.pin()?;
        pin.set_mode(PinMode::Input);
        Ok(pin.is_low())
    }

    fn set_low(&mut self) -> Result<()> {
        let pin = self.pin()?;
        pin.set_mode(PinMode::Output);
        pin.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<()> {
        let pin = self.pin()?;
        pin.set_mode(PinMode::Output);
        pin.set_high();
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.pin = None;
        Ok(())
    }
}

/// IRQ input with pull-up; the chip drives it low on an enabled interrupt.
pub struct RpiInterruptLine {
    pin: Option<InputPin>,
}

impl RpiInterruptLine {
    pub fn new(pin: u8) -> Result<Self> {
        let pin = Gpio::new()?.get(pin)?.into_input_pullup();
        Ok(Self { pin: Some(pin) })
    }
}

impl InterruptLine for RpiInterruptLine {
    fn on_falling_edge(&mut self, mut callback: Box<dyn FnMut() + Send>) -> Result<()> {
        let pin = self
            .pin
            .as_mut()
            .ok_or_else(|| Error::Gpio("irq pin released".to_string()))?;
        pin.set_async_interrupt(Trigger::FallingEdge, move |_: Level| callback())?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut pin) = self.pin.take() {
            pin.clear_async_interrupt()?;
        }
        Ok(())
    }
}
