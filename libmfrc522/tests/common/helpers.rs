// helpers.rs: simulated readers and sessions

use std::time::Duration;

use libmfrc522::config::SessionConfig;
use libmfrc522::device::{Device, Initialized};
use libmfrc522::session::CardSession;
use libmfrc522::test_support::{SimCard, SimChip};
use libmfrc522::transport::InterruptLine;
use libmfrc522::{Result, Uid};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Chip with `cards` in the field and an initialized device on top of it.
pub fn reader_with(cards: Vec<SimCard>) -> Result<(SimChip, Device<Initialized>)> {
    init_logging();
    let chip = SimChip::new();
    for card in cards {
        chip.add_card(card);
    }
    let dev = chip.initialized_device()?;
    Ok((chip, dev))
}

/// REQA + full anti-collision loop.
pub fn activate(dev: &mut Device<Initialized>) -> Result<Uid> {
    dev.request_a()?;
    dev.read_card_serial()
}

pub fn fast_session_config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_millis(10),
        removal_backoff: Duration::from_millis(10),
        ..SessionConfig::default()
    }
}

/// Session wired to the chip's simulated IRQ pin.
pub fn session_with(cards: Vec<SimCard>) -> Result<(SimChip, CardSession)> {
    let (chip, dev) = reader_with(cards)?;
    let irq: Box<dyn InterruptLine> = Box::new(chip.interrupt_line());
    let session = CardSession::new(dev, Some(irq), fast_session_config())?;
    Ok((chip, session))
}
