// Wait for a card on the IRQ pin and print the text stored on it.
// Ctrl+C aborts the wait.
//
// Usage:
//   cargo run -p libmfrc522 --example read_text --features rpi

use libmfrc522::device::DeviceBuilder;
use libmfrc522::prelude::*;
use libmfrc522::transport::RpiInterruptLine;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ReaderConfig::default();
    let dev = DeviceBuilder::from_config(&config)?
        .build_uninitialized()?
        .initialize()?;
    let irq: Box<dyn InterruptLine> = Box::new(RpiInterruptLine::new(config.pin_irq)?);
    let mut session = CardSession::new(dev, Some(irq), SessionConfig::default())?;

    let handle = session.wait_handle();
    ctrlc::set_handler(move || {
        eprintln!("Ctrl+C received, stopping...");
        handle.cancel();
    })?;

    println!("Hold a card near the reader");
    let result = session.read_text(Some(0x00));
    session.cleanup()?;
    match result {
        Ok((uid, text)) => println!("{} ({}): {}", uid.to_hex(), uid.to_number(), text),
        Err(Error::Status(StatusCode::Canceled)) => println!("canceled"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
