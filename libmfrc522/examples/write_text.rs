// Write the text given on the command line to the next card presented.
//
// Usage:
//   cargo run -p libmfrc522 --example write_text --features rpi -- "some text"

use libmfrc522::device::DeviceBuilder;
use libmfrc522::prelude::*;
use libmfrc522::transport::RpiInterruptLine;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        anyhow::bail!("usage: write_text <text>");
    }

    let config = ReaderConfig::default();
    let dev = DeviceBuilder::from_config(&config)?
        .build_uninitialized()?
        .initialize()?;
    let irq: Box<dyn InterruptLine> = Box::new(RpiInterruptLine::new(config.pin_irq)?);
    let mut session = CardSession::new(dev, Some(irq), SessionConfig::default())?;

    let handle = session.wait_handle();
    ctrlc::set_handler(move || handle.cancel())?;

    println!("Now place your card to write");
    let result = session.write_text(&text, Some(0x00));
    session.cleanup()?;
    let (uid, previous) = result?;
    println!("Written to {} (previous content: {:?})", uid.to_hex(), previous);
    Ok(())
}
