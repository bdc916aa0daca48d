// Report every card that enters and leaves the field until Ctrl+C.
//
// Usage:
//   cargo run -p libmfrc522 --example interrupt_scan --features rpi

use libmfrc522::device::DeviceBuilder;
use libmfrc522::prelude::*;
use libmfrc522::transport::RpiInterruptLine;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ReaderConfig::default();
    let session_config = SessionConfig::default();
    let retries = session_config.removal_retries;
    let dev = DeviceBuilder::from_config(&config)?
        .build_uninitialized()?
        .initialize()?;
    let irq: Box<dyn InterruptLine> = Box::new(RpiInterruptLine::new(config.pin_irq)?);
    let mut session = CardSession::new(dev, Some(irq), session_config)?;

    let handle = session.wait_handle();
    ctrlc::set_handler(move || {
        eprintln!("Ctrl+C received, stopping...");
        handle.cancel();
    })?;

    while session.wait_for_interrupt()? {
        let uid = match session.read_card_serial() {
            Ok(uid) => uid,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        println!("card {} ({}), {}", uid.to_hex(), uid.to_number(), uid.picc_type());
        if !session.wait_for_card_removed(retries)? {
            break;
        }
        println!("card removed");
    }

    session.cleanup()?;
    Ok(())
}
