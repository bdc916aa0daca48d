// Dump the memory of the first card presented to a Raspberry Pi wired
// MFRC522.
//
// Usage:
//   cargo run -p libmfrc522 --example dump_info --features rpi

use std::thread;
use std::time::Duration;

use libmfrc522::card::dump_details;
use libmfrc522::device::DeviceBuilder;
use libmfrc522::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ReaderConfig::default();
    let mut dev = DeviceBuilder::from_config(&config)?
        .build_uninitialized()?
        .initialize()?;
    print!("{}", dev.dump_version()?);

    println!("Scan a card to see its UID, SAK, type and data blocks...");
    let uid = loop {
        if dev.is_new_card_present()? {
            match dev.read_card_serial() {
                Ok(uid) => break uid,
                Err(e) => eprintln!("select failed: {}", e),
            }
        }
        thread::sleep(Duration::from_millis(100));
    };

    print!("{}", dump_details(&uid));
    print!("{}", dev.dump(&uid)?);
    dev.cleanup()?;
    Ok(())
}
