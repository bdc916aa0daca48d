#![cfg(feature = "rpi")]

#[path = "common.rs"]
mod common;

use libmfrc522::Result;

// Requires an MFRC522 on SPI0/CE0 with RST on BCM 25. Marked `#[ignore]`;
// run manually on the board with:
//
// cargo test -p libmfrc522 --test hardware --features rpi -- --ignored

#[test]
#[ignore]
fn version_and_self_test() -> Result<()> {
    let Some(mut dev) = common::open_and_initialize_device()? else {
        return Ok(());
    };
    let version = dev.version()?;
    assert!(!version.is_bus_failure());
    dev.cleanup()
}

#[test]
#[ignore]
fn field_scan_does_not_fail() -> Result<()> {
    let Some(mut dev) = common::open_and_initialize_device()? else {
        return Ok(());
    };
    if dev.is_new_card_present()? {
        let uid = dev.read_card_serial()?;
        println!("{}", uid);
        dev.halt_a()?;
    }
    dev.cleanup()
}
