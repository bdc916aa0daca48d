// Print the firmware version and run the chip's digital self-test.
//
// Usage:
//   cargo run -p libmfrc522 --example firmware_check --features rpi

use libmfrc522::device::DeviceBuilder;
use libmfrc522::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut dev = DeviceBuilder::from_config(&ReaderConfig::default())?.build_uninitialized()?;
    let version = dev.version()?;
    println!("Firmware Version: {:#04x} = {}", version.raw(), version);
    if version.is_bus_failure() {
        println!("WARNING: communication failure, is the MFRC522 properly connected?");
        dev.cleanup()?;
        return Ok(());
    }

    println!("Performing self-test...");
    let passed = dev.perform_self_test()?;
    println!("Result: {}", if passed { "OK" } else { "DEFECT or UNKNOWN" });
    dev.cleanup()?;
    Ok(())
}
