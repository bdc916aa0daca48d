#[path = "../common/mod.rs"]
mod common;

use libmfrc522::device::{Device, FirmwareVersion, Register};
use libmfrc522::test_support::SimChip;
use libmfrc522::transport::MockTransport;

#[test]
fn initialize_programs_timer_and_antenna() {
    common::helpers::init_logging();
    let chip = SimChip::new();
    let mut dev = Device::new_with_transport(Box::new(chip.clone()))
        .initialize()
        .unwrap();
    assert_eq!(dev.version().unwrap(), FirmwareVersion::V2_0);
    assert_eq!(chip.register(Register::TMode), 0x80);
    assert_eq!(chip.register(Register::TPrescaler), 0xA9);
    assert_eq!(chip.register(Register::TxAsk), 0x40);
    assert_eq!(chip.register(Register::Mode), 0x3D);
    assert_eq!(chip.register(Register::TxControl) & 0x03, 0x03);
}

#[test]
fn self_test_detects_corruption() {
    let chip = SimChip::with_version(0x91);
    let mut dev = Device::new_with_transport(Box::new(chip.clone()));
    assert!(dev.perform_self_test().unwrap());
    chip.corrupt_self_test(true);
    assert!(!dev.perform_self_test().unwrap());
}

#[test]
fn failed_initialize_releases_transport() {
    let probe = MockTransport::new();
    probe.set_failures(1);
    let result = Device::new_with_transport(Box::new(probe.clone())).initialize();
    assert!(result.is_err());
    assert_eq!(probe.close_count(), 1);
}

#[test]
fn cleanup_is_idempotent() {
    let chip = SimChip::new();
    let mut dev = chip.initialized_device().unwrap();
    dev.cleanup().unwrap();
    dev.cleanup().unwrap();
    assert!(dev.is_released());
}
