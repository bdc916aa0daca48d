#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{custom_key, patterned_block, text_block, DOUBLE_UID, SINGLE_UID};
use common::helpers::{activate, reader_with};
use libmfrc522::protocol::PiccCommand;
use libmfrc522::test_support::SimCard;
use libmfrc522::{Error, MifareKey, StatusCode};

#[test]
fn classic_1k_write_read_round_trip() {
    let (chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    let uid = activate(&mut dev).unwrap();
    let key = MifareKey::FACTORY;

    for (sector, block) in [(1u8, 4u8), (1, 6), (15, 62)] {
        let trailer = sector * 4 + 3;
        dev.authenticate(PiccCommand::MfAuthKeyB, trailer, &key, &uid).unwrap();
        let data = patterned_block(block);
        dev.mifare_write(block, &data).unwrap();
        assert_eq!(dev.mifare_read(block).unwrap(), data);
        assert_eq!(chip.card_block(0, block), Some(data));
    }

    dev.halt_a().unwrap();
    dev.stop_crypto1().unwrap();
    assert!(!dev.is_crypto1_on().unwrap());
}

#[test]
fn read_without_authentication_is_refused() {
    let (_chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    activate(&mut dev).unwrap();
    match dev.mifare_read(4) {
        Err(Error::Status(StatusCode::MifareNack)) => {}
        other => panic!("expected NAK, got {:?}", other),
    }
}

#[test]
fn wrong_key_times_out_and_card_drops_out() {
    let card = SimCard::mifare_1k(&SINGLE_UID).with_keys(custom_key(), custom_key());
    let (_chip, mut dev) = reader_with(vec![card]).unwrap();
    let uid = activate(&mut dev).unwrap();

    let err = dev
        .authenticate(PiccCommand::MfAuthKeyA, 7, &MifareKey::FACTORY, &uid)
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::Timeout));

    dev.stop_crypto1().unwrap();
    let uid = activate(&mut dev).unwrap();
    dev.authenticate(PiccCommand::MfAuthKeyA, 7, &custom_key(), &uid).unwrap();
    assert!(dev.is_crypto1_on().unwrap());
}

#[test]
fn value_block_arithmetic() {
    let (chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    let uid = activate(&mut dev).unwrap();
    dev.authenticate(PiccCommand::MfAuthKeyA, 7, &MifareKey::FACTORY, &uid).unwrap();

    dev.mifare_set_value(5, 100).unwrap();
    assert_eq!(dev.mifare_get_value(5).unwrap(), 100);

    dev.mifare_increment(5, 25).unwrap();
    dev.mifare_transfer(5).unwrap();
    assert_eq!(dev.mifare_get_value(5).unwrap(), 125);

    dev.mifare_decrement(5, 150).unwrap();
    dev.mifare_transfer(5).unwrap();
    assert_eq!(dev.mifare_get_value(5).unwrap(), -25);

    // copy into a sibling block of the same sector
    dev.mifare_restore(5).unwrap();
    dev.mifare_transfer(6).unwrap();
    assert_eq!(dev.mifare_get_value(6).unwrap(), -25);
    let raw = chip.card_block(0, 6).unwrap();
    assert_eq!(raw[12], 6);
    assert_eq!(raw[13], !6u8);
}

#[test]
fn increment_on_data_block_is_refused() {
    let (_chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    let uid = activate(&mut dev).unwrap();
    dev.authenticate(PiccCommand::MfAuthKeyA, 7, &MifareKey::FACTORY, &uid).unwrap();
    dev.mifare_write(4, &text_block("not a value")).unwrap();
    assert!(dev.mifare_increment(4, 1).is_err());
}

#[test]
fn short_write_is_rejected_without_io() {
    let (chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    activate(&mut dev).unwrap();
    let before = chip.exchange_count();
    assert!(dev.mifare_write(4, &[1, 2, 3]).is_err());
    assert_eq!(chip.exchange_count(), before);
}

#[test]
fn ultralight_pages() {
    let (chip, mut dev) = reader_with(vec![SimCard::ultralight(&DOUBLE_UID)]).unwrap();
    activate(&mut dev).unwrap();

    dev.ultralight_write(4, &[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
    dev.ultralight_write(5, b"data").unwrap();
    assert_eq!(chip.card_page(0, 4), Some([0xCA, 0xFE, 0xBA, 0xBE]));

    let read = dev.mifare_read(4).unwrap();
    assert_eq!(&read[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
    assert_eq!(&read[4..8], b"data");

    // reads wrap around after page 15
    let tail = dev.mifare_read(15).unwrap();
    assert_eq!(&tail[4..8], &chip.card_page(0, 0).unwrap());
}
