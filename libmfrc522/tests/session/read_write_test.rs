#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{text_block, DOUBLE_UID, SINGLE_UID};
use common::helpers::{fast_session_config, reader_with, session_with};
use libmfrc522::card::PiccType;
use libmfrc522::session::{CardSession, DecodeErrors, SessionState, TextEncoding};
use libmfrc522::test_support::{CardState, SimCard};
use libmfrc522::protocol::PiccCommand;
use libmfrc522::transport::InterruptLine;
use libmfrc522::StatusCode;

#[test]
fn ultralight_read_stops_at_first_zero() {
    let (chip, mut session) = session_with(vec![SimCard::ultralight(&DOUBLE_UID)]).unwrap();

    let (uid, data) = session.read_bytes(Some(0x00)).unwrap();
    assert_eq!(uid.as_bytes(), &DOUBLE_UID);
    assert_eq!(uid.picc_type(), PiccType::MifareUltralight);

    // pages 0 and 1 hold the UID, page 2 starts with BCC1 and the serial
    // number byte, then the lock bytes are zero
    let mut expected = Vec::new();
    for page in 0..3 {
        expected.extend_from_slice(&chip.card_page(0, page).unwrap());
    }
    let end = expected.iter().position(|&b| b == 0).unwrap();
    expected.truncate(end);
    assert_eq!(expected.len(), 10);
    assert_eq!(data, expected);
    assert_eq!(chip.card_state(0), Some(CardState::Halt));
}

#[test]
fn ultralight_is_not_written() {
    let (chip, mut session) = session_with(vec![
        SimCard::ultralight(&DOUBLE_UID),
        SimCard::mifare_1k(&SINGLE_UID),
    ])
    .unwrap();
    // whichever card is singulated first, only the Classic one is written
    let (uid, _old) = session.write_bytes(b"payload", Some(0x00)).unwrap();
    assert_eq!(uid.as_bytes(), &SINGLE_UID);
    assert_eq!(chip.card_block(1, 1), Some(text_block("payload")));
}

#[test]
fn text_round_trip_on_4k_card() {
    let (chip, mut session) = session_with(vec![SimCard::mifare_4k(&SINGLE_UID)]).unwrap();
    let text = "MFRC522 \u{00e9}t\u{00e9} ".repeat(4);

    let (_uid, previous) = session.write_text(&text, Some(0x00)).unwrap();
    assert!(previous.is_empty());
    assert_eq!(session.state(), SessionState::Halted);

    chip.cycle_field();
    let (_uid, read) = session.read_text(Some(0x00)).unwrap();
    assert_eq!(read, text);
}

#[test]
fn latin1_session() {
    let (chip, dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    let mut config = fast_session_config();
    config.encoding = TextEncoding::Latin1;
    config.errors = DecodeErrors::Strict;
    let mut session = CardSession::new(dev, None, config).unwrap();

    session.write_text("caf\u{00e9}", Some(0x00)).unwrap();
    let mut expected = text_block("caf");
    expected[3] = 0xE9;
    assert_eq!(chip.card_block(0, 1), Some(expected));

    chip.cycle_field();
    let (_uid, read) = session.read_text(Some(0x00)).unwrap();
    assert_eq!(read, "caf\u{00e9}");
}

#[test]
fn wrong_session_key_fails_and_releases_card() {
    let key = common::fixtures::custom_key();
    let card = SimCard::mifare_1k(&SINGLE_UID).with_keys(key, key);
    let (_chip, mut session) = session_with(vec![card]).unwrap();
    let err = session.read_bytes(None).unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::Timeout));
    assert!(!session.device_mut().is_crypto1_on().unwrap());
}

#[test]
fn ultralight_from_reqa_to_read_bytes() {
    let mut card = SimCard::ultralight(&DOUBLE_UID);
    // no zero before page 10: lock bytes, OTP and user pages all set
    let mut page2 = card.page(2).unwrap();
    page2[2] = 0x0F;
    page2[3] = 0xF0;
    card.set_page(2, page2);
    card.set_page(3, [0xFF; 4]);
    for page in 4..16u8 {
        let base = page * 4;
        card.set_page(page, [base, base + 1, base + 2, base + 3]);
    }
    card.set_page(10, [40, 0x00, 42, 43]);

    let (chip, mut dev) = reader_with(vec![card]).unwrap();
    assert_eq!(dev.request_a().unwrap(), [0x44, 0x00]);
    let uid = dev.read_card_serial().unwrap();
    assert_eq!(uid.as_bytes(), &DOUBLE_UID);
    assert_eq!(uid.cascade_levels(), 2);
    assert_eq!(uid.sak(), Some(0x00));
    assert_eq!(uid.picc_type(), PiccType::MifareUltralight);
    assert_eq!(chip.frames()[0], vec![PiccCommand::Reqa.code()]);
    dev.halt_a().unwrap();
    chip.cycle_field();

    let irq: Box<dyn InterruptLine> = Box::new(chip.interrupt_line());
    let mut session = CardSession::new(dev, Some(irq), fast_session_config()).unwrap();
    let (read_uid, data) = session.read_bytes(Some(0x00)).unwrap();
    assert_eq!(read_uid, uid);

    let memory: Vec<u8> = (0..16u8).flat_map(|p| chip.card_page(0, p).unwrap()).collect();
    assert_eq!(memory.len(), 64);
    assert_eq!(data, memory[..41].to_vec());
}
