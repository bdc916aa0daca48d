#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeSet;

use common::fixtures::{DOUBLE_UID, SINGLE_UID, TRIPLE_UID};
use common::helpers::{activate, reader_with};
use libmfrc522::card::PiccType;
use libmfrc522::constants::COLL_POS_NOT_VALID;
use libmfrc522::protocol::PiccCommand;
use libmfrc522::test_support::{CardState, SimCard, SimChip};
use libmfrc522::{Error, StatusCode};
use proptest::prelude::*;

/// Anti-collision frames (NVB below 0x70) sent for one SEL code.
fn anticollision_rounds(chip: &SimChip, sel: PiccCommand) -> usize {
    chip.frames()
        .iter()
        .filter(|f| f.len() >= 2 && f[0] == sel.code() && f[1] != 0x70)
        .count()
}

fn select_frames(chip: &SimChip, sel: PiccCommand) -> usize {
    chip.frames()
        .iter()
        .filter(|f| f.len() == 9 && f[0] == sel.code() && f[1] == 0x70)
        .count()
}

/// The card sending a 1 at the first differing bit (LSB first) wins.
fn expected_winner<'a>(a: &'a [u8], b: &'a [u8]) -> &'a [u8] {
    for (x, y) in a.iter().zip(b) {
        let diff = x ^ y;
        if diff != 0 {
            let lowest = diff & diff.wrapping_neg();
            return if x & lowest != 0 { a } else { b };
        }
    }
    a
}

#[test]
fn every_uid_size_is_activated() {
    let cases: [(&[u8], SimCard); 3] = [
        (&SINGLE_UID, SimCard::mifare_4k(&SINGLE_UID)),
        (&DOUBLE_UID, SimCard::ultralight(&DOUBLE_UID)),
        (&TRIPLE_UID, SimCard::mifare_1k(&TRIPLE_UID)),
    ];
    for (bytes, card) in cases {
        let (chip, mut dev) = reader_with(vec![card]).unwrap();
        let uid = activate(&mut dev).unwrap();
        assert_eq!(uid.as_bytes(), bytes);
        assert_eq!(chip.card_state(0), Some(CardState::Active));
    }
}

#[test]
fn two_cards_are_singulated_one_after_another() {
    let (chip, mut dev) = reader_with(vec![
        SimCard::mifare_1k(&SINGLE_UID),
        SimCard::ultralight(&DOUBLE_UID),
    ])
    .unwrap();

    // the ATQAs differ, so the first REQA reports a collision
    match dev.request_a() {
        Err(Error::Status(StatusCode::Collision)) => {}
        other => panic!("expected collision, got {:?}", other),
    }

    let mut seen = BTreeSet::new();
    let first = dev.read_card_serial().unwrap();
    seen.insert(first.as_bytes().to_vec());
    dev.halt_a().unwrap();

    assert!(dev.is_new_card_present().unwrap());
    let second = dev.read_card_serial().unwrap();
    seen.insert(second.as_bytes().to_vec());
    dev.halt_a().unwrap();

    let expected: BTreeSet<Vec<u8>> = [SINGLE_UID.to_vec(), DOUBLE_UID.to_vec()].into();
    assert_eq!(seen, expected);
    assert_eq!(chip.card_state(0), Some(CardState::Halt));
    assert_eq!(chip.card_state(1), Some(CardState::Halt));

    // both halted: only WUPA gets an answer
    assert!(!dev.is_new_card_present().unwrap());
    assert!(dev.is_card_present().unwrap());
}

#[test]
fn sak_classifies_the_selected_card() {
    let (_chip, mut dev) = reader_with(vec![SimCard::mifare_mini(&SINGLE_UID)]).unwrap();
    let uid = activate(&mut dev).unwrap();
    assert_eq!(uid.sak(), Some(0x09));
    assert_eq!(uid.picc_type(), PiccType::MifareMini);
    assert_eq!(uid.cascade_levels(), 1);
}

#[test]
fn removed_card_is_not_selectable() {
    let (chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    chip.remove_cards();
    assert!(!dev.is_new_card_present().unwrap());
    assert!(dev.read_card_serial().is_err());
}

#[test]
fn collision_in_second_cascade_level_resolves_toward_one() {
    let mut other = DOUBLE_UID;
    other[6] ^= 0x01;
    let (chip, mut dev) = reader_with(vec![
        SimCard::ultralight(&DOUBLE_UID),
        SimCard::ultralight(&other),
    ])
    .unwrap();

    assert_eq!(dev.request_a().unwrap(), [0x44, 0x00]);
    let uid = dev.read_card_serial().unwrap();
    assert_eq!(uid.as_bytes(), expected_winner(&DOUBLE_UID, &other));

    // level 1 carries CT + the shared first three bytes, so it never collides
    assert_eq!(anticollision_rounds(&chip, PiccCommand::SelCl1), 1);
    assert_eq!(select_frames(&chip, PiccCommand::SelCl1), 1);
    let rounds = anticollision_rounds(&chip, PiccCommand::SelCl2);
    assert!((2..=32).contains(&rounds), "{} rounds at level 2", rounds);
    assert_eq!(select_frames(&chip, PiccCommand::SelCl2), 1);
}

#[test]
fn invalid_collision_position_aborts_select() {
    let (chip, mut dev) = reader_with(vec![
        SimCard::mifare_1k(&[0x11, 0x22, 0x33, 0x44]),
        SimCard::mifare_1k(&[0x11, 0x22, 0x33, 0x45]),
    ])
    .unwrap();
    chip.force_collision_register(Some(COLL_POS_NOT_VALID));

    dev.request_a().unwrap();
    let err = dev.read_card_serial().unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::Collision));
    assert_eq!(select_frames(&chip, PiccCommand::SelCl1), 0);
}

#[test]
fn collision_without_progress_is_internal_error() {
    // both UIDs start with a 1 bit and collide at bit 25; the chip keeps
    // claiming bit 1, which is already known after the first round
    let (chip, mut dev) = reader_with(vec![
        SimCard::mifare_1k(&[0x11, 0x22, 0x33, 0x44]),
        SimCard::mifare_1k(&[0x11, 0x22, 0x33, 0x45]),
    ])
    .unwrap();
    chip.force_collision_register(Some(1));

    dev.request_a().unwrap();
    let err = dev.read_card_serial().unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::InternalError));
    assert_eq!(anticollision_rounds(&chip, PiccCommand::SelCl1), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn two_card_select_converges_within_32_rounds(
        a in prop::array::uniform4(any::<u8>()),
        b in prop::array::uniform4(any::<u8>()),
    ) {
        prop_assume!(a != b);
        prop_assume!(a[0] != PiccCommand::CascadeTag.code() && b[0] != PiccCommand::CascadeTag.code());

        let (chip, mut dev) = reader_with(vec![SimCard::mifare_1k(&a), SimCard::mifare_1k(&b)]).unwrap();
        dev.request_a().unwrap();
        let uid = dev.read_card_serial().unwrap();

        prop_assert_eq!(uid.as_bytes(), expected_winner(&a, &b));
        let rounds = anticollision_rounds(&chip, PiccCommand::SelCl1);
        prop_assert!(rounds <= 32, "{} anti-collision rounds", rounds);
        prop_assert_eq!(select_frames(&chip, PiccCommand::SelCl1), 1);
    }
}
