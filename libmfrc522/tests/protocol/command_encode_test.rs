#[path = "../common/mod.rs"]
mod common;

use libmfrc522::protocol::{
    encode_authenticate, encode_halt, encode_read, encode_two_step, encode_ultralight_write,
    PiccCommand,
};
use libmfrc522::{MifareKey, Uid};

#[test]
fn command_codes_resolve_back() {
    for cmd in [
        PiccCommand::Reqa,
        PiccCommand::Wupa,
        PiccCommand::SelCl2,
        PiccCommand::MfAuthKeyA,
        PiccCommand::MfTransfer,
        PiccCommand::UlWrite,
    ] {
        assert_eq!(PiccCommand::from_code(cmd.code()), Some(cmd));
    }
    assert_eq!(PiccCommand::from_code(0x00), None);
}

#[test]
fn short_frames() {
    assert_eq!(encode_halt(), [0x50, 0x00]);
    assert_eq!(encode_read(4), [0x30, 0x04]);
    assert_eq!(encode_two_step(PiccCommand::MfDecrement, 9), [0xC0, 0x09]);
    assert_eq!(
        encode_ultralight_write(5, &[1, 2, 3, 4]),
        [0xA2, 0x05, 1, 2, 3, 4]
    );
}

#[test]
fn authenticate_with_triple_size_uid() {
    let uid = Uid::from_bytes(&common::fixtures::TRIPLE_UID).unwrap();
    let key = common::fixtures::custom_key();
    let frame = encode_authenticate(PiccCommand::MfAuthKeyA, 63, &key, &uid);
    assert_eq!(frame[..2], [0x60, 63]);
    assert_eq!(&frame[2..8], key.as_bytes());
    assert_eq!(frame[8..], [0x66, 0x77, 0x99, 0xAA]);
    assert_ne!(key, MifareKey::FACTORY);
}
