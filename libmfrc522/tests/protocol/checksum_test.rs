use libmfrc522::protocol::{bcc, check_crc_a, crc_a};
use proptest::prelude::*;

#[test]
fn crc_of_select_frame() {
    // SEL CL1, NVB 0x70, UID DE AD BE EF, BCC
    let mut frame = vec![0x93, 0x70, 0xDE, 0xAD, 0xBE, 0xEF];
    frame.push(bcc(&frame[2..6]));
    assert_eq!(frame[6], 0x22);
    let crc = crc_a(&frame);
    frame.extend_from_slice(&crc);
    assert!(check_crc_a(&frame));
}

#[test]
fn short_frames_never_check() {
    assert!(!check_crc_a(&[]));
    assert!(!check_crc_a(&[0x63]));
    // CRC of the empty message is the preset
    assert!(check_crc_a(&[0x63, 0x63]));
}

proptest! {
    #[test]
    fn appended_crc_checks(data in prop::collection::vec(any::<u8>(), 0..62)) {
        let mut frame = data.clone();
        frame.extend_from_slice(&crc_a(&data));
        prop_assert!(check_crc_a(&frame));
    }

    #[test]
    fn single_byte_corruption_is_detected(
        data in prop::collection::vec(any::<u8>(), 1..30),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut frame = data.clone();
        frame.extend_from_slice(&crc_a(&data));
        let i = index.index(frame.len());
        frame[i] ^= flip;
        prop_assert!(!check_crc_a(&frame));
    }
}
