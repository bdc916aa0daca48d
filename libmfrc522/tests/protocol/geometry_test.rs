use libmfrc522::card::PiccType;
use libmfrc522::Uid;
use proptest::prelude::*;

#[test]
fn capacities() {
    assert_eq!(PiccType::MifareMini.max_data_bytes(), 224);
    assert_eq!(PiccType::Mifare1K.max_data_bytes(), 752);
    assert_eq!(PiccType::Mifare4K.max_data_bytes(), 3440);
    assert_eq!(PiccType::MifareUltralight.max_data_bytes(), 0);
}

#[test]
fn sak_classification() {
    let cases = [
        (0x09, PiccType::MifareMini),
        (0x08, PiccType::Mifare1K),
        (0x18, PiccType::Mifare4K),
        (0x98, PiccType::Mifare4K),
        (0x00, PiccType::MifareUltralight),
        (0x20, PiccType::Iso14443_4),
        (0xA0, PiccType::Iso14443_4),
        (0x04, PiccType::NotComplete),
        (0x7F, PiccType::Unknown),
    ];
    for (sak, expected) in cases {
        assert_eq!(PiccType::from_sak(Some(sak)), expected, "sak {:#04x}", sak);
    }
    assert_eq!(PiccType::from_sak(None), PiccType::Unknown);
}

#[test]
fn number_of_double_size_uid() {
    let uid = Uid::from_bytes(&[0x04, 0x1F, 0x2E, 0x3D, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(uid.to_number(), 0x041F_2E3D_00);
}

proptest! {
    #[test]
    fn sectors_tile_the_4k_card(sector in 0u8..40) {
        let def = PiccType::Mifare4K.sector_definition(sector).unwrap();
        let blocks: Vec<u8> = def.data_blocks().collect();
        prop_assert_eq!(blocks.len(), def.data_block_count as usize);
        prop_assert_eq!(*blocks.last().unwrap() + 1, def.trailer_block);
        if sector < 39 {
            let next = PiccType::Mifare4K.sector_definition(sector + 1).unwrap();
            prop_assert_eq!(next.first_block(), def.trailer_block + 1);
        }
    }

    #[test]
    fn no_sector_past_the_end(sector in 16u8..=255) {
        prop_assert!(PiccType::Mifare1K.sector_definition(sector).is_none());
    }

    #[test]
    fn single_size_uid_number(bytes in any::<[u8; 4]>()) {
        let uid = Uid::from_bytes(&bytes).unwrap();
        prop_assert_eq!(uid.to_number(), (u32::from_be_bytes(bytes) as u64) << 8);
    }
}
