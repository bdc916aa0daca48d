// libmfrc522/src/protocol/checksum.rs

/// Compute CRC_A (ISO/IEC 14443-3, preset 0x6363, reflected poly 0x8408).
/// Returned low byte first, the order in which it is transmitted.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0x6363;
    for &b in data {
        let mut ch = b ^ (crc & 0xFF) as u8;
        ch ^= ch << 4;
        let ch = ch as u16;
        crc = (crc >> 8) ^ (ch << 8) ^ (ch << 3) ^ (ch >> 4);
    }
    crc.to_le_bytes()
}

/// Block Check Character of an anti-collision frame: XOR of the four
/// UID/CT bytes.
pub fn bcc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// True when the last two bytes of `frame` are the CRC_A of the rest.
pub fn check_crc_a(frame: &[u8]) -> bool {
    if frame.len() < 2 {
        return false;
    }
    let (body, tail) = frame.split_at(frame.len() - 2);
    crc_a(body) == [tail[0], tail[1]]
}
