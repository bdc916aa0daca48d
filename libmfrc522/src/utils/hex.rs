// libmfrc522/src/utils/hex.rs

//! Hex formatting for UIDs, FIFO dumps and log lines.

use std::fmt::Write;

use crate::{Error, Result};

/// Lower-case hex without separators: `&[0xde, 0xad]` -> `"dead"`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Lower-case hex, one space between bytes: `&[0xde, 0xad]` -> `"de ad"`.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Parse hex with optional whitespace, e.g. a key given on the command line
/// as `"FF FF FF FF FF FF"`.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(Error::Decode(format!("odd number of hex digits in {:?}", s)));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|e| Error::Decode(e.to_string()))?;
            u8::from_str_radix(text, 16)
                .map_err(|e| Error::Decode(format!("invalid hex pair {:?}: {}", text, e)))
        })
        .collect()
}
