// libmfrc522/src/session/text.rs

//! Text codecs for `read_text` / `write_text`.

use derive_more::Display;

use crate::{Error, Result};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    #[default]
    #[display(fmt = "utf-8")]
    Utf8,
    #[display(fmt = "ascii")]
    Ascii,
    #[display(fmt = "latin-1")]
    Latin1,
}

/// What to do with bytes or characters the encoding cannot represent.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeErrors {
    /// Fail with `Error::Decode`.
    #[display(fmt = "strict")]
    Strict,
    /// Drop them.
    #[default]
    #[display(fmt = "ignore")]
    Ignore,
    /// U+FFFD when decoding, `?` when encoding.
    #[display(fmt = "replace")]
    Replace,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8], errors: DecodeErrors) -> Result<String> {
        match self {
            TextEncoding::Utf8 => decode_utf8(bytes, errors),
            TextEncoding::Ascii => {
                let mut out = String::with_capacity(bytes.len());
                for (i, &b) in bytes.iter().enumerate() {
                    if b.is_ascii() {
                        out.push(b as char);
                        continue;
                    }
                    match errors {
                        DecodeErrors::Strict => {
                            return Err(Error::Decode(format!(
                                "byte {:#04x} at offset {} is not ascii",
                                b, i
                            )));
                        }
                        DecodeErrors::Ignore => {}
                        DecodeErrors::Replace => out.push(char::REPLACEMENT_CHARACTER),
                    }
                }
                Ok(out)
            }
            // every byte maps to U+0000..U+00FF
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn encode(self, text: &str, errors: DecodeErrors) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => encode_narrow(text, 0x7F, errors, self),
            TextEncoding::Latin1 => encode_narrow(text, 0xFF, errors, self),
        }
    }
}

fn decode_utf8(bytes: &[u8], errors: DecodeErrors) -> Result<String> {
    match errors {
        DecodeErrors::Strict => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Decode(format!("invalid utf-8: {}", e))),
        DecodeErrors::Replace => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DecodeErrors::Ignore => {
            let mut out = String::with_capacity(bytes.len());
            let mut rest = bytes;
            loop {
                match std::str::from_utf8(rest) {
                    Ok(valid) => {
                        out.push_str(valid);
                        return Ok(out);
                    }
                    Err(e) => {
                        let (valid, after) = rest.split_at(e.valid_up_to());
                        // valid_up_to guarantees this prefix is utf-8
                        out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                        let skip = e.error_len().unwrap_or(after.len());
                        rest = &after[skip..];
                    }
                }
            }
        }
    }
}

fn encode_narrow(text: &str, max: u32, errors: DecodeErrors, encoding: TextEncoding) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= max {
            out.push(code as u8);
            continue;
        }
        match errors {
            DecodeErrors::Strict => {
                return Err(Error::Decode(format!(
                    "character {:?} cannot be encoded as {}",
                    c, encoding
                )));
            }
            DecodeErrors::Ignore => {}
            DecodeErrors::Replace => out.push(b'?'),
        }
    }
    Ok(out)
}
