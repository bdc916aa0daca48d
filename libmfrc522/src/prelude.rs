// libmfrc522/src/prelude.rs

pub use crate::card::{PiccType, SectorDefinition};
pub use crate::config::{ReaderConfig, SessionConfig};
pub use crate::device::{Device, FirmwareVersion, Initialized, PcdCommand, Register, RxGain, Uninitialized};
pub use crate::protocol::PiccCommand;
pub use crate::session::{CardSession, DecodeErrors, SessionState, TextEncoding, WaitHandle};
pub use crate::transport::{InterruptLine, ResetLine, Transport};
pub use crate::{Error, MifareKey, Result, StatusCode, Uid, ValueBlock};

pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms, parse_hex};
