// libmfrc522/src/protocol/commands/mod.rs

pub mod mifare;

pub use mifare::{
    encode_authenticate, encode_halt, encode_read, encode_two_step, encode_ultralight_write,
    encode_write,
};

use derive_more::Display;

/// Commands sent over RF to the PICC. Frame encoders for the commands that
/// carry arguments live in `protocol::commands::<family>.rs`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PiccCommand {
    /// REQuest command, Type A. 7 bit frame.
    Reqa = 0x26,
    /// Wake-UP command, Type A. 7 bit frame.
    Wupa = 0x52,
    /// Cascade Tag, used as a UID placeholder during anti-collision.
    CascadeTag = 0x88,
    SelCl1 = 0x93,
    SelCl2 = 0x95,
    SelCl3 = 0x97,
    /// HaLT command, Type A.
    Hlta = 0x50,
    /// Request for Answer To Select (ISO 14443-4).
    Rats = 0xE0,
    MfAuthKeyA = 0x60,
    MfAuthKeyB = 0x61,
    MfRead = 0x30,
    MfWrite = 0xA0,
    MfDecrement = 0xC0,
    MfIncrement = 0xC1,
    MfRestore = 0xC2,
    MfTransfer = 0xB0,
    UlWrite = 0xA2,
}

impl PiccCommand {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<PiccCommand> {
        let cmd = match code {
            0x26 => PiccCommand::Reqa,
            0x52 => PiccCommand::Wupa,
            0x88 => PiccCommand::CascadeTag,
            0x93 => PiccCommand::SelCl1,
            0x95 => PiccCommand::SelCl2,
            0x97 => PiccCommand::SelCl3,
            0x50 => PiccCommand::Hlta,
            0xE0 => PiccCommand::Rats,
            0x60 => PiccCommand::MfAuthKeyA,
            0x61 => PiccCommand::MfAuthKeyB,
            0x30 => PiccCommand::MfRead,
            0xA0 => PiccCommand::MfWrite,
            0xC0 => PiccCommand::MfDecrement,
            0xC1 => PiccCommand::MfIncrement,
            0xC2 => PiccCommand::MfRestore,
            0xB0 => PiccCommand::MfTransfer,
            0xA2 => PiccCommand::UlWrite,
            _ => return None,
        };
        Some(cmd)
    }

    /// SEL byte for cascade level 1..=3.
    pub fn select_for_level(level: u8) -> Option<PiccCommand> {
        match level {
            1 => Some(PiccCommand::SelCl1),
            2 => Some(PiccCommand::SelCl2),
            3 => Some(PiccCommand::SelCl3),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PiccCommand::Reqa => "invites PICCs in state IDLE to go to READY",
            PiccCommand::Wupa => "invites PICCs in state IDLE and HALT to go to READY",
            PiccCommand::CascadeTag => "cascade tag, used during anti collision",
            PiccCommand::SelCl1 => "anti collision/select, cascade level 1",
            PiccCommand::SelCl2 => "anti collision/select, cascade level 2",
            PiccCommand::SelCl3 => "anti collision/select, cascade level 3",
            PiccCommand::Hlta => "instructs an ACTIVE PICC to go to state HALT",
            PiccCommand::Rats => "request command for answer to reset",
            PiccCommand::MfAuthKeyA => "perform authentication with key A",
            PiccCommand::MfAuthKeyB => "perform authentication with key B",
            PiccCommand::MfRead => "reads one 16 byte block from the authenticated sector",
            PiccCommand::MfWrite => "writes one 16 byte block to the authenticated sector",
            PiccCommand::MfDecrement => "decrements a block into the internal data register",
            PiccCommand::MfIncrement => "increments a block into the internal data register",
            PiccCommand::MfRestore => "reads a block into the internal data register",
            PiccCommand::MfTransfer => "writes the internal data register to a block",
            PiccCommand::UlWrite => "writes one 4 byte page to the PICC",
        }
    }
}
