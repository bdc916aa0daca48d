// libmfrc522/src/device/mod.rs

pub mod access;
pub mod builder;
pub mod communicate;
pub mod control;
pub mod crc;
pub mod handle;
pub mod registers;
pub mod selftest;

pub use builder::DeviceBuilder;
pub use communicate::{Exchange, Framing};
pub use control::FirmwareVersion;
pub use handle::{Device, Initialized, Uninitialized};
pub use registers::{PcdCommand, Register, RxGain};
