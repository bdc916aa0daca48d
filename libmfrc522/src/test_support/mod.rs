// libmfrc522/src/test_support/mod.rs

//! In-memory MFRC522 and cards for tests, benches and demos without
//! hardware.
#![doc(hidden)]

pub mod card;
pub mod chip;
pub mod irq;

pub use card::{CardState, SimCard};
pub use chip::SimChip;
pub use irq::SimInterruptLine;
