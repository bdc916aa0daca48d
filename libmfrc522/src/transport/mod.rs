// libmfrc522/src/transport/mod.rs

pub mod mock;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod traits;

pub use mock::{MockResetLine, MockTransport};
#[cfg(feature = "rpi")]
pub use rpi::{RpiInterruptLine, RpiResetLine, RpiSpiTransport};
pub use traits::{InterruptLine, ResetLine, Transport};
