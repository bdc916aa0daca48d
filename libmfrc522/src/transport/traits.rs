// libmfrc522/src/transport/traits.rs

use crate::Result;

/// Transport trait abstracts the SPI link away from register/protocol logic.
///
/// `exchange` is full duplex: the returned buffer has the same length as
/// `out`, byte `i` being what the chip shifted out while byte `i` was sent.
pub trait Transport: Send {
    /// Clock `out` to the chip and return the bytes clocked back.
    fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>>;

    /// Open/configure the underlying bus. Default is a no-op for transports
    /// that are ready on construction.
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the bus. Must tolerate being called more than once.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Digital line wired to the chip's NRSTPD pin.
pub trait ResetLine: Send {
    /// Observe the line. Low means the chip is in hard power-down.
    fn is_low(&mut self) -> Result<bool>;

    fn set_low(&mut self) -> Result<()>;

    fn set_high(&mut self) -> Result<()>;

    /// Give the pin back to the system.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Edge-triggered input wired to the chip's IRQ pin.
pub trait InterruptLine: Send {
    /// Register `callback` for falling edges. The callback runs on a thread
    /// owned by the implementation.
    fn on_falling_edge(&mut self, callback: Box<dyn FnMut() + Send>) -> Result<()>;

    /// Remove the callback and give the pin back to the system.
    fn release(&mut self) -> Result<()>;
}
