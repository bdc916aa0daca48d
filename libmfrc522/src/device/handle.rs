// libmfrc522/src/device/handle.rs

use std::marker::PhantomData;
use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use crate::constants::{
    HARD_RESET_PULSE_US, HARD_RESET_SETTLE_MS, INIT_MOD_WIDTH, INIT_MODE, INIT_T_MODE,
    INIT_T_PRESCALER, INIT_T_RELOAD_H, INIT_T_RELOAD_L, INIT_TX_ASK,
};
use crate::device::registers::Register;
use crate::transport::{ResetLine, Transport};
use crate::Result;

/// Type-state markers
pub struct Uninitialized;
pub struct Initialized;

/// Reader handle that enforces initialization state at compile time.
///
/// Register, CRC and power helpers work in both states; talking to cards
/// requires `Device<Initialized>`. The handle is not internally
/// synchronized: callers sharing it across threads must serialize access.
pub struct Device<State = Uninitialized> {
    pub(crate) transport: Box<dyn Transport>,
    reset: Option<Box<dyn ResetLine>>,
    released: bool,
    _state: PhantomData<State>,
}

impl<State> Device<State> {
    /// Release the reset pin and close the transport. Safe to call more
    /// than once and after a failed `initialize`.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("releasing reader resources");
        let pin = match self.reset.as_mut() {
            Some(line) => line.release(),
            None => Ok(()),
        };
        let bus = self.transport.close();
        pin.and(bus)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn into_state<Next>(self) -> Device<Next> {
        Device {
            transport: self.transport,
            reset: self.reset,
            released: self.released,
            _state: PhantomData,
        }
    }
}

impl Device<Uninitialized> {
    /// Create a Device from an existing Transport instance.
    pub fn new_with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            reset: None,
            released: false,
            _state: PhantomData,
        }
    }

    /// Attach the line wired to NRSTPD. Without one, `initialize` always
    /// soft-resets.
    pub fn with_reset_line(mut self, line: Box<dyn ResetLine>) -> Self {
        self.reset = Some(line);
        self
    }

    /// Open the transport, reset the chip, program the timer and
    /// modulation registers and switch the antenna on.
    ///
    /// On failure the transport and pins are released before the error is
    /// returned.
    pub fn initialize(mut self) -> Result<Device<Initialized>> {
        match self.bring_up() {
            Ok(()) => {
                info!("reader initialized");
                Ok(self.into_state())
            }
            Err(e) => {
                error!("reader initialization failed: {}", e);
                let _ = self.cleanup();
                Err(e)
            }
        }
    }

    fn bring_up(&mut self) -> Result<()> {
        self.transport.open()?;

        let mut hard_reset = false;
        if let Some(line) = self.reset.as_mut() {
            if line.is_low()? {
                debug!("chip is in power down mode, triggering a hard reset");
                line.set_low()?;
                thread::sleep(Duration::from_micros(HARD_RESET_PULSE_US));
                line.set_high()?;
                thread::sleep(Duration::from_millis(HARD_RESET_SETTLE_MS));
                hard_reset = true;
            }
        }
        if !hard_reset {
            debug!("chip is not in power down mode, performing a soft reset");
            self.soft_reset()?;
        }

        // 106 kBd both ways, default modulation width
        self.write_register(Register::TxMode, 0x00)?;
        self.write_register(Register::RxMode, 0x00)?;
        self.write_register(Register::ModWidth, INIT_MOD_WIDTH)?;

        // TAuto, f_timer = 13.56 MHz / (2 * 169 + 1) = 40 kHz, 25 ms timeout
        self.write_register(Register::TMode, INIT_T_MODE)?;
        self.write_register(Register::TPrescaler, INIT_T_PRESCALER)?;
        self.write_register(Register::TReloadH, INIT_T_RELOAD_H)?;
        self.write_register(Register::TReloadL, INIT_T_RELOAD_L)?;

        // 100 % ASK, CRC preset 0x6363
        self.write_register(Register::TxAsk, INIT_TX_ASK)?;
        self.write_register(Register::Mode, INIT_MODE)?;

        self.antenna_on()
    }
}
