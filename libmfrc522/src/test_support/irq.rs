// libmfrc522/src/test_support/irq.rs

use std::sync::{Arc, Mutex};

use crate::Result;
use crate::test_support::chip::ChipState;
use crate::transport::InterruptLine;

pub(crate) type Callback = Arc<Mutex<Box<dyn FnMut() + Send>>>;

/// Callback registered on the simulated IRQ pin.
#[derive(Default)]
pub(crate) struct IrqSlot {
    callback: Option<Callback>,
}

impl IrqSlot {
    pub(crate) fn callback(&self) -> Option<Callback> {
        self.callback.clone()
    }
}

/// IRQ pin of a [`SimChip`](crate::test_support::SimChip). The callback
/// runs on the thread that performed the SPI transfer raising RxIRq.
#[derive(Clone)]
pub struct SimInterruptLine {
    chip: Arc<Mutex<ChipState>>,
}

impl SimInterruptLine {
    pub(crate) fn new(chip: Arc<Mutex<ChipState>>) -> Self {
        Self { chip }
    }

    fn set(&self, callback: Option<Callback>) {
        let mut st = self.chip.lock().unwrap_or_else(|e| e.into_inner());
        st.irq.callback = callback;
    }

    pub fn is_armed(&self) -> bool {
        let st = self.chip.lock().unwrap_or_else(|e| e.into_inner());
        st.irq.callback.is_some()
    }
}

impl InterruptLine for SimInterruptLine {
    fn on_falling_edge(&mut self, callback: Box<dyn FnMut() + Send>) -> Result<()> {
        self.set(Some(Arc::new(Mutex::new(callback))));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.set(None);
        Ok(())
    }
}
