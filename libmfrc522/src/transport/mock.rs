// libmfrc522/src/transport/mock.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transport::traits::{ResetLine, Transport};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
    opened: usize,
    closed: usize,
    failures: usize,
}

/// Mock transport for unit tests. It records sent frames and returns queued
/// responses; when the queue is empty it answers with zeros.
///
/// Clones share state, so a test can keep one handle for assertions after
/// handing the other to a `Device`.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push_response(&self, resp: Vec<u8>) {
        self.lock().responses.push_back(resp);
    }

    /// Make the next `n` exchanges fail with `Error::Transport`.
    pub fn set_failures(&self, n: usize) {
        self.lock().failures = n;
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.lock().sent.last().cloned()
    }

    pub fn clear_sent(&self) {
        self.lock().sent.clear();
    }

    pub fn open_count(&self) -> usize {
        self.lock().opened
    }

    pub fn close_count(&self) -> usize {
        self.lock().closed
    }
}

impl Transport for MockTransport {
    fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>> {
        let mut st = self.lock();
        if st.failures > 0 {
            st.failures -= 1;
            return Err(Error::Transport("mock failure".to_string()));
        }
        st.sent.push(out.to_vec());
        match st.responses.pop_front() {
            Some(mut resp) => {
                resp.resize(out.len(), 0);
                Ok(resp)
            }
            None => Ok(vec![0; out.len()]),
        }
    }

    fn open(&mut self) -> Result<()> {
        self.lock().opened += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.lock().closed += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ResetState {
    low: bool,
    pulses: Vec<bool>,
    released: usize,
}

/// Reset line double: reports a configurable level and records every edge
/// driven onto it.
#[derive(Debug, Default, Clone)]
pub struct MockResetLine {
    state: Arc<Mutex<ResetState>>,
}

impl MockResetLine {
    /// `low == true` simulates a chip held in hard power-down.
    pub fn new(low: bool) -> Self {
        let line = Self::default();
        line.lock().low = low;
        line
    }

    fn lock(&self) -> MutexGuard<'_, ResetState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Levels driven so far, `false` = low, `true` = high.
    pub fn driven(&self) -> Vec<bool> {
        self.lock().pulses.clone()
    }

    pub fn release_count(&self) -> usize {
        self.lock().released
    }
}

impl ResetLine for MockResetLine {
    fn is_low(&mut self) -> Result<bool> {
        Ok(self.lock().low)
    }

    fn set_low(&mut self) -> Result<()> {
        let mut st = self.lock();
        st.low = true;
        st.pulses.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<()> {
        let mut st = self.lock();
        st.low = false;
        st.pulses.push(true);
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.lock().released += 1;
        Ok(())
    }
}
