// libmfrc522/src/session/wait.rs

//! Interrupt and cancellation flags shared by the waiting thread, the IRQ
//! callback thread and any thread that wants to abort a wait.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct Flags {
    interrupt: bool,
    canceled: bool,
}

/// Why [`WaitHandle::wait_timeout`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Interrupt,
    Canceled,
    TimedOut,
}

/// Cloneable handle onto the two wait flags. Clones share state, so one
/// copy can live in the IRQ callback and another in a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct WaitHandle {
    inner: Arc<(Mutex<Flags>, Condvar)>,
}

impl WaitHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.inner.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, update: impl FnOnce(&mut Flags)) {
        let mut flags = self.lock();
        update(&mut flags);
        self.inner.1.notify_all();
    }

    /// Called from the falling-edge callback.
    pub fn signal_interrupt(&self) {
        self.set(|f| f.interrupt = true);
    }

    /// Abort the wait in progress. Idempotent.
    pub fn cancel(&self) {
        self.set(|f| f.canceled = true);
    }

    pub fn is_interrupt_pending(&self) -> bool {
        self.lock().interrupt
    }

    pub fn is_canceled(&self) -> bool {
        self.lock().canceled
    }

    /// Clear both flags.
    pub fn reset(&self) {
        let mut flags = self.lock();
        *flags = Flags::default();
    }

    /// Block until the interrupt fires, the wait is canceled or `timeout`
    /// elapses. Cancellation wins when both flags are set.
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        let guard = self.lock();
        let (flags, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |f| !f.interrupt && !f.canceled)
            .unwrap_or_else(|e| e.into_inner());
        if flags.canceled {
            WaitOutcome::Canceled
        } else if flags.interrupt {
            WaitOutcome::Interrupt
        } else {
            WaitOutcome::TimedOut
        }
    }

    /// Sleep for `timeout` unless canceled first. Returns `true` when canceled.
    pub fn sleep_unless_canceled(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (flags, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |f| !f.canceled)
            .unwrap_or_else(|e| e.into_inner());
        flags.canceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn times_out_without_signal() {
        let handle = WaitHandle::new();
        assert_eq!(handle.wait_timeout(Duration::from_millis(5)), WaitOutcome::TimedOut);
    }

    #[test]
    fn pending_interrupt_returns_immediately() {
        let handle = WaitHandle::new();
        handle.signal_interrupt();
        assert!(handle.is_interrupt_pending());
        assert_eq!(handle.wait_timeout(Duration::from_secs(5)), WaitOutcome::Interrupt);
    }

    #[test]
    fn cancel_wins_over_interrupt() {
        let handle = WaitHandle::new();
        handle.signal_interrupt();
        handle.cancel();
        handle.cancel();
        assert_eq!(handle.wait_timeout(Duration::from_secs(5)), WaitOutcome::Canceled);
        handle.reset();
        assert!(!handle.is_canceled());
        assert!(!handle.is_interrupt_pending());
    }

    #[test]
    fn cancel_from_other_thread_wakes_waiter() {
        let handle = WaitHandle::new();
        let remote = handle.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });
        let start = Instant::now();
        assert!(handle.sleep_unless_canceled(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();
    }
}
