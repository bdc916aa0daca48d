#[path = "../common/mod.rs"]
mod common;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use common::fixtures::SINGLE_UID;
use common::helpers::{fast_session_config, reader_with, session_with};
use libmfrc522::config::SessionConfig;
use libmfrc522::session::{CardSession, SessionState, WaitHandle};
use libmfrc522::test_support::SimCard;
use libmfrc522::transport::InterruptLine;
use libmfrc522::{Error, StatusCode};
use serial_test::serial;

/// Cancel every few milliseconds until told to stop, like a Ctrl-C handler
/// that keeps firing.
fn keep_cancelling(handle: WaitHandle) -> (mpsc::Sender<()>, thread::JoinHandle<()>) {
    let (stop, stopped) = mpsc::channel();
    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        while stopped.try_recv().is_err() {
            handle.cancel();
            thread::sleep(Duration::from_millis(5));
        }
    });
    (stop, worker)
}

#[test]
#[serial]
fn cancel_ends_wait_for_card() {
    let (_chip, mut session) = session_with(vec![]).unwrap();
    let (stop, worker) = keep_cancelling(session.wait_handle());

    let start = Instant::now();
    let result = session.read_text(Some(0x00));
    let _ = stop.send(());
    worker.join().unwrap();

    match result {
        Err(Error::Status(StatusCode::Canceled)) => {}
        other => panic!("expected cancellation, got {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
#[serial]
fn card_arriving_later_is_read() {
    let (chip, mut session) = session_with(vec![]).unwrap();
    let field = chip.clone();
    let placer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(40));
        field.add_card(SimCard::mifare_mini(&SINGLE_UID));
    });
    let (uid, data) = session.read_bytes(Some(0x00)).unwrap();
    placer.join().unwrap();
    assert_eq!(uid.as_bytes(), &SINGLE_UID);
    assert!(data.is_empty());
}

#[test]
#[serial]
fn removal_then_cleanup() {
    let (chip, mut session) = session_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    session.read_bytes(None).unwrap();

    let field = chip.clone();
    let remover = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        field.remove_cards();
    });
    assert!(session.wait_for_card_removed(3).unwrap());
    remover.join().unwrap();

    session.cleanup().unwrap();
    assert!(session.device().is_released());
}

/// Cancel once after `limit` unless stopped first, so a broken wait cannot
/// hang the test run.
fn cancel_after(handle: WaitHandle, limit: Duration) -> (mpsc::Sender<()>, thread::JoinHandle<()>) {
    let (stop, stopped) = mpsc::channel::<()>();
    let worker = thread::spawn(move || {
        if stopped.recv_timeout(limit).is_err() {
            handle.cancel();
        }
    });
    (stop, worker)
}

#[test]
#[serial]
fn polling_sees_answer_that_arrives_after_rearm() {
    let (chip, dev) = reader_with(vec![SimCard::mifare_1k(&SINGLE_UID)]).unwrap();
    // RxIRq appears well after StartSend but within one poll interval
    chip.set_answer_latency(Duration::from_millis(5));
    let config = SessionConfig {
        poll_interval: Duration::from_millis(20),
        ..fast_session_config()
    };
    let mut session = CardSession::new(dev, None, config).unwrap();
    let (stop, worker) = cancel_after(session.wait_handle(), Duration::from_secs(2));

    let fired = session.wait_for_interrupt();
    let _ = stop.send(());
    worker.join().unwrap();

    assert!(fired.unwrap());
    assert_eq!(session.state(), SessionState::CardPresent);
    let uid = session.read_card_serial().unwrap();
    assert_eq!(uid.as_bytes(), &SINGLE_UID);
}

#[test]
#[serial]
fn single_cancel_ends_wait_within_one_poll_interval() {
    let (chip, dev) = reader_with(vec![]).unwrap();
    let poll_interval = Duration::from_secs(1);
    let config = SessionConfig {
        poll_interval,
        ..fast_session_config()
    };
    let irq: Box<dyn InterruptLine> = Box::new(chip.interrupt_line());
    let mut session = CardSession::new(dev, Some(irq), config).unwrap();

    let handle = session.wait_handle();
    let (sent, canceled_at) = mpsc::channel();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        let _ = sent.send(Instant::now());
        handle.cancel();
    });

    let fired = session.wait_for_interrupt().unwrap();
    let returned = Instant::now();
    canceller.join().unwrap();
    let canceled_at = canceled_at.recv().unwrap();

    assert!(!fired);
    assert!(returned.duration_since(canceled_at) < poll_interval);
    assert!(!session.wait_handle().is_interrupt_pending());
    assert!(!session.wait_handle().is_canceled());
    assert_eq!(session.state(), SessionState::Idle);

    // the next wait is not affected by the old cancel
    chip.add_card(SimCard::mifare_1k(&SINGLE_UID));
    assert!(session.wait_for_interrupt().unwrap());
}
