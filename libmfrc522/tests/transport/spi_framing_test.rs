use libmfrc522::device::{Device, Register};
use libmfrc522::transport::{MockResetLine, MockTransport, Transport};
use libmfrc522::Error;

#[test]
fn register_write_and_read_bytes() {
    let probe = MockTransport::new();
    let mut dev = Device::new_with_transport(Box::new(probe.clone()));
    dev.write_register(Register::TPrescaler, 0xA9).unwrap();
    probe.push_response(vec![0x00, 0x92]);
    assert_eq!(dev.read_register(Register::Version).unwrap(), 0x92);
    assert_eq!(probe.sent(), vec![vec![0x56, 0xA9], vec![0xEE, 0x00]]);
}

#[test]
fn block_read_repeats_the_address() {
    let probe = MockTransport::new();
    let mut dev = Device::new_with_transport(Box::new(probe.clone()));
    probe.push_response(vec![0x00, 0x11, 0x22, 0x33]);
    let data = dev.read_register_block(Register::FifoData, 3, 0).unwrap();
    assert_eq!(data, vec![0x11, 0x22, 0x33]);
    assert_eq!(probe.last_sent(), Some(vec![0x92, 0x92, 0x92, 0x00]));
}

#[test]
fn bus_failure_propagates() {
    let probe = MockTransport::new();
    probe.set_failures(1);
    let mut dev = Device::new_with_transport(Box::new(probe.clone()));
    match dev.read_register(Register::Version) {
        Err(Error::Transport(_)) => {}
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(dev.read_register(Register::Version).is_ok());
}

#[test]
fn hard_reset_when_chip_is_powered_down() {
    let probe = MockTransport::new();
    let line = MockResetLine::new(true);
    let mut dev = Device::new_with_transport(Box::new(probe.clone()))
        .with_reset_line(Box::new(line.clone()))
        .initialize()
        .unwrap();
    assert_eq!(line.driven(), vec![false, true]);
    // no SoftReset command was issued
    assert!(!probe.sent().contains(&vec![0x02, 0x0F]));

    dev.cleanup().unwrap();
    assert_eq!(line.release_count(), 1);
    assert_eq!(probe.close_count(), 1);

    let mut boxed: Box<dyn Transport> = Box::new(probe.clone());
    boxed.close().unwrap();
    assert_eq!(probe.close_count(), 2);
}
