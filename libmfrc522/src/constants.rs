// libmfrc522/src/constants.rs
//! Chip and protocol constants used across the crate

/// Size of the chip's FIFO buffer in bytes
pub const FIFO_SIZE: usize = 64;

/// Iterations of the CRC coprocessor completion poll
pub const CRC_POLL_LIMIT: usize = 255;

/// Iterations of the command completion (ComIrqReg) poll
pub const COMMAND_POLL_LIMIT: usize = 125;

/// Iterations of the self-test FIFO fill poll
pub const SELF_TEST_POLL_LIMIT: usize = 255;

/// Iterations of the wake-up poll after leaving soft power-down
pub const POWER_UP_POLL_LIMIT: usize = 125;

/// Soft reset: number of 50 ms waits for the PowerDown bit to clear
pub const SOFT_RESET_ATTEMPTS: usize = 3;
pub const SOFT_RESET_WAIT_MS: u64 = 50;

/// Hard reset: low pulse length and settle time
pub const HARD_RESET_PULSE_US: u64 = 2;
pub const HARD_RESET_SETTLE_MS: u64 = 50;

/// MIFARE Classic 4-bit acknowledge. Any other value is a NAK.
pub const MF_ACK: u8 = 0x0A;

/// Crypto1 key length
pub const MF_KEY_SIZE: usize = 6;

/// MIFARE block length
pub const MF_BLOCK_SIZE: usize = 16;

/// MIFARE Ultralight page length
pub const UL_PAGE_SIZE: usize = 4;

/// Number of pages on an original MIFARE Ultralight
pub const UL_PAGE_COUNT: u8 = 16;

/// Largest UID (triple size)
pub const UID_MAX_SIZE: usize = 10;

/// Highest accepted `known_bits` for select
pub const SELECT_MAX_KNOWN_BITS: u8 = 80;

/// Bits in one cascade level (4 UID/CT bytes)
pub const CASCADE_LEVEL_BITS: u8 = 32;

/// ComIrqReg bits
pub const IRQ_TIMER: u8 = 0x01;
pub const IRQ_IDLE: u8 = 0x10;
pub const IRQ_RX: u8 = 0x20;
pub const IRQ_ALL: u8 = 0x7F;

/// DivIrqReg CRCIRq bit
pub const DIV_IRQ_CRC: u8 = 0x04;

/// ErrorReg bits
pub const ERR_PROTOCOL: u8 = 0x01;
pub const ERR_PARITY: u8 = 0x02;
pub const ERR_COLL: u8 = 0x08;
pub const ERR_BUFFER_OVFL: u8 = 0x10;

/// CollReg bits
pub const COLL_VALUES_AFTER_COLL: u8 = 0x80;
pub const COLL_POS_NOT_VALID: u8 = 0x20;
pub const COLL_POS_MASK: u8 = 0x1F;

/// FIFOLevelReg FlushBuffer bit
pub const FIFO_FLUSH: u8 = 0x80;

/// BitFramingReg StartSend bit
pub const BIT_FRAMING_START_SEND: u8 = 0x80;

/// CommandReg PowerDown bit
pub const COMMAND_POWER_DOWN: u8 = 0x10;

/// Status2Reg MFCrypto1On bit
pub const STATUS2_CRYPTO1_ON: u8 = 0x08;

/// TxControlReg Tx1RFEn | Tx2RFEn
pub const TX_CONTROL_ANTENNA: u8 = 0x03;

/// RFCfgReg RxGain field
pub const RF_CFG_RX_GAIN_MASK: u8 = 0x07 << 4;

/// ComIEnReg value used while waiting for a card: IRqInv | RxIEn
pub const COM_IEN_RX_INVERTED: u8 = 0xA0;

/// BitFramingReg value used while waiting for a card: StartSend, 7-bit frame
pub const BIT_FRAMING_SHORT_FRAME_START: u8 = 0x87;

/// Register values programmed by `initialize`
pub const INIT_MOD_WIDTH: u8 = 0x26;
pub const INIT_T_MODE: u8 = 0x80;
pub const INIT_T_PRESCALER: u8 = 0xA9;
pub const INIT_T_RELOAD_H: u8 = 0x03;
pub const INIT_T_RELOAD_L: u8 = 0xE8;
pub const INIT_TX_ASK: u8 = 0x40;
pub const INIT_MODE: u8 = 0x3D;

/// AutoTestReg value enabling the digital self-test
pub const AUTO_TEST_ENABLE: u8 = 0x09;
