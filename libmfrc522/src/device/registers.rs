// libmfrc522/src/device/registers.rs

use derive_more::Display;

/// MFRC522 registers (datasheet chapter 9). Addresses are unshifted; the
/// SPI address byte is produced by [`Register::write_address`] and
/// [`Register::read_address`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    Command = 0x01,
    ComIEn = 0x02,
    DivIEn = 0x03,
    ComIrq = 0x04,
    DivIrq = 0x05,
    Error = 0x06,
    Status1 = 0x07,
    Status2 = 0x08,
    FifoData = 0x09,
    FifoLevel = 0x0A,
    WaterLevel = 0x0B,
    Control = 0x0C,
    BitFraming = 0x0D,
    Coll = 0x0E,
    Mode = 0x11,
    TxMode = 0x12,
    RxMode = 0x13,
    TxControl = 0x14,
    TxAsk = 0x15,
    TxSel = 0x16,
    RxSel = 0x17,
    RxThreshold = 0x18,
    Demod = 0x19,
    MfTx = 0x1C,
    MfRx = 0x1D,
    SerialSpeed = 0x1F,
    CrcResultH = 0x21,
    CrcResultL = 0x22,
    ModWidth = 0x24,
    RfCfg = 0x26,
    GsN = 0x27,
    CwGsP = 0x28,
    ModGsP = 0x29,
    TMode = 0x2A,
    TPrescaler = 0x2B,
    TReloadH = 0x2C,
    TReloadL = 0x2D,
    TCounterValueH = 0x2E,
    TCounterValueL = 0x2F,
    TestSel1 = 0x31,
    TestSel2 = 0x32,
    TestPinEn = 0x33,
    TestPinValue = 0x34,
    TestBus = 0x35,
    AutoTest = 0x36,
    Version = 0x37,
    AnalogTest = 0x38,
    TestDac1 = 0x39,
    TestDac2 = 0x3A,
    TestAdc = 0x3B,
}

impl Register {
    pub const ALL: [Register; 50] = [
        Register::Command,
        Register::ComIEn,
        Register::DivIEn,
        Register::ComIrq,
        Register::DivIrq,
        Register::Error,
        Register::Status1,
        Register::Status2,
        Register::FifoData,
        Register::FifoLevel,
        Register::WaterLevel,
        Register::Control,
        Register::BitFraming,
        Register::Coll,
        Register::Mode,
        Register::TxMode,
        Register::RxMode,
        Register::TxControl,
        Register::TxAsk,
        Register::TxSel,
        Register::RxSel,
        Register::RxThreshold,
        Register::Demod,
        Register::MfTx,
        Register::MfRx,
        Register::SerialSpeed,
        Register::CrcResultH,
        Register::CrcResultL,
        Register::ModWidth,
        Register::RfCfg,
        Register::GsN,
        Register::CwGsP,
        Register::ModGsP,
        Register::TMode,
        Register::TPrescaler,
        Register::TReloadH,
        Register::TReloadL,
        Register::TCounterValueH,
        Register::TCounterValueL,
        Register::TestSel1,
        Register::TestSel2,
        Register::TestPinEn,
        Register::TestPinValue,
        Register::TestBus,
        Register::AutoTest,
        Register::Version,
        Register::AnalogTest,
        Register::TestDac1,
        Register::TestDac2,
        Register::TestAdc,
    ];

    /// Register address as listed in the datasheet (0x00..=0x3F).
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// SPI address byte for a write: `0AAAAAA0`.
    pub const fn write_address(self) -> u8 {
        (self.address() << 1) & 0x7E
    }

    /// SPI address byte for a read: `1AAAAAA0`.
    pub const fn read_address(self) -> u8 {
        0x80 | self.write_address()
    }

    /// Look a register up by its datasheet address.
    pub fn from_address(address: u8) -> Option<Register> {
        Register::ALL.iter().copied().find(|r| r.address() == address)
    }

    pub fn description(self) -> &'static str {
        match self {
            Register::Command => "starts and stops command execution",
            Register::ComIEn => "enable and disable interrupt request control bits",
            Register::DivIEn => "enable and disable interrupt request control bits",
            Register::ComIrq => "interrupt request bits",
            Register::DivIrq => "interrupt request bits",
            Register::Error => "error bits showing the error status of the last command executed",
            Register::Status1 => "communication status bits",
            Register::Status2 => "receiver and transmitter status bits",
            Register::FifoData => "input and output of 64 byte FIFO buffer",
            Register::FifoLevel => "number of bytes stored in the FIFO buffer",
            Register::WaterLevel => "level for FIFO underflow and overflow warning",
            Register::Control => "miscellaneous control registers",
            Register::BitFraming => "adjustments for bit-oriented frames",
            Register::Coll => "bit position of the first bit-collision detected on the RF interface",
            Register::Mode => "defines general modes for transmitting and receiving",
            Register::TxMode => "defines transmission data rate and framing",
            Register::RxMode => "defines reception data rate and framing",
            Register::TxControl => {
                "controls the logical behavior of the antenna driver pins TX1 and TX2"
            }
            Register::TxAsk => "controls the setting of the transmission modulation",
            Register::TxSel => "selects the internal sources for the antenna driver",
            Register::RxSel => "selects internal receiver settings",
            Register::RxThreshold => "selects thresholds for the bit decoder",
            Register::Demod => "defines demodulator settings",
            Register::MfTx => "controls some MIFARE communication transmit parameters",
            Register::MfRx => "controls some MIFARE communication receive parameters",
            Register::SerialSpeed => "selects the speed of the serial UART interface",
            Register::CrcResultH => "MSB of the CRC calculation result",
            Register::CrcResultL => "LSB of the CRC calculation result",
            Register::ModWidth => "controls the ModWidth setting",
            Register::RfCfg => "configures the receiver gain",
            Register::GsN => {
                "selects the conductance of the antenna driver pins TX1 and TX2 for modulation"
            }
            Register::CwGsP => {
                "defines the conductance of the p-driver output during periods of no modulation"
            }
            Register::ModGsP => {
                "defines the conductance of the p-driver output during periods of modulation"
            }
            Register::TMode => "defines settings for the internal timer",
            Register::TPrescaler => "lower 8 bits of the TPrescaler value",
            Register::TReloadH => "defines the 16-bit timer reload value (high byte)",
            Register::TReloadL => "defines the 16-bit timer reload value (low byte)",
            Register::TCounterValueH => "shows the 16-bit timer value (high byte)",
            Register::TCounterValueL => "shows the 16-bit timer value (low byte)",
            Register::TestSel1 => "general test signal configuration",
            Register::TestSel2 => "general test signal configuration and PRBS control",
            Register::TestPinEn => "enables pin output driver on pins D1 to D7",
            Register::TestPinValue => {
                "defines the values for D1 to D7 when it is used as an I/O bus"
            }
            Register::TestBus => "shows the status of the internal test bus",
            Register::AutoTest => "controls the digital self-test",
            Register::Version => "shows the software version",
            Register::AnalogTest => "controls the pins AUX1 and AUX2",
            Register::TestDac1 => "defines the test value for TestDAC1",
            Register::TestDac2 => "defines the test value for TestDAC2",
            Register::TestAdc => "shows the value of ADC I and Q channels",
        }
    }
}

/// Commands understood by the chip (datasheet chapter 10), written to
/// `CommandReg`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PcdCommand {
    Idle = 0x00,
    Mem = 0x01,
    GenerateRandomId = 0x02,
    CalcCrc = 0x03,
    Transmit = 0x04,
    NoCmdChange = 0x07,
    Receive = 0x08,
    Transceive = 0x0C,
    MfAuthent = 0x0E,
    SoftReset = 0x0F,
}

impl PcdCommand {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<PcdCommand> {
        match code & 0x0F {
            0x00 => Some(PcdCommand::Idle),
            0x01 => Some(PcdCommand::Mem),
            0x02 => Some(PcdCommand::GenerateRandomId),
            0x03 => Some(PcdCommand::CalcCrc),
            0x04 => Some(PcdCommand::Transmit),
            0x07 => Some(PcdCommand::NoCmdChange),
            0x08 => Some(PcdCommand::Receive),
            0x0C => Some(PcdCommand::Transceive),
            0x0E => Some(PcdCommand::MfAuthent),
            0x0F => Some(PcdCommand::SoftReset),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PcdCommand::Idle => "no action, cancels current command execution",
            PcdCommand::Mem => "stores 25 bytes into the internal buffer",
            PcdCommand::GenerateRandomId => "generates a 10-byte random ID number",
            PcdCommand::CalcCrc => "activates the CRC coprocessor or performs a self-test",
            PcdCommand::Transmit => "transmits data from the FIFO buffer",
            PcdCommand::NoCmdChange => {
                "no command change, modifies CommandReg bits without affecting the command"
            }
            PcdCommand::Receive => "activates the receiver circuits",
            PcdCommand::Transceive => {
                "transmits data from FIFO buffer to antenna and activates the receiver after transmission"
            }
            PcdCommand::MfAuthent => "performs the MIFARE standard authentication as a reader",
            PcdCommand::SoftReset => "resets the MFRC522",
        }
    }
}

/// Receiver gain, `RxGain[2:0]` of `RFCfgReg` (datasheet table 98).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RxGain {
    #[display(fmt = "18 dB")]
    Db18,
    #[display(fmt = "23 dB")]
    Db23,
    /// 010b, duplicate of 18 dB
    #[display(fmt = "18 dB (010b)")]
    Db18Alt,
    /// 011b, duplicate of 23 dB
    #[display(fmt = "23 dB (011b)")]
    Db23Alt,
    #[display(fmt = "33 dB")]
    Db33,
    #[display(fmt = "38 dB")]
    Db38,
    #[display(fmt = "43 dB")]
    Db43,
    #[display(fmt = "48 dB")]
    Db48,
}

impl RxGain {
    pub const MIN: RxGain = RxGain::Db18;
    pub const AVG: RxGain = RxGain::Db33;
    pub const MAX: RxGain = RxGain::Db48;

    /// Value already shifted into bits 6..4.
    pub const fn mask(self) -> u8 {
        (self as u8) << 4
    }

    /// Decode from a raw `RFCfgReg` value; reserved bits are ignored.
    pub fn from_register(value: u8) -> RxGain {
        match (value >> 4) & 0x07 {
            0 => RxGain::Db18,
            1 => RxGain::Db23,
            2 => RxGain::Db18Alt,
            3 => RxGain::Db23Alt,
            4 => RxGain::Db33,
            5 => RxGain::Db38,
            6 => RxGain::Db43,
            _ => RxGain::Db48,
        }
    }
}
