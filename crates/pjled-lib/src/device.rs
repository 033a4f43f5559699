//! Driver for the PiJuice status LEDs — trait + I2C backend.

use std::fmt;

use embedded_hal::i2c::I2c;

use crate::led::{BlinkPattern, LedDesignator, RgbColor};
use crate::protocol::{self, FrameError};

// ── Error type ──

/// Driver errors.
///
/// String payloads follow the convention **"context: details"**, where
/// *context* names the bus or register involved.
#[derive(Debug)]
pub enum DeviceError {
    OpenFailed(String),
    Communication(String),
    /// Read-back checksum mismatch that MSB recovery could not fix.
    DataCorrupted,
    Unsupported(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OpenFailed(e) => write!(f, "Failed to open I2C bus: {e}"),
            DeviceError::Communication(e) => write!(f, "I2C communication error: {e}"),
            DeviceError::DataCorrupted => write!(f, "Data corrupted (checksum mismatch)"),
            DeviceError::Unsupported(e) => write!(f, "Unsupported: {e}"),
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<FrameError> for DeviceError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Checksum => DeviceError::DataCorrupted,
            FrameError::Length { expected, got } => DeviceError::Communication(format!(
                "frame length: expected {expected} bytes, got {got}"
            )),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;

// ── Trait ──

/// The status-LED half of the PiJuice driver.
///
/// `set_led_state` and `set_led_blink` mirror the vendor SDK's
/// `SetLedState` / `SetLedBlink`; the getters read the registers back.
pub trait StatusLedDriver {
    /// Human-readable location of the board, e.g. `/dev/i2c-1@0x14`.
    fn path(&self) -> &str;
    fn set_led_state(&mut self, led: LedDesignator, color: RgbColor) -> Result<()>;
    fn set_led_blink(&mut self, led: LedDesignator, pattern: &BlinkPattern) -> Result<()>;
    fn get_led_state(&mut self, led: LedDesignator) -> Result<RgbColor>;
    fn get_led_blink(&mut self, led: LedDesignator) -> Result<BlinkPattern>;
}

// ── I2C backend ──

/// PiJuice LED driver over any `embedded-hal` I2C bus.
pub struct PiJuiceI2c<I> {
    bus: I,
    address: u8,
    path: String,
}

impl<I: I2c> PiJuiceI2c<I> {
    pub fn new(bus: I, address: u8, bus_name: &str) -> Self {
        PiJuiceI2c {
            bus,
            address,
            path: format!("{bus_name}@0x{address:02x}"),
        }
    }

    /// Give the bus back, e.g. to inspect a mock after a test.
    pub fn into_inner(self) -> I {
        self.bus
    }

    fn write_register(&mut self, cmd: u8, payload: &[u8]) -> Result<()> {
        let frame = protocol::encode_write(cmd, payload);
        log::debug!("i2c write {}: {frame:02x?}", self.path);
        self.bus
            .write(self.address, &frame)
            .map_err(|e| DeviceError::Communication(format!("write 0x{cmd:02x}: {e:?}")))
    }

    fn read_register(&mut self, cmd: u8, len: usize) -> Result<Vec<u8>> {
        let mut raw = vec![0u8; len + 1];
        self.bus
            .write_read(self.address, &[cmd], &mut raw)
            .map_err(|e| DeviceError::Communication(format!("read 0x{cmd:02x}: {e:?}")))?;
        log::debug!("i2c read {} 0x{cmd:02x}: {raw:02x?}", self.path);
        Ok(protocol::decode_read(&raw, len)?)
    }
}

impl<I: I2c> StatusLedDriver for PiJuiceI2c<I> {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_led_state(&mut self, led: LedDesignator, color: RgbColor) -> Result<()> {
        self.write_register(
            protocol::led_state_cmd(led),
            &protocol::encode_led_state(color),
        )
    }

    fn set_led_blink(&mut self, led: LedDesignator, pattern: &BlinkPattern) -> Result<()> {
        self.write_register(
            protocol::led_blink_cmd(led),
            &protocol::encode_led_blink(pattern),
        )
    }

    fn get_led_state(&mut self, led: LedDesignator) -> Result<RgbColor> {
        let payload = self.read_register(protocol::led_state_cmd(led), protocol::LED_STATE_LEN)?;
        Ok(protocol::decode_led_state(&payload)?)
    }

    fn get_led_blink(&mut self, led: LedDesignator) -> Result<BlinkPattern> {
        let payload = self.read_register(protocol::led_blink_cmd(led), protocol::LED_BLINK_LEN)?;
        Ok(protocol::decode_led_blink(&payload)?)
    }
}

// ── Linux implementation ──

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use linux_embedded_hal::I2cdev;

    pub fn bus_path(bus: u8) -> String {
        format!("/dev/i2c-{bus}")
    }

    pub fn open(bus: u8, address: u8) -> Result<PiJuiceI2c<I2cdev>> {
        let path = bus_path(bus);
        let dev = I2cdev::new(&path).map_err(|e| DeviceError::OpenFailed(format!("{path}: {e}")))?;
        log::debug!("opened {path}, PiJuice at 0x{address:02x}");
        Ok(PiJuiceI2c::new(dev, address, &path))
    }
}

// ── Stub for unsupported platforms ──

#[cfg(not(target_os = "linux"))]
pub struct StubDevice;

#[cfg(not(target_os = "linux"))]
impl StubDevice {
    fn unsupported<T>() -> Result<T> {
        Err(DeviceError::Unsupported(
            "I2C access is only available on Linux".into(),
        ))
    }
}

#[cfg(not(target_os = "linux"))]
impl StatusLedDriver for StubDevice {
    fn path(&self) -> &str {
        "stub://"
    }
    fn set_led_state(&mut self, _led: LedDesignator, _color: RgbColor) -> Result<()> {
        Self::unsupported()
    }
    fn set_led_blink(&mut self, _led: LedDesignator, _pattern: &BlinkPattern) -> Result<()> {
        Self::unsupported()
    }
    fn get_led_state(&mut self, _led: LedDesignator) -> Result<RgbColor> {
        Self::unsupported()
    }
    fn get_led_blink(&mut self, _led: LedDesignator) -> Result<BlinkPattern> {
        Self::unsupported()
    }
}

/// Concrete driver type for the current platform.
#[cfg(target_os = "linux")]
pub type PlatformDevice = PiJuiceI2c<linux_embedded_hal::I2cdev>;
#[cfg(not(target_os = "linux"))]
pub type PlatformDevice = StubDevice;

/// Open the PiJuice on I2C bus `bus` at 7-bit `address`.
pub fn open_device(bus: u8, address: u8) -> Result<PlatformDevice> {
    #[cfg(target_os = "linux")]
    {
        linux_impl::open(bus, address)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (bus, address);
        StubDevice::unsupported()
    }
}

// ── Mocks for testing ──

/// In-memory mocks for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    // ── MockBus: register-level I2C fake ──

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockBusError {
        /// Wrong address, or failure injected by the test.
        Nak,
        /// Read issued without a preceding command byte.
        NoRegisterSelected,
    }

    impl embedded_hal::i2c::Error for MockBusError {
        fn kind(&self) -> ErrorKind {
            match self {
                MockBusError::Nak => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
                MockBusError::NoRegisterSelected => ErrorKind::Other,
            }
        }
    }

    /// Fake PiJuice MCU. Stores each register's payload keyed by command byte;
    /// reads return the payload with a valid checksum unless a fault is injected.
    pub struct MockBus {
        pub address: u8,
        /// Register payloads: command → data bytes (checksum stripped).
        pub registers: HashMap<u8, Vec<u8>>,
        /// Every write frame, in order, including command and checksum.
        pub writes: Vec<Vec<u8>>,
        /// If true, every transaction NAKs.
        pub fail: bool,
        /// If true, reads return a checksum that cannot be recovered.
        pub corrupt_reads: bool,
        /// If true, reads clear the MSB of the first byte (the known firmware quirk).
        pub drop_first_msb: bool,
    }

    impl Default for MockBus {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockBus {
        pub fn new() -> Self {
            MockBus {
                address: protocol::DEFAULT_I2C_ADDRESS,
                registers: HashMap::new(),
                writes: Vec::new(),
                fail: false,
                corrupt_reads: false,
                drop_first_msb: false,
            }
        }

        /// Pre-load a register as if the board had stored it.
        pub fn preload(&mut self, cmd: u8, payload: &[u8]) {
            self.registers.insert(cmd, payload.to_vec());
        }
    }

    impl ErrorType for MockBus {
        type Error = MockBusError;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> std::result::Result<(), MockBusError> {
            if self.fail || address != self.address {
                return Err(MockBusError::Nak);
            }
            let mut selected = None;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        match bytes.split_first() {
                            Some((&cmd, [])) => selected = Some(cmd),
                            Some((&cmd, rest)) => {
                                if let Some((_fcs, payload)) = rest.split_last() {
                                    self.registers.insert(cmd, payload.to_vec());
                                }
                            }
                            None => {}
                        }
                    }
                    Operation::Read(buf) => {
                        let cmd = selected.ok_or(MockBusError::NoRegisterSelected)?;
                        let mut raw = self
                            .registers
                            .get(&cmd)
                            .cloned()
                            .unwrap_or_else(|| vec![0; buf.len().saturating_sub(1)]);
                        raw.push(protocol::checksum(&raw));
                        if self.drop_first_msb {
                            raw[0] &= 0x7F;
                        }
                        if self.corrupt_reads
                            && let Some(last) = raw.last_mut()
                        {
                            *last ^= 0x5A;
                        }
                        let n = raw.len().min(buf.len());
                        buf[..n].copy_from_slice(&raw[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    /// Driver over a [`MockBus`], exercising the real framing code.
    pub fn mock_pijuice() -> PiJuiceI2c<MockBus> {
        PiJuiceI2c::new(MockBus::new(), protocol::DEFAULT_I2C_ADDRESS, "mock://i2c")
    }

    // ── MockDevice: call-recording driver ──

    #[derive(Debug, Clone, PartialEq)]
    pub enum LedCall {
        State(LedDesignator, RgbColor),
        Blink(LedDesignator, BlinkPattern),
    }

    /// Records every driver call so tests can assert on the full history
    /// without going through the wire format.
    #[derive(Default)]
    pub struct MockDevice {
        pub calls: Vec<LedCall>,
        pub states: HashMap<LedDesignator, RgbColor>,
        pub blinks: HashMap<LedDesignator, BlinkPattern>,
        /// If true, every call fails with a communication error.
        pub fail: bool,
    }

    impl MockDevice {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last_call(&self) -> Option<&LedCall> {
            self.calls.last()
        }

        fn check(&self) -> Result<()> {
            if self.fail {
                return Err(DeviceError::Communication(
                    "mock: failure injected".into(),
                ));
            }
            Ok(())
        }
    }

    impl StatusLedDriver for MockDevice {
        fn path(&self) -> &str {
            "mock://pijuice"
        }

        fn set_led_state(&mut self, led: LedDesignator, color: RgbColor) -> Result<()> {
            self.check()?;
            self.calls.push(LedCall::State(led, color));
            self.states.insert(led, color);
            Ok(())
        }

        fn set_led_blink(&mut self, led: LedDesignator, pattern: &BlinkPattern) -> Result<()> {
            self.check()?;
            self.calls.push(LedCall::Blink(led, *pattern));
            self.blinks.insert(led, *pattern);
            Ok(())
        }

        fn get_led_state(&mut self, led: LedDesignator) -> Result<RgbColor> {
            self.check()?;
            Ok(self.states.get(&led).copied().unwrap_or_default())
        }

        fn get_led_blink(&mut self, led: LedDesignator) -> Result<BlinkPattern> {
            self.check()?;
            Ok(self
                .blinks
                .get(&led)
                .copied()
                .unwrap_or_else(BlinkPattern::off))
        }
    }
}
