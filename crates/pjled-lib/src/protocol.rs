//! Protocol constants and framing for the PiJuice status-LED registers.
//!
//! Every transfer is an SMBus-style block: a command byte selects the
//! register, followed by the payload and one checksum byte. The checksum is
//! `0xFF` XOR-ed with every payload byte.
//!
//! ## Status LED registers
//!
//! | Command          | Payload (bytes)                                   |
//! |------------------|---------------------------------------------------|
//! | `0x66 + led`     | `[r, g, b]` steady color                          |
//! | `0x68 + led`     | `[count, r1, g1, b1, t1, r2, g2, b2, t2]` blink   |
//!
//! `led` is 0 for `D1` and 1 for `D2`. Blink periods `t1`/`t2` are in units
//! of 10 ms.

use crate::led::{BlinkPattern, LedDesignator, RgbColor};

// ── Bus defaults ──

/// I2C bus the hat is wired to on a Raspberry Pi.
pub const DEFAULT_I2C_BUS: u8 = 1;

/// 7-bit address of the PiJuice MCU.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x14;

// ── Command codes ──

/// Steady LED color, base command (add the LED index).
pub const LED_STATE_CMD: u8 = 0x66;

/// LED blink pattern, base command (add the LED index).
pub const LED_BLINK_CMD: u8 = 0x68;

pub const LED_STATE_LEN: usize = 3;
pub const LED_BLINK_LEN: usize = 9;

/// Blink periods are stored on the board in these units.
pub const PERIOD_UNIT_MS: u16 = 10;

/// Firmware quirk: the MSB of the first byte of a read is sometimes dropped.
const FIRST_BYTE_MSB: u8 = 0x80;

// ── Framing errors ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Checksum did not match, even with MSB recovery.
    Checksum,
    /// Response shorter or longer than expected.
    Length { expected: usize, got: usize },
}

// ── Framing ──

/// PiJuice checksum: `0xFF` XOR every byte of `data`.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0xFF, |fcs, &b| fcs ^ b)
}

/// Build a write frame: `[cmd, payload..., checksum(payload)]`.
pub fn encode_write(cmd: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 2);
    frame.push(cmd);
    frame.extend_from_slice(payload);
    frame.push(checksum(payload));
    frame
}

/// Validate a raw read (`payload_len` data bytes + 1 checksum byte) and return the payload.
///
/// On checksum mismatch the check is repeated with the MSB of the first byte
/// set, and the corrected payload is returned if that matches.
pub fn decode_read(raw: &[u8], payload_len: usize) -> Result<Vec<u8>, FrameError> {
    if raw.len() != payload_len + 1 {
        return Err(FrameError::Length {
            expected: payload_len + 1,
            got: raw.len(),
        });
    }
    let (data, fcs) = raw.split_at(payload_len);
    let fcs = fcs[0];
    if checksum(data) == fcs {
        return Ok(data.to_vec());
    }

    let mut recovered = data.to_vec();
    if let Some(first) = recovered.first_mut() {
        *first |= FIRST_BYTE_MSB;
    }
    if checksum(&recovered) == fcs {
        log::debug!("checksum recovered by restoring MSB of first byte");
        return Ok(recovered);
    }
    Err(FrameError::Checksum)
}

// ── LED register payloads ──

pub fn led_state_cmd(led: LedDesignator) -> u8 {
    LED_STATE_CMD + led.index()
}

pub fn led_blink_cmd(led: LedDesignator) -> u8 {
    LED_BLINK_CMD + led.index()
}

pub fn encode_led_state(color: RgbColor) -> [u8; LED_STATE_LEN] {
    color.to_array()
}

pub fn decode_led_state(payload: &[u8]) -> Result<RgbColor, FrameError> {
    let bytes: [u8; LED_STATE_LEN] = payload.try_into().map_err(|_| FrameError::Length {
        expected: LED_STATE_LEN,
        got: payload.len(),
    })?;
    Ok(RgbColor::from_array(bytes))
}

/// Convert a millisecond period to board units, saturating at 255 (2550 ms).
pub fn period_to_units(ms: u16) -> u8 {
    (ms / PERIOD_UNIT_MS).min(u16::from(u8::MAX)) as u8
}

pub fn encode_led_blink(pattern: &BlinkPattern) -> [u8; LED_BLINK_LEN] {
    let [r1, g1, b1] = pattern.on_color.to_array();
    let [r2, g2, b2] = pattern.off_color.to_array();
    [
        pattern.count,
        r1,
        g1,
        b1,
        period_to_units(pattern.on_ms),
        r2,
        g2,
        b2,
        period_to_units(pattern.off_ms),
    ]
}

pub fn decode_led_blink(payload: &[u8]) -> Result<BlinkPattern, FrameError> {
    let d: [u8; LED_BLINK_LEN] = payload.try_into().map_err(|_| FrameError::Length {
        expected: LED_BLINK_LEN,
        got: payload.len(),
    })?;
    Ok(BlinkPattern {
        count: d[0],
        on_color: RgbColor::new(d[1], d[2], d[3]),
        on_ms: u16::from(d[4]) * PERIOD_UNIT_MS,
        off_color: RgbColor::new(d[5], d[6], d[7]),
        off_ms: u16::from(d[8]) * PERIOD_UNIT_MS,
    })
}
