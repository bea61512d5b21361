//! Bit-banged 1-Wire transaction for the DS18B20 temperature probe.
//!
//! Single-drop bus: exactly one probe on the line, so every transaction
//! uses Skip ROM.  The data pin switches between open-drain output and
//! input around each bit slot; timing is driven by the ROM µs delay.
//!
//! | slot        | timing                                  |
//! |-------------|-----------------------------------------|
//! | reset       | 480 µs low, 70 µs sample, 410 µs settle |
//! | write 0     | 60 µs low, 10 µs recovery               |
//! | write 1     | 6 µs low, 64 µs release                 |
//! | read        | 6 µs low, sample at 9 µs, 55 µs settle  |
//!
//! The scratchpad read is verified with the Dallas CRC-8 before the
//! temperature is accepted.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::error::SensorError;

#[cfg(target_os = "espidf")]
const CMD_SKIP_ROM: u8 = 0xCC;
#[cfg(target_os = "espidf")]
const CMD_CONVERT_T: u8 = 0x44;
#[cfg(target_os = "espidf")]
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Conversion wait bound: 12-bit conversions complete within 750 ms.
#[cfg(target_os = "espidf")]
const CONVERT_TIMEOUT_MS: u32 = 750;

/// Trigger a conversion and read the temperature in Celsius.
///
/// Blocks for the conversion time (up to 750 ms) — part of the accepted
/// per-iteration latency budget, like the ranging wait.
#[cfg(target_os = "espidf")]
pub fn read_celsius(dq_gpio: i32) -> Result<f32, SensorError> {
    reset(dq_gpio)?;
    write_byte(dq_gpio, CMD_SKIP_ROM);
    write_byte(dq_gpio, CMD_CONVERT_T);

    // The probe holds read slots at 0 until the conversion finishes.
    let mut waited_ms = 0;
    while read_bit(dq_gpio) == 0 {
        delay_us(1_000);
        waited_ms += 1;
        if waited_ms > CONVERT_TIMEOUT_MS {
            return Err(SensorError::BusFailed);
        }
    }

    reset(dq_gpio)?;
    write_byte(dq_gpio, CMD_SKIP_ROM);
    write_byte(dq_gpio, CMD_READ_SCRATCHPAD);

    let mut scratchpad = [0u8; 9];
    for byte in &mut scratchpad {
        *byte = read_byte(dq_gpio);
    }

    if crc8(&scratchpad[..8]) != scratchpad[8] {
        return Err(SensorError::BusFailed);
    }

    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    Ok(f32::from(raw) / 16.0)
}

// ── Bus primitives ────────────────────────────────────────────

/// Reset pulse + presence detect.  `Err` means no probe answered.
#[cfg(target_os = "espidf")]
fn reset(pin: i32) -> Result<(), SensorError> {
    hw_init::gpio_set_output(pin, true);
    hw_init::gpio_write(pin, false);
    delay_us(480);
    hw_init::gpio_set_output(pin, false);
    delay_us(70);
    let present = !hw_init::gpio_read(pin);
    delay_us(410);
    if present {
        Ok(())
    } else {
        Err(SensorError::BusFailed)
    }
}

#[cfg(target_os = "espidf")]
fn write_bit(pin: i32, bit: u8) {
    hw_init::gpio_set_output(pin, true);
    hw_init::gpio_write(pin, false);
    if bit != 0 {
        delay_us(6);
        hw_init::gpio_set_output(pin, false);
        delay_us(64);
    } else {
        delay_us(60);
        hw_init::gpio_set_output(pin, false);
        delay_us(10);
    }
}

#[cfg(target_os = "espidf")]
fn read_bit(pin: i32) -> u8 {
    hw_init::gpio_set_output(pin, true);
    hw_init::gpio_write(pin, false);
    delay_us(6);
    hw_init::gpio_set_output(pin, false);
    delay_us(9);
    let bit = u8::from(hw_init::gpio_read(pin));
    delay_us(55);
    bit
}

#[cfg(target_os = "espidf")]
fn write_byte(pin: i32, mut byte: u8) {
    for _ in 0..8 {
        write_bit(pin, byte & 1);
        byte >>= 1;
    }
}

#[cfg(target_os = "espidf")]
fn read_byte(pin: i32) -> u8 {
    let mut byte = 0u8;
    for i in 0..8 {
        byte |= read_bit(pin) << i;
    }
    byte
}

#[cfg(target_os = "espidf")]
fn delay_us(us: u32) {
    // SAFETY: esp_rom_delay_us is a plain busy-wait in ROM.
    unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) }
}

// ── CRC ───────────────────────────────────────────────────────

/// Dallas/Maxim CRC-8 (poly 0x31 reflected).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc8_of_empty_is_zero() {
        assert_eq!(crc8(&[]), 0);
    }

    #[test]
    fn crc8_matches_known_rom_code() {
        // DS18B20 ROM code with its published CRC in the last byte.
        let rom = [0x28, 0xFF, 0x4B, 0x90, 0x33, 0x16, 0x04];
        let crc = crc8(&rom);
        assert_eq!(crc8(&[0x28, 0xFF, 0x4B, 0x90, 0x33, 0x16, 0x04, crc]), 0);
    }

    #[test]
    fn crc8_detects_corruption() {
        let data = [0x28, 0xFF, 0x4B, 0x90, 0x33, 0x16, 0x04];
        let good = crc8(&data);
        let mut bad = data;
        bad[2] ^= 0x40;
        assert_ne!(crc8(&bad), good);
    }
}
