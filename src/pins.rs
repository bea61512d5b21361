//! GPIO / peripheral pin assignments for the AquaFeeder main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic rangefinder (water level)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a measurement.
pub const TRIG_GPIO: i32 = 17;
/// Digital input: echo pulse, high for the round-trip duration.
pub const ECHO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Feed servo (SG90-class, signal via LEDC PWM)
// ---------------------------------------------------------------------------

/// LEDC PWM channel output for the feed servo signal line.
pub const SERVO_PWM_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Turbidity sensor (3-pin analog) — voltage via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const TURBIDITY_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Sensors — 1-Wire
// ---------------------------------------------------------------------------

/// DS18B20 water temperature probe data line (external 4.7 kΩ pull-up).
pub const ONEWIRE_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: toggles feeding mode. Idle high, pressed low.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  14-bit gives 0 – 16383 duty counts,
/// enough granularity for 0.5 – 2.5 ms servo pulses at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// LEDC base frequency for the servo signal (standard 50 Hz frame).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
