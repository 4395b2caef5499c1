//! Conversions between raw register contents and physical values.
//!
//! Temperatures are stored as sign-and-two's-complement fields whose width
//! depends on the register: the ambient register carries a 13-bit field in
//! bits 12:0 (bits 15:13 are alert flags), the threshold registers an 11-bit
//! field in bits 12:2 (bits 1:0 unused, bits 15:13 read as zero). Nothing in
//! this module touches the bus.

use crate::registers::{ALERT_CRITICAL_BIT, ALERT_LOWER_BIT, ALERT_UPPER_BIT};

/// Lowest value accepted by the threshold setters, in °C.
pub const THRESHOLD_MIN: f32 = -20.0;

/// Highest value accepted by the threshold setters, in °C.
pub const THRESHOLD_MAX: f32 = 100.0;

/// Layout of a signed temperature field within a 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureFormat {
    /// Bits of the register word that hold the field, sign bit included.
    pub mask: u16,
    /// Position of the field's least significant bit.
    pub shift: u32,
    /// Degrees Celsius per count.
    pub resolution: f32,
}

impl TemperatureFormat {
    /// Ambient temperature register: 13 bits, 0.0625 °C per count.
    pub const AMBIENT: Self = Self {
        mask: 0x1FFF,
        shift: 0,
        resolution: 0.0625,
    };

    /// T_UPPER / T_LOWER / T_CRIT: 11 bits starting at bit 2, 0.25 °C per count.
    pub const THRESHOLD: Self = Self {
        mask: 0x1FFC,
        shift: 2,
        resolution: 0.25,
    };

    /// Width of the field in bits, sign bit included.
    pub fn width(&self) -> u32 {
        (self.mask >> self.shift).count_ones()
    }

    fn sign_bit(&self) -> u16 {
        1 << (self.width() - 1)
    }

    /// All-ones over the magnitude bits (the field minus its sign bit).
    fn magnitude_mask(&self) -> u16 {
        self.sign_bit() - 1
    }
}

/// Decode a big-endian register pair into degrees Celsius.
///
/// Bits outside `format.mask` are discarded. Values outside the sensor's
/// documented range are converted mechanically; no range check is applied.
pub fn decode_temperature(raw: [u8; 2], format: TemperatureFormat) -> f32 {
    let field = (u16::from_be_bytes(raw) & format.mask) >> format.shift;
    let value = field & format.magnitude_mask();

    if field & format.sign_bit() != 0 {
        let magnitude = (format.magnitude_mask() - value) + 1;
        -(magnitude as f32 * format.resolution)
    } else {
        value as f32 * format.resolution
    }
}

/// Encode degrees Celsius into a big-endian register pair.
///
/// Returns `None` if `celsius` is NaN or outside `[min, max]`. The value is
/// truncated toward zero onto the `format.resolution` grid, so a negative
/// input smaller in magnitude than one count encodes as zero.
pub fn encode_temperature(
    celsius: f32,
    format: TemperatureFormat,
    min: f32,
    max: f32,
) -> Option<[u8; 2]> {
    if !(min..=max).contains(&celsius) {
        return None;
    }

    let negative = celsius < 0.0;
    let magnitude = if negative { -celsius } else { celsius };
    let units = (magnitude / format.resolution) as u16;

    // Counts that do not fit the magnitude bits cannot be represented.
    if units > format.sign_bit() || (!negative && units == format.sign_bit()) {
        return None;
    }

    let field = if negative && units != 0 {
        (format.sign_bit() - units) | format.sign_bit()
    } else {
        units
    };

    Some(((field << format.shift) & format.mask).to_be_bytes())
}

/// Encode a threshold value with the limits the sensor documents for
/// T_UPPER, T_LOWER and T_CRIT.
pub fn encode_threshold(celsius: f32) -> Option<[u8; 2]> {
    encode_temperature(
        celsius,
        TemperatureFormat::THRESHOLD,
        THRESHOLD_MIN,
        THRESHOLD_MAX,
    )
}

/// Alert flags carried in bits 15:13 of the ambient temperature register.
///
/// The flags are independent; more than one may be set at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertBits {
    /// T_A >= T_CRIT.
    pub above_critical: bool,
    /// T_A > T_UPPER.
    pub above_upper: bool,
    /// T_A < T_LOWER.
    pub below_lower: bool,
}

impl AlertBits {
    /// Flags ordered as critical, upper, lower.
    pub fn as_array(&self) -> [bool; 3] {
        [self.above_critical, self.above_upper, self.below_lower]
    }

    /// `true` if any of the three conditions holds.
    pub fn any(&self) -> bool {
        self.above_critical || self.above_upper || self.below_lower
    }
}

/// Extract the alert flags from a raw ambient register pair.
pub fn decode_alert_bits(raw: [u8; 2]) -> AlertBits {
    let word = u16::from_be_bytes(raw);
    AlertBits {
        above_critical: word & ALERT_CRITICAL_BIT != 0,
        above_upper: word & ALERT_UPPER_BIT != 0,
        below_lower: word & ALERT_LOWER_BIT != 0,
    }
}

/// Temperature and alert flags taken from one read of the ambient register.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmbientReading {
    pub celsius: f32,
    pub alerts: AlertBits,
}

/// Decode both halves of a raw ambient register pair.
pub fn decode_ambient(raw: [u8; 2]) -> AmbientReading {
    AmbientReading {
        celsius: decode_temperature(raw, TemperatureFormat::AMBIENT),
        alerts: decode_alert_bits(raw),
    }
}
