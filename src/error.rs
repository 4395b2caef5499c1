//! Error types for the MCP9808 driver.

use core::fmt;

/// Errors that can occur when configuring or reading the sensor.
///
/// Every variant other than [`I2c`](Mcp9808Error::I2c) is raised before any
/// bus traffic, so a rejected call leaves the device untouched.
#[derive(Debug)]
pub enum Mcp9808Error<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Threshold outside -20 °C to +100 °C, or not a number.
    TemperatureOutOfRange,

    /// Configuration field value larger than the field can hold.
    InvalidFieldValue {
        /// Largest value the field accepts.
        max: u8,
    },

    /// The field is a status bit and cannot be written.
    ReadOnlyField,

    /// Resolution code outside 0-3.
    InvalidResolution,

    /// Device address does not fit in 7 bits.
    InvalidAddress,
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for Mcp9808Error<E> {
    fn from(error: E) -> Self {
        Mcp9808Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Mcp9808Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mcp9808Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Mcp9808Error::TemperatureOutOfRange => {
                write!(f, "Temperature out of range (must be -20 to 100 C)")
            }
            Mcp9808Error::InvalidFieldValue { max } => {
                write!(f, "Invalid field value (must be 0-{})", max)
            }
            Mcp9808Error::ReadOnlyField => write!(f, "Field is read-only"),
            Mcp9808Error::InvalidResolution => write!(f, "Invalid resolution (must be 0-3)"),
            Mcp9808Error::InvalidAddress => write!(f, "Invalid I2C address (must be 7-bit)"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Mcp9808Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Mcp9808Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Mcp9808Error::TemperatureOutOfRange => defmt::write!(f, "Temperature out of range"),
            Mcp9808Error::InvalidFieldValue { max } => {
                defmt::write!(f, "Invalid field value (max {})", max)
            }
            Mcp9808Error::ReadOnlyField => defmt::write!(f, "Field is read-only"),
            Mcp9808Error::InvalidResolution => defmt::write!(f, "Invalid resolution"),
            Mcp9808Error::InvalidAddress => defmt::write!(f, "Invalid I2C address"),
        }
    }
}
