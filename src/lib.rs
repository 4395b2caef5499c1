//! Blocking driver for the Microchip MCP9808 digital temperature sensor.
//!
//! This crate provides an `embedded-hal` 1.0 I2C driver for the MCP9808:
//! ambient temperature readout, the three alert limits, the configuration
//! register and the resolution register.
//!
//! # Architecture
//!
//! - **[`codec`]** — Pure conversions between register contents and
//!   degrees Celsius / alert flags. No I/O.
//! - **[`config`]** — Configuration register field table and the typed
//!   values each field accepts.
//! - **`driver`** (crate-private) — Register pointer and byte transfer
//!   primitives.
//! - **[`Mcp9808`]** (public) — Validated, high-level API tying the above
//!   together.
//!
//! # Quick start
//!
//! ```no_run
//! use mcp9808_driver::{Mcp9808, DEFAULT_ADDRESS};
//!
//! # fn example<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), mcp9808_driver::Mcp9808Error<I2C::Error>> {
//! // Construct with any `embedded-hal` I2C implementation
//! let mut sensor = Mcp9808::new(i2c, DEFAULT_ADDRESS)?;
//!
//! sensor.set_critical_limit(85.0)?;
//! let reading = sensor.read_ambient()?;
//! if reading.alerts.above_critical {
//!     // ...
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] on public types and driver
//!   diagnostics (identity mismatch warning, register write traces).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub use codec::{AlertBits, AmbientReading, TemperatureFormat, THRESHOLD_MAX, THRESHOLD_MIN};
pub use config::{
    AlertMode, AlertPolarity, AlertSelect, ConfigField, Configuration, FieldSpec, Hysteresis,
    Resolution,
};
pub use error::Mcp9808Error;
pub use registers::{DEFAULT_ADDRESS, EXPECTED_DEVICE_ID, EXPECTED_MANUFACTURER_ID};
pub use sensor::Mcp9808;

pub mod codec;
pub mod config;
mod driver;
mod error;
pub mod registers;
mod sensor;
