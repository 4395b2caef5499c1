//! Register map and fixed constants for the MCP9808.
//!
//! Every register except [`RESOLUTION`] is 16 bits wide and transferred
//! most-significant byte first. The register pointer is selected by writing
//! its address as the first byte of a transaction.

// ---------------------------------------------------------------------------
// Register pointers
// ---------------------------------------------------------------------------

/// Configuration register (16-bit, read/write).
pub const CONFIG: u8 = 0x01;

/// Upper alert window boundary (16-bit, read/write).
pub const T_UPPER: u8 = 0x02;

/// Lower alert window boundary (16-bit, read/write).
pub const T_LOWER: u8 = 0x03;

/// Critical temperature limit (16-bit, read/write).
pub const T_CRIT: u8 = 0x04;

/// Ambient temperature plus the three alert status bits (16-bit, read-only).
pub const AMBIENT_TEMPERATURE: u8 = 0x05;

/// Manufacturer ID (16-bit, read-only).
pub const MANUFACTURER_ID: u8 = 0x06;

/// Device ID in the upper byte, silicon revision in the lower (16-bit, read-only).
pub const DEVICE_ID: u8 = 0x07;

/// Measurement resolution (8-bit, read/write, bits 1:0 only).
pub const RESOLUTION: u8 = 0x08;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address (A2:A0 tied low).
pub const DEFAULT_ADDRESS: u8 = 0x18;

/// Value of [`MANUFACTURER_ID`] on genuine parts.
pub const EXPECTED_MANUFACTURER_ID: u16 = 0x0054;

/// Value of [`DEVICE_ID`] for device 0x04, revision 0x00.
pub const EXPECTED_DEVICE_ID: u16 = 0x0400;

// ---------------------------------------------------------------------------
// Ambient register status bits
// ---------------------------------------------------------------------------

/// T_A >= T_CRIT.
pub const ALERT_CRITICAL_BIT: u16 = 1 << 15;

/// T_A > T_UPPER.
pub const ALERT_UPPER_BIT: u16 = 1 << 14;

/// T_A < T_LOWER.
pub const ALERT_LOWER_BIT: u16 = 1 << 13;

/// Only bits 1:0 of the resolution register are implemented.
pub const RESOLUTION_MASK: u8 = 0b0000_0011;
