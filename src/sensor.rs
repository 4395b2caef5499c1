//! High-level interface for the MCP9808.
//!
//! [`Mcp9808`] wraps the register driver with input validation, the
//! temperature codec and the configuration read-modify-write cycle.

use embedded_hal::i2c::I2c;

use crate::codec::{
    decode_alert_bits, decode_ambient, decode_temperature, encode_threshold, AlertBits,
    AmbientReading, TemperatureFormat,
};
use crate::config::{
    AlertMode, AlertPolarity, AlertSelect, ConfigField, Configuration, Hysteresis, Resolution,
};
use crate::driver::RegisterDriver;
use crate::error::Mcp9808Error;
use crate::registers::{
    AMBIENT_TEMPERATURE, CONFIG, DEVICE_ID, EXPECTED_DEVICE_ID, MANUFACTURER_ID, RESOLUTION,
    RESOLUTION_MASK, T_CRIT, T_LOWER, T_UPPER,
};

/// One MCP9808 on an I2C bus.
///
/// Owns the bus handle for its whole lifetime; [`release`](Self::release)
/// gives it back. All methods take `&mut self`, so register accesses through
/// one handle are serialized. To share a sensor between tasks, put the
/// handle behind a mutex rather than cloning the bus.
///
/// # Example
///
/// ```no_run
/// use mcp9808_driver::{Hysteresis, Mcp9808, DEFAULT_ADDRESS};
///
/// # fn example<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), mcp9808_driver::Mcp9808Error<I2C::Error>> {
/// let mut sensor = Mcp9808::new(i2c, DEFAULT_ADDRESS)?;
///
/// sensor.set_upper_limit(30.0)?;
/// sensor.set_hysteresis(Hysteresis::Deg1_5)?;
///
/// let celsius = sensor.temperature()?;
/// # let _ = celsius;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Mcp9808<I2C> {
    driver: RegisterDriver<I2C>,
    identity_verified: bool,
}

impl<I2C> Mcp9808<I2C>
where
    I2C: I2c,
{
    /// Create a sensor handle and check the device ID.
    ///
    /// A device ID other than 0x0400 is not an error: a warning is logged
    /// and [`identity_verified`](Self::identity_verified) returns `false`,
    /// but the handle is returned and usable.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (0x18-0x1F depending on A2:A0)
    ///
    /// # Errors
    /// * [`Mcp9808Error::InvalidAddress`] if `address` is above 0x7F; no
    ///   bus traffic is generated
    /// * [`Mcp9808Error::I2c`] if the device ID cannot be read
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Mcp9808Error<I2C::Error>> {
        if address > 0x7F {
            return Err(Mcp9808Error::InvalidAddress);
        }

        let mut sensor = Self {
            driver: RegisterDriver::new(i2c, address),
            identity_verified: false,
        };

        sensor.identity_verified = sensor.verify_identity()?;
        if !sensor.identity_verified {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Could not detect an MCP9808 at address {=u8:#x}, check the wiring",
                address
            );
        }

        Ok(sensor)
    }

    /// The 7-bit bus address this handle talks to.
    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    /// Result of the identity check performed by [`new`](Self::new).
    pub fn identity_verified(&self) -> bool {
        self.identity_verified
    }

    /// Give back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.driver.release()
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Read the device ID register and compare it against 0x0400.
    pub fn verify_identity(&mut self) -> Result<bool, Mcp9808Error<I2C::Error>> {
        Ok(self.device_id()? == EXPECTED_DEVICE_ID)
    }

    /// Device ID (upper byte) and silicon revision (lower byte).
    pub fn device_id(&mut self) -> Result<u16, Mcp9808Error<I2C::Error>> {
        self.driver.read_u16(DEVICE_ID)
    }

    /// Manufacturer ID, 0x0054 for Microchip parts.
    pub fn manufacturer_id(&mut self) -> Result<u16, Mcp9808Error<I2C::Error>> {
        self.driver.read_u16(MANUFACTURER_ID)
    }

    // -----------------------------------------------------------------------
    // Ambient temperature
    // -----------------------------------------------------------------------

    /// Ambient temperature in °C, 0.0625 °C per count.
    pub fn temperature(&mut self) -> Result<f32, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_pair(AMBIENT_TEMPERATURE)?;
        Ok(decode_temperature(raw, TemperatureFormat::AMBIENT))
    }

    /// Alert flags from the top three bits of the ambient register.
    pub fn alert_bits(&mut self) -> Result<AlertBits, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_pair(AMBIENT_TEMPERATURE)?;
        Ok(decode_alert_bits(raw))
    }

    /// Temperature and alert flags from a single register read.
    pub fn read_ambient(&mut self) -> Result<AmbientReading, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_pair(AMBIENT_TEMPERATURE)?;
        Ok(decode_ambient(raw))
    }

    // -----------------------------------------------------------------------
    // Alert limits
    // -----------------------------------------------------------------------

    /// Set T_UPPER. Accepts -20 °C to +100 °C, truncated to 0.25 °C steps.
    ///
    /// Ignored by the device while `WIN_LOCK` is set.
    ///
    /// # Errors
    /// * [`Mcp9808Error::TemperatureOutOfRange`] before any bus traffic
    /// * [`Mcp9808Error::I2c`] on communication failure
    pub fn set_upper_limit(&mut self, celsius: f32) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_threshold(T_UPPER, celsius)
    }

    /// Set T_LOWER. Same range and lock behaviour as
    /// [`set_upper_limit`](Self::set_upper_limit).
    pub fn set_lower_limit(&mut self, celsius: f32) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_threshold(T_LOWER, celsius)
    }

    /// Set T_CRIT. Ignored by the device while `CRIT_LOCK` is set.
    pub fn set_critical_limit(&mut self, celsius: f32) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_threshold(T_CRIT, celsius)
    }

    pub fn upper_limit(&mut self) -> Result<f32, Mcp9808Error<I2C::Error>> {
        self.read_threshold(T_UPPER)
    }

    pub fn lower_limit(&mut self) -> Result<f32, Mcp9808Error<I2C::Error>> {
        self.read_threshold(T_LOWER)
    }

    pub fn critical_limit(&mut self) -> Result<f32, Mcp9808Error<I2C::Error>> {
        self.read_threshold(T_CRIT)
    }

    fn write_threshold(
        &mut self,
        register: u8,
        celsius: f32,
    ) -> Result<(), Mcp9808Error<I2C::Error>> {
        let raw = encode_threshold(celsius).ok_or(Mcp9808Error::TemperatureOutOfRange)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Threshold {=u8:#x} <- {}", register, raw);

        self.driver.write_pair(register, raw)
    }

    fn read_threshold(&mut self, register: u8) -> Result<f32, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_pair(register)?;
        Ok(decode_temperature(raw, TemperatureFormat::THRESHOLD))
    }

    // -----------------------------------------------------------------------
    // Configuration register
    // -----------------------------------------------------------------------

    /// Read a single configuration field.
    pub fn read_field(&mut self, field: ConfigField) -> Result<u8, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_pair(CONFIG)?;
        Ok(field.spec().extract(raw))
    }

    /// Replace one configuration field, leaving every other bit as read.
    ///
    /// Performs one register read and one register write. The cycle is not
    /// atomic with respect to other bus masters.
    ///
    /// The device silently refuses some writes while a lock bit is set or
    /// while shut down; this is not checked here.
    ///
    /// # Errors
    /// * [`Mcp9808Error::ReadOnlyField`] for [`ConfigField::AlertStatus`]
    /// * [`Mcp9808Error::InvalidFieldValue`] if `value` exceeds the field width
    /// * [`Mcp9808Error::I2c`] on communication failure
    ///
    /// Validation errors are returned before any bus traffic.
    pub fn write_field(
        &mut self,
        field: ConfigField,
        value: u8,
    ) -> Result<(), Mcp9808Error<I2C::Error>> {
        let spec = field.spec();
        if !spec.writable {
            return Err(Mcp9808Error::ReadOnlyField);
        }
        if value > spec.max {
            return Err(Mcp9808Error::InvalidFieldValue { max: spec.max });
        }

        let current = self.driver.read_pair(CONFIG)?;
        let updated = spec.insert(current, value);

        #[cfg(feature = "defmt")]
        defmt::trace!("CONFIG {}: {} -> {}", field, current, updated);

        self.driver.write_pair(CONFIG, updated)
    }

    /// Read and decode the whole configuration register.
    pub fn configuration(&mut self) -> Result<Configuration, Mcp9808Error<I2C::Error>> {
        let raw = self.driver.read_u16(CONFIG)?;
        Ok(Configuration::from_bits(raw))
    }

    /// `true` while the alert output is asserted.
    pub fn alert_status(&mut self) -> Result<bool, Mcp9808Error<I2C::Error>> {
        Ok(self.read_field(ConfigField::AlertStatus)? != 0)
    }

    /// Cannot be changed while either lock bit is set.
    pub fn set_hysteresis(&mut self, hysteresis: Hysteresis) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::Hysteresis, hysteresis as u8)
    }

    /// Enter or leave low-power shutdown.
    ///
    /// Shutdown cannot be entered while either lock bit is set, but can be
    /// left at any time.
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::Shutdown, shutdown as u8)
    }

    /// Lock T_CRIT. Once set, only a power cycle clears it.
    pub fn set_critical_lock(&mut self, lock: bool) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::CriticalLock, lock as u8)
    }

    /// Lock T_UPPER and T_LOWER. Once set, only a power cycle clears it.
    pub fn set_window_lock(&mut self, lock: bool) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::WindowLock, lock as u8)
    }

    /// Deassert an alert latched in [`AlertMode::Interrupt`].
    ///
    /// Has no effect while shut down.
    pub fn clear_interrupt(&mut self) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::InterruptClear, 1)
    }

    /// Enable or disable the alert output pin.
    pub fn set_alert_output(&mut self, enabled: bool) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::AlertControl, enabled as u8)
    }

    /// Cannot be changed while `WIN_LOCK` is set.
    pub fn set_alert_select(&mut self, select: AlertSelect) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::AlertSelect, select as u8)
    }

    pub fn set_alert_polarity(
        &mut self,
        polarity: AlertPolarity,
    ) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::AlertPolarity, polarity as u8)
    }

    pub fn set_alert_mode(&mut self, mode: AlertMode) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.write_field(ConfigField::AlertMode, mode as u8)
    }

    // -----------------------------------------------------------------------
    // Resolution register
    // -----------------------------------------------------------------------

    pub fn resolution(&mut self) -> Result<Resolution, Mcp9808Error<I2C::Error>> {
        let code = self.driver.read_u8(RESOLUTION)? & RESOLUTION_MASK;
        Resolution::try_from(code).map_err(|_| Mcp9808Error::InvalidResolution)
    }

    /// Single-byte write to the resolution register.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.driver.write_u8(RESOLUTION, resolution as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x18;

    fn read(register: u8, data: &[u8]) -> [Transaction; 2] {
        [
            Transaction::write(ADDR, vec![register]),
            Transaction::read(ADDR, data.to_vec()),
        ]
    }

    // Sensor whose identity check succeeds, followed by `expectations`.
    fn mk_sensor(expectations: &[Transaction]) -> (Mcp9808<I2cMock>, I2cMock) {
        let mut all = read(DEVICE_ID, &[0x04, 0x00]).to_vec();
        all.extend_from_slice(expectations);

        let i2c = I2cMock::new(&all);
        let sensor = Mcp9808::new(i2c.clone(), ADDR).unwrap();
        (sensor, i2c)
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_verifies_identity() {
        let (sensor, mut i2c) = mk_sensor(&[]);
        assert!(sensor.identity_verified());
        assert_eq!(sensor.address(), ADDR);
        i2c.done();
    }

    #[test]
    fn identity_mismatch_is_not_fatal() {
        let mut expectations = read(DEVICE_ID, &[0x04, 0x01]).to_vec();
        expectations.extend_from_slice(&read(AMBIENT_TEMPERATURE, &[0x01, 0x00]));
        let mut i2c = I2cMock::new(&expectations);

        let mut sensor = Mcp9808::new(i2c.clone(), ADDR).unwrap();
        assert!(!sensor.identity_verified());
        assert_eq!(sensor.temperature().unwrap(), 16.0);
        i2c.done();
    }

    #[test]
    fn new_rejects_wide_address() {
        let mut i2c = I2cMock::new(&[]);
        assert!(matches!(
            Mcp9808::new(i2c.clone(), 0x80),
            Err(Mcp9808Error::InvalidAddress)
        ));
        i2c.done();
    }

    #[test]
    fn new_propagates_bus_error() {
        let expectations = [Transaction::write(ADDR, vec![DEVICE_ID]).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        assert!(matches!(
            Mcp9808::new(i2c.clone(), ADDR),
            Err(Mcp9808Error::I2c(ErrorKind::Other))
        ));
        i2c.done();
    }

    #[test]
    fn manufacturer_id() {
        let (mut sensor, mut i2c) = mk_sensor(&read(MANUFACTURER_ID, &[0x00, 0x54]));
        assert_eq!(sensor.manufacturer_id().unwrap(), 0x0054);
        i2c.done();
    }

    #[test]
    fn release_returns_bus() {
        let (sensor, _) = mk_sensor(&[]);
        let mut i2c = sensor.release();
        i2c.done();
    }

    // ── Ambient temperature ──────────────────────────────────────────

    #[test]
    fn temperature_ignores_alert_bits() {
        let (mut sensor, mut i2c) = mk_sensor(&read(AMBIENT_TEMPERATURE, &[0xC1, 0x94]));
        assert_eq!(sensor.temperature().unwrap(), 25.25);
        i2c.done();
    }

    #[test]
    fn negative_temperature() {
        let (mut sensor, mut i2c) = mk_sensor(&read(AMBIENT_TEMPERATURE, &[0x1F, 0x30]));
        assert_eq!(sensor.temperature().unwrap(), -13.0);
        i2c.done();
    }

    #[test]
    fn alert_bits() {
        let (mut sensor, mut i2c) = mk_sensor(&read(AMBIENT_TEMPERATURE, &[0b1010_0001, 0x00]));
        let bits = sensor.alert_bits().unwrap();
        assert!(bits.above_critical);
        assert!(!bits.above_upper);
        assert!(bits.below_lower);
        i2c.done();
    }

    #[test]
    fn read_ambient_uses_one_read() {
        let (mut sensor, mut i2c) = mk_sensor(&read(AMBIENT_TEMPERATURE, &[0b0100_0001, 0x00]));
        let reading = sensor.read_ambient().unwrap();
        assert_eq!(reading.celsius, 16.0);
        assert!(reading.alerts.above_upper);
        i2c.done();
    }

    // ── Alert limits ─────────────────────────────────────────────────

    #[test]
    fn set_upper_limit() {
        let (mut sensor, mut i2c) =
            mk_sensor(&[Transaction::write(ADDR, vec![T_UPPER, 0x01, 0xE8])]);
        sensor.set_upper_limit(30.5).unwrap();
        i2c.done();
    }

    #[test]
    fn set_negative_lower_limit() {
        let (mut sensor, mut i2c) =
            mk_sensor(&[Transaction::write(ADDR, vec![T_LOWER, 0x1F, 0x60])]);
        sensor.set_lower_limit(-10.0).unwrap();
        i2c.done();
    }

    #[test]
    fn out_of_range_limit_issues_no_transaction() {
        let (mut sensor, mut i2c) = mk_sensor(&[]);
        assert!(matches!(
            sensor.set_critical_limit(120.0),
            Err(Mcp9808Error::TemperatureOutOfRange)
        ));
        assert!(matches!(
            sensor.set_upper_limit(f32::NAN),
            Err(Mcp9808Error::TemperatureOutOfRange)
        ));
        i2c.done();
    }

    #[test]
    fn limit_readback() {
        let mut expectations = read(T_CRIT, &[0x05, 0x00]).to_vec();
        expectations.extend_from_slice(&read(T_LOWER, &[0x1F, 0x60]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        assert_eq!(sensor.critical_limit().unwrap(), 80.0);
        assert_eq!(sensor.lower_limit().unwrap(), -10.0);
        i2c.done();
    }

    // ── Configuration register ───────────────────────────────────────

    #[test]
    fn invalid_hysteresis_issues_no_transaction() {
        let (mut sensor, mut i2c) = mk_sensor(&[]);
        assert!(matches!(
            sensor.write_field(ConfigField::Hysteresis, 4),
            Err(Mcp9808Error::InvalidFieldValue { max: 3 })
        ));
        assert!(matches!(
            sensor.write_field(ConfigField::Shutdown, 2),
            Err(Mcp9808Error::InvalidFieldValue { max: 1 })
        ));
        i2c.done();
    }

    #[test]
    fn alert_status_is_read_only() {
        let (mut sensor, mut i2c) = mk_sensor(&[]);
        assert!(matches!(
            sensor.write_field(ConfigField::AlertStatus, 0),
            Err(Mcp9808Error::ReadOnlyField)
        ));
        i2c.done();
    }

    #[test]
    fn shutdown_preserves_other_bits() {
        let mut expectations = read(CONFIG, &[0x06, 0xAB]).to_vec();
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x07, 0xAB]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        sensor.write_field(ConfigField::Shutdown, 1).unwrap();
        i2c.done();
    }

    #[test]
    fn set_hysteresis_keeps_lock_bits() {
        let mut expectations = read(CONFIG, &[0x01, 0xC0]).to_vec();
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x07, 0xC0]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        sensor.set_hysteresis(Hysteresis::Deg6).unwrap();
        i2c.done();
    }

    #[test]
    fn clear_interrupt_sets_bit_5() {
        let mut expectations = read(CONFIG, &[0x00, 0x09]).to_vec();
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x00, 0x29]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        sensor.clear_interrupt().unwrap();
        i2c.done();
    }

    #[test]
    fn typed_alert_setters() {
        let mut expectations = read(CONFIG, &[0x00, 0x00]).to_vec();
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x00, 0x04]));
        expectations.extend_from_slice(&read(CONFIG, &[0x00, 0x04]));
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x00, 0x06]));
        expectations.extend_from_slice(&read(CONFIG, &[0x00, 0x06]));
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x00, 0x07]));
        expectations.extend_from_slice(&read(CONFIG, &[0x00, 0x07]));
        expectations.push(Transaction::write(ADDR, vec![CONFIG, 0x00, 0x0F]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        sensor.set_alert_select(AlertSelect::CriticalOnly).unwrap();
        sensor.set_alert_polarity(AlertPolarity::ActiveHigh).unwrap();
        sensor.set_alert_mode(AlertMode::Interrupt).unwrap();
        sensor.set_alert_output(true).unwrap();
        i2c.done();
    }

    #[test]
    fn config_read_failure_skips_write() {
        let expectations = [
            Transaction::write(ADDR, vec![CONFIG]),
            Transaction::read(ADDR, vec![0x00, 0x00]).with_error(ErrorKind::Other),
        ];
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        assert!(matches!(
            sensor.set_window_lock(true),
            Err(Mcp9808Error::I2c(ErrorKind::Other))
        ));
        i2c.done();
    }

    #[test]
    fn read_field_and_alert_status() {
        let mut expectations = read(CONFIG, &[0x04, 0x00]).to_vec();
        expectations.extend_from_slice(&read(CONFIG, &[0x00, 0x10]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        assert_eq!(sensor.read_field(ConfigField::Hysteresis).unwrap(), 2);
        assert!(sensor.alert_status().unwrap());
        i2c.done();
    }

    #[test]
    fn configuration_snapshot() {
        let (mut sensor, mut i2c) = mk_sensor(&read(CONFIG, &[0x01, 0x48]));
        let config = sensor.configuration().unwrap();

        assert!(config.shutdown);
        assert!(config.window_lock);
        assert!(!config.critical_lock);
        assert!(config.alert_output);
        assert_eq!(config.hysteresis, Hysteresis::Deg0);
        i2c.done();
    }

    // ── Resolution register ──────────────────────────────────────────

    #[test]
    fn set_resolution_writes_one_byte() {
        let (mut sensor, mut i2c) =
            mk_sensor(&[Transaction::write(ADDR, vec![RESOLUTION, 0x01])]);
        sensor.set_resolution(Resolution::Quarter).unwrap();
        i2c.done();
    }

    #[test]
    fn resolution_ignores_unimplemented_bits() {
        let mut expectations = read(RESOLUTION, &[0x03]).to_vec();
        expectations.extend_from_slice(&read(RESOLUTION, &[0xFE]));
        let (mut sensor, mut i2c) = mk_sensor(&expectations);

        assert_eq!(sensor.resolution().unwrap(), Resolution::Sixteenth);
        assert_eq!(sensor.resolution().unwrap(), Resolution::Eighth);
        i2c.done();
    }
}
