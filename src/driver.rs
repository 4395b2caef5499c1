//! Low-level register access.
//!
//! Reads set the register pointer with a one-byte write, stop, then fetch
//! the register in a separate read transaction. Writes send the register
//! address followed by the payload in one transaction.
//!
//! This module is crate-private — consumers interact with [`Mcp9808`]
//! in `sensor.rs` instead.
//!
//! [`Mcp9808`]: crate::Mcp9808

use embedded_hal::i2c::I2c;

use crate::error::Mcp9808Error;

/// Register access primitives for one device on the bus.
///
/// Owns the I2C peripheral; every method takes `&mut self`, so a
/// pointer-write/read pair cannot be interleaved with another access
/// through the same driver.
#[derive(Debug)]
pub(crate) struct RegisterDriver<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterDriver<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Point at `register`, then read `buffer.len()` bytes from it.
    ///
    /// Two transactions rather than `write_read()`: the pointer write is
    /// terminated with a stop condition before the read begins.
    fn write_then_read(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.i2c.write(self.address, &[register])?;
        self.i2c.read(self.address, buffer)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Typed read/write helpers
    // -----------------------------------------------------------------------

    /// Read a 16-bit register as its raw big-endian byte pair.
    pub fn read_pair(&mut self, register: u8) -> Result<[u8; 2], Mcp9808Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.write_then_read(register, &mut buf)?;
        Ok(buf)
    }

    /// Read a 16-bit register as an integer.
    pub fn read_u16(&mut self, register: u8) -> Result<u16, Mcp9808Error<I2C::Error>> {
        Ok(u16::from_be_bytes(self.read_pair(register)?))
    }

    /// Read an 8-bit register.
    pub fn read_u8(&mut self, register: u8) -> Result<u8, Mcp9808Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.write_then_read(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a raw byte pair to a 16-bit register.
    pub fn write_pair(
        &mut self,
        register: u8,
        value: [u8; 2],
    ) -> Result<(), Mcp9808Error<I2C::Error>> {
        // Full write buffer: [register, msb, lsb]
        let buf = [register, value[0], value[1]];
        self.i2c.write(self.address, &buf)?;
        Ok(())
    }

    /// Write a single byte to an 8-bit register.
    pub fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Mcp9808Error<I2C::Error>> {
        self.i2c.write(self.address, &[register, value])?;
        Ok(())
    }
}
