//! Register access contract and the transports that provide it.

use embedded_hal::i2c::I2c;

/// Single and burst register access on one device.
///
/// The device address is fixed by the implementation; every call is blocking
/// and either completes or returns the transport's own error.
pub trait RegisterBus {
    type Error: core::fmt::Debug;

    /// Reads one register.
    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Reads `buffer.len()` consecutive registers starting at `register`.
    fn read_bytes(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes one register.
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

/// [`RegisterBus`] over any `embedded-hal` I2C bus.
#[derive(Debug)]
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        I2cBus { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cBus<I2C> {
    type Error = I2C::Error;

    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8];
        self.i2c.write_read(self.address, &[register], &mut buffer)?;
        Ok(buffer[0])
    }

    fn read_bytes(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }
}

/// Raspberry Pi I2C through `rppal`. The slave address must already be set
/// with `set_slave_address`.
// Inherent methods are called by path: with the `hal` feature rppal's I2c
// also implements the embedded-hal trait, which has a `write_read` too.
#[cfg(feature = "rppal")]
impl RegisterBus for rppal::i2c::I2c {
    type Error = rppal::i2c::Error;

    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        rppal::i2c::I2c::smbus_read_byte(self, register)
    }

    fn read_bytes(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        rppal::i2c::I2c::write_read(self, &[register], buffer)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        rppal::i2c::I2c::smbus_write_byte(self, register, value)
    }
}

/// Bus number from a Linux I2C device path such as `/dev/i2c-1`.
///
/// A bare number (`"1"`) is accepted as well.
pub fn bus_number(path: &str) -> Option<u8> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let number = name.strip_prefix("i2c-").unwrap_or(name);
    number.parse().ok()
}
