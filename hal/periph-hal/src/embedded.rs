//! `embedded-hal` 1.0 bus adapter
//!
//! Lets any `embedded_hal::i2c::I2c` implementation (chip HALs, bus sharing
//! wrappers from `embedded-hal-bus`, mocks) drive the peripheral drivers.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::i2c::{I2cBus, I2cBusError};

impl From<ErrorKind> for I2cBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

/// [`I2cBus`] implementation over an `embedded-hal` I2C bus
pub struct EmbeddedHalBus<T> {
    inner: T,
}

impl<T: I2c> EmbeddedHalBus<T> {
    /// Wrap an `embedded-hal` bus
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped bus
    pub fn inner(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap and return the wrapped bus
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T: I2c> I2cBus for EmbeddedHalBus<T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner
            .write(address, data)
            .map_err(|e| I2cBusError::from(e.kind()))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner
            .read(address, buf)
            .map_err(|e| I2cBusError::from(e.kind()))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner
            .write_read(address, write_data, read_buf)
            .map_err(|e| I2cBusError::from(e.kind()))
    }
}
