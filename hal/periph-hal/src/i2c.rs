//! I2C bus abstractions
//!
//! Provides the bus trait the peripheral drivers are written against.
//! Only `write`, `read` and `write_read` are required; the register-level
//! helpers are built on top of them.

use heapless::Vec;

/// Largest payload accepted by [`I2cBus::write_register`]
pub const MAX_REGISTER_PAYLOAD: usize = 32;

/// First address probed by [`I2cBus::scan`] (0x00-0x07 are reserved)
pub const SCAN_FIRST_ADDRESS: u8 = 0x08;

/// Last address probed by [`I2cBus::scan`] (0x78-0x7F are reserved)
pub const SCAN_LAST_ADDRESS: u8 = 0x77;

/// Addresses that acknowledged a scan
pub type ScanResult = Vec<u8, { (SCAN_LAST_ADDRESS - SCAN_FIRST_ADDRESS + 1) as usize }>;

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. A single bus is typically shared by several
/// drivers, so drivers borrow it per call instead of owning it.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Write `data` to `register` on the device at `address`
    ///
    /// Sends the register pointer followed by the payload in one write.
    /// An empty payload sends only the register pointer.
    ///
    /// # Panics
    /// If `data` is longer than [`MAX_REGISTER_PAYLOAD`].
    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        assert!(
            data.len() <= MAX_REGISTER_PAYLOAD,
            "register payload exceeds MAX_REGISTER_PAYLOAD"
        );

        let mut frame = [0u8; MAX_REGISTER_PAYLOAD + 1];
        frame[0] = register;
        frame[1..=data.len()].copy_from_slice(data);
        self.write(address, &frame[..=data.len()])
    }

    /// Read `buf.len()` bytes starting at `register` on the device at `address`
    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write_read(address, &[register], buf)
    }

    /// Probe every non-reserved address with a one-byte read
    ///
    /// Purely informational: a device that NACKs reads is not reported.
    fn scan(&mut self) -> ScanResult {
        let mut found = ScanResult::new();
        for address in SCAN_FIRST_ADDRESS..=SCAN_LAST_ADDRESS {
            let mut probe = [0u8; 1];
            if self.read(address, &mut probe).is_ok() {
                // Capacity covers the whole probed range
                let _ = found.push(address);
            }
        }
        found
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }

    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        T::write_register(self, address, register, data)
    }

    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::read_register(self, address, register, buf)
    }

    fn scan(&mut self) -> ScanResult {
        T::scan(self)
    }
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Timeout
    Timeout,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}
