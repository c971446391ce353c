//! LIS3MDL 3-axis magnetometer (I2C)
//!
//! The LIS3MDL exposes its configuration as four control registers and its
//! measurements as little-endian 16-bit two's complement register pairs.
//!
//! # Register Protocol
//!
//! The part addresses registers by a leading pointer byte in the write
//! itself rather than through a separate register phase:
//! - Register write: `[register, value]`
//! - Register read: write `[register]`, then read one byte
//! - 16-bit read: write `[register | 0x80]` (auto-increment), then read two bytes
//!
//! # Configuration
//!
//! Setters are stateless: each one writes the complete register value for
//! its field with every other bit cleared. Operating mode and output data
//! rate share `CTRL_REG1`, so whichever is written last determines the
//! other field's bits in that register.
//!
//! Setter inputs are masked to the width of their field before shifting;
//! see [`Field::encode`].

use periph_hal::I2cBus;

use crate::fmt::{debug, trace};
use crate::signed::i16_from_le;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Address with SDO/SA1 pulled high
pub const LIS3MDL_DEFAULT_ADDRESS: u8 = 0x1E;

/// Address with SDO/SA1 pulled low
pub const LIS3MDL_ALT_ADDRESS: u8 = 0x1C;

/// LIS3MDL register addresses
pub mod reg {
    /// Hard-iron offset, X low byte
    pub const OFFSET_X_REG_L: u8 = 0x05;
    /// Hard-iron offset, X high byte
    pub const OFFSET_X_REG_H: u8 = 0x06;
    /// Hard-iron offset, Y low byte
    pub const OFFSET_Y_REG_L: u8 = 0x07;
    /// Hard-iron offset, Y high byte
    pub const OFFSET_Y_REG_H: u8 = 0x08;
    /// Hard-iron offset, Z low byte
    pub const OFFSET_Z_REG_L: u8 = 0x09;
    /// Hard-iron offset, Z high byte
    pub const OFFSET_Z_REG_H: u8 = 0x0A;
    /// XY operating mode, output data rate
    pub const CTRL_REG1: u8 = 0x20;
    /// Full scale
    pub const CTRL_REG2: u8 = 0x21;
    /// Measurement mode
    pub const CTRL_REG3: u8 = 0x22;
    /// Z operating mode
    pub const CTRL_REG4: u8 = 0x23;
    /// Data available / overrun flags
    pub const STATUS_REG: u8 = 0x27;
    pub const OUT_X_L: u8 = 0x28;
    pub const OUT_X_H: u8 = 0x29;
    pub const OUT_Y_L: u8 = 0x2A;
    pub const OUT_Y_H: u8 = 0x2B;
    pub const OUT_Z_L: u8 = 0x2C;
    pub const OUT_Z_H: u8 = 0x2D;
}

/// Register pointer flag requesting address auto-increment
const AUTO_INCREMENT: u8 = 0x80;

/// A setting's location inside a control register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register holding the field
    pub register: u8,
    /// Position of the field's lowest bit
    pub shift: u8,
    /// Field mask before shifting
    pub mask: u8,
}

impl Field {
    /// Register value carrying `value` in this field and zero elsewhere
    ///
    /// Bits of `value` above the field width are silently dropped, so an
    /// oversized value never spills into a neighbouring field.
    pub const fn encode(&self, value: u8) -> u8 {
        (value & self.mask) << self.shift
    }
}

/// Register map of the configurable settings
pub mod field {
    use super::{reg, Field};

    /// Full scale, `CTRL_REG2[6:5]`
    pub const FULL_SCALE: Field = Field {
        register: reg::CTRL_REG2,
        shift: 5,
        mask: 0b11,
    };
    /// X/Y operating mode, `CTRL_REG1[6:5]`
    pub const OPERATING_MODE_XY: Field = Field {
        register: reg::CTRL_REG1,
        shift: 5,
        mask: 0b11,
    };
    /// Z operating mode, `CTRL_REG4[3:2]`
    pub const OPERATING_MODE_Z: Field = Field {
        register: reg::CTRL_REG4,
        shift: 2,
        mask: 0b11,
    };
    /// Output data rate, `CTRL_REG1[4:1]`
    pub const DATA_RATE: Field = Field {
        register: reg::CTRL_REG1,
        shift: 1,
        mask: 0b1111,
    };
    /// Measurement mode, `CTRL_REG3[1:0]`
    pub const MEASUREMENT_MODE: Field = Field {
        register: reg::CTRL_REG3,
        shift: 0,
        mask: 0b11,
    };
}

/// Full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum FullScale {
    /// ±4 gauss
    #[default]
    Gauss4 = 0b00,
    /// ±8 gauss
    Gauss8 = 0b01,
    /// ±12 gauss
    Gauss12 = 0b10,
    /// ±16 gauss
    Gauss16 = 0b11,
}

/// Performance mode, applied to all three axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum OperatingMode {
    LowPower = 0b00,
    Medium = 0b01,
    #[default]
    High = 0b10,
    UltraHigh = 0b11,
}

/// Output data rate
///
/// Values are the `DO` bits pre-shifted by one with `FAST_ODR` clear,
/// which is why they all end in a zero bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DataRate {
    Hz0_625 = 0b0000,
    Hz1_25 = 0b0010,
    Hz2_5 = 0b0100,
    #[default]
    Hz5 = 0b0110,
    Hz10 = 0b1000,
    Hz20 = 0b1010,
    Hz40 = 0b1100,
    Hz80 = 0b1110,
}

/// Conversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MeasurementMode {
    #[default]
    Continuous = 0b00,
    Single = 0b01,
    PowerDown = 0b10,
    /// Alternate power-down encoding
    PowerDownAlt = 0b11,
}

/// Measurement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Low byte of the axis output register pair
    pub const fn output_register(self) -> u8 {
        match self {
            Axis::X => reg::OUT_X_L,
            Axis::Y => reg::OUT_Y_L,
            Axis::Z => reg::OUT_Z_L,
        }
    }

    /// Bit index of the axis in `STATUS_REG`
    const fn status_bit(self) -> u8 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Parsed STATUS_REG
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// New X sample available
    pub x_available: bool,
    /// New Y sample available
    pub y_available: bool,
    /// New Z sample available
    pub z_available: bool,
    /// New sample available on all axes
    pub xyz_available: bool,
    /// X sample overwritten before it was read
    pub x_overrun: bool,
    /// Y sample overwritten before it was read
    pub y_overrun: bool,
    /// Z sample overwritten before it was read
    pub z_overrun: bool,
    /// Any axis overwritten before it was read
    pub xyz_overrun: bool,
}

impl Status {
    /// Parse from raw STATUS_REG value
    pub fn from_register(value: u8) -> Self {
        Self {
            x_available: (value & (1 << 0)) != 0,
            y_available: (value & (1 << 1)) != 0,
            z_available: (value & (1 << 2)) != 0,
            xyz_available: (value & (1 << 3)) != 0,
            x_overrun: (value & (1 << 4)) != 0,
            y_overrun: (value & (1 << 5)) != 0,
            z_overrun: (value & (1 << 6)) != 0,
            xyz_overrun: (value & (1 << 7)) != 0,
        }
    }

    /// Check whether `axis` has a sample ready
    pub fn is_available(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_available,
            Axis::Y => self.y_available,
            Axis::Z => self.z_available,
        }
    }
}

/// LIS3MDL configuration applied at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lis3mdlConfig {
    /// 7-bit I2C address
    pub address: u8,
    pub full_scale: FullScale,
    pub operating_mode: OperatingMode,
    pub data_rate: DataRate,
    pub measurement_mode: MeasurementMode,
}

impl Default for Lis3mdlConfig {
    fn default() -> Self {
        Self {
            address: LIS3MDL_DEFAULT_ADDRESS,
            full_scale: FullScale::Gauss4,
            operating_mode: OperatingMode::High,
            data_rate: DataRate::Hz5,
            measurement_mode: MeasurementMode::Continuous,
        }
    }
}

/// LIS3MDL driver
///
/// Holds only the device address; the bus is borrowed per call so it can
/// be shared with other drivers.
#[derive(Debug)]
pub struct Lis3mdl {
    address: u8,
}

impl Lis3mdl {
    /// Create and configure a magnetometer at the default address
    ///
    /// Applies ±4 gauss, high-performance mode, 5 Hz and continuous
    /// conversion, in that order.
    pub fn new<B: I2cBus>(bus: &mut B) -> Result<Self, B::Error> {
        Self::with_config(bus, Lis3mdlConfig::default())
    }

    /// Create and configure a magnetometer at `address` with default settings
    pub fn with_address<B: I2cBus>(bus: &mut B, address: u8) -> Result<Self, B::Error> {
        Self::with_config(
            bus,
            Lis3mdlConfig {
                address,
                ..Lis3mdlConfig::default()
            },
        )
    }

    /// Create and configure a magnetometer
    ///
    /// Writes full scale, operating mode, output data rate and measurement
    /// mode in that order. The first failed write aborts construction.
    ///
    /// # Panics
    /// If `config.address` is not a 7-bit address.
    pub fn with_config<B: I2cBus>(bus: &mut B, config: Lis3mdlConfig) -> Result<Self, B::Error> {
        assert!(config.address <= 0x7F, "I2C address must be 7-bit");

        let mut mag = Self {
            address: config.address,
        };
        mag.set_full_scale(bus, config.full_scale)?;
        mag.set_operating_mode(bus, config.operating_mode)?;
        mag.set_output_data_rate(bus, config.data_rate)?;
        mag.set_measurement_mode(bus, config.measurement_mode)?;

        debug!("LIS3MDL configured at {=u8:#x}", mag.address);
        Ok(mag)
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Set the full-scale range
    pub fn set_full_scale<B: I2cBus>(
        &mut self,
        bus: &mut B,
        fs: FullScale,
    ) -> Result<(), B::Error> {
        self.write_field(bus, field::FULL_SCALE, fs as u8)
    }

    /// Set the operating mode on both the X/Y and Z control registers
    pub fn set_operating_mode<B: I2cBus>(
        &mut self,
        bus: &mut B,
        mode: OperatingMode,
    ) -> Result<(), B::Error> {
        self.write_field(bus, field::OPERATING_MODE_XY, mode as u8)?;
        self.write_field(bus, field::OPERATING_MODE_Z, mode as u8)
    }

    /// Set the output data rate
    ///
    /// Rewrites all of `CTRL_REG1`, clearing the X/Y operating mode bits.
    pub fn set_output_data_rate<B: I2cBus>(
        &mut self,
        bus: &mut B,
        rate: DataRate,
    ) -> Result<(), B::Error> {
        self.write_field(bus, field::DATA_RATE, rate as u8)
    }

    /// Set the conversion mode
    pub fn set_measurement_mode<B: I2cBus>(
        &mut self,
        bus: &mut B,
        mode: MeasurementMode,
    ) -> Result<(), B::Error> {
        self.write_field(bus, field::MEASUREMENT_MODE, mode as u8)
    }

    /// Read and parse STATUS_REG
    pub fn status<B: I2cBus>(&mut self, bus: &mut B) -> Result<Status, B::Error> {
        let raw = self.read_register(bus, reg::STATUS_REG)?;
        Ok(Status::from_register(raw))
    }

    /// Read one axis if a new sample is available
    ///
    /// Returns `Ok(None)` when the axis' data-available flag is clear. That
    /// is not an error; poll again later.
    pub fn read_axis<B: I2cBus>(
        &mut self,
        bus: &mut B,
        axis: Axis,
    ) -> Result<Option<i16>, B::Error> {
        let status = self.read_register(bus, reg::STATUS_REG)?;
        if status & (1 << axis.status_bit()) == 0 {
            trace!("LIS3MDL {} not ready (status {=u8:#x})", axis, status);
            return Ok(None);
        }

        self.read_i16(bus, axis.output_register()).map(Some)
    }

    /// Read the X axis if available
    pub fn x<B: I2cBus>(&mut self, bus: &mut B) -> Result<Option<i16>, B::Error> {
        self.read_axis(bus, Axis::X)
    }

    /// Read the Y axis if available
    pub fn y<B: I2cBus>(&mut self, bus: &mut B) -> Result<Option<i16>, B::Error> {
        self.read_axis(bus, Axis::Y)
    }

    /// Read the Z axis if available
    pub fn z<B: I2cBus>(&mut self, bus: &mut B) -> Result<Option<i16>, B::Error> {
        self.read_axis(bus, Axis::Z)
    }

    fn write_field<B: I2cBus>(
        &mut self,
        bus: &mut B,
        field: Field,
        value: u8,
    ) -> Result<(), B::Error> {
        self.write_register(bus, field.register, field.encode(value))
    }

    fn write_register<B: I2cBus>(
        &mut self,
        bus: &mut B,
        register: u8,
        value: u8,
    ) -> Result<(), B::Error> {
        bus.write(self.address, &[register, value])
    }

    fn read_register<B: I2cBus>(&mut self, bus: &mut B, register: u8) -> Result<u8, B::Error> {
        bus.write(self.address, &[register])?;
        let mut buf = [0u8; 1];
        bus.read(self.address, &mut buf)?;
        Ok(buf[0])
    }

    fn read_i16<B: I2cBus>(&mut self, bus: &mut B, register: u8) -> Result<i16, B::Error> {
        bus.write(self.address, &[register | AUTO_INCREMENT])?;
        let mut buf = [0u8; 2];
        bus.read(self.address, &mut buf)?;
        Ok(i16_from_le(buf))
    }
}
