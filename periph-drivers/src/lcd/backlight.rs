//! RGB backlight controller (PCA9633-style 4-channel PWM LED driver)
//!
//! The backlight of the RGB LCD module sits behind its own I2C address.
//! Three of the four PWM channels drive the red, green and blue LEDs.
//!
//! Every register write is preceded by an empty write to the same
//! register; the module's controller expects the pointer on its own first.

use periph_hal::I2cBus;

use crate::fmt::{debug, trace};

/// Fixed I2C address of the backlight controller
pub const BACKLIGHT_ADDRESS: u8 = 0x62;

/// Backlight controller register addresses
pub mod reg {
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    /// PWM0
    pub const BLUE: u8 = 0x02;
    /// PWM1
    pub const GREEN: u8 = 0x03;
    /// PWM2
    pub const RED: u8 = 0x04;
    /// Group duty cycle
    pub const GRPPWM: u8 = 0x06;
    /// Group blink period
    pub const GRPFREQ: u8 = 0x07;
    /// Per-channel output state
    pub const LEDOUT: u8 = 0x08;
}

/// Blink period used by [`Backlight::blink`], about one second
const BLINK_PERIOD: u8 = 0x17;

/// Duty cycle used by [`Backlight::blink`], 50%
const BLINK_DUTY: u8 = 0x7F;

/// Output state applied to all LED channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedOutput {
    /// Fully off
    Off = 0x00,
    /// Fully on, PWM ignored
    On = 0x55,
    /// Brightness from the channel PWM registers
    Pwm = 0xAA,
    /// Channel PWM plus group dimming/blinking
    PwmGroup = 0xFF,
}

/// RGB backlight driver
#[derive(Debug)]
pub struct Backlight {
    address: u8,
}

impl Backlight {
    /// Initialize the backlight controller
    ///
    /// Clears both mode registers and puts every channel under PWM control.
    pub fn new<B: I2cBus>(bus: &mut B) -> Result<Self, B::Error> {
        let mut backlight = Self {
            address: BACKLIGHT_ADDRESS,
        };
        backlight.set_register(bus, reg::MODE1, 0)?;
        backlight.set_register(bus, reg::MODE2, 0)?;
        backlight.set_output(bus, LedOutput::Pwm)?;

        debug!("Backlight ready at {=u8:#x}", backlight.address);
        Ok(backlight)
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Set the backlight color
    ///
    /// Channels are written red, green, blue as three separate writes, so
    /// the color passes through intermediate mixes while updating.
    pub fn set_color<B: I2cBus>(
        &mut self,
        bus: &mut B,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), B::Error> {
        self.set_register(bus, reg::RED, red)?;
        self.set_register(bus, reg::GREEN, green)?;
        self.set_register(bus, reg::BLUE, blue)
    }

    /// Blink at roughly 1 Hz with a 50% duty cycle
    ///
    /// Only channels in [`LedOutput::PwmGroup`] follow the group blink.
    pub fn blink<B: I2cBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.set_blink(bus, BLINK_PERIOD, BLINK_DUTY)
    }

    /// Program the group blink period and duty cycle registers
    pub fn set_blink<B: I2cBus>(
        &mut self,
        bus: &mut B,
        period: u8,
        duty: u8,
    ) -> Result<(), B::Error> {
        self.set_register(bus, reg::GRPFREQ, period)?;
        self.set_register(bus, reg::GRPPWM, duty)
    }

    /// Set how every channel's output is driven
    pub fn set_output<B: I2cBus>(
        &mut self,
        bus: &mut B,
        output: LedOutput,
    ) -> Result<(), B::Error> {
        self.set_register(bus, reg::LEDOUT, output as u8)
    }

    fn set_register<B: I2cBus>(
        &mut self,
        bus: &mut B,
        register: u8,
        value: u8,
    ) -> Result<(), B::Error> {
        trace!("Backlight reg {=u8:#04x} <- {=u8:#04x}", register, value);
        bus.write_register(self.address, register, &[])?;
        bus.write_register(self.address, register, &[value])
    }
}
