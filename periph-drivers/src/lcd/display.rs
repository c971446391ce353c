//! RGB character display module
//!
//! Binds the text controller and the backlight controller of one module to
//! the bus they share.

use core::fmt;

use embedded_hal::delay::DelayNs;
use periph_hal::{I2cBus, ScanResult};

use super::backlight::{Backlight, LedOutput};
use super::controller::{Lcd, LcdConfig, ShiftDirection, TextDirection};

/// RGB LCD module: text controller plus backlight on one bus
pub struct Display<B, D> {
    bus: B,
    lcd: Lcd<D>,
    backlight: Backlight,
}

impl<B: I2cBus, D: DelayNs> Display<B, D> {
    /// Initialize the backlight, then the two-line text controller
    pub fn new(bus: B, delay: D) -> Result<Self, B::Error> {
        Self::with_config(bus, delay, LcdConfig::default())
    }

    /// Initialize the backlight, then the text controller with `config`
    pub fn with_config(mut bus: B, delay: D, config: LcdConfig) -> Result<Self, B::Error> {
        let backlight = Backlight::new(&mut bus)?;
        let lcd = Lcd::with_config(&mut bus, delay, config)?;
        Ok(Self::from_parts(bus, lcd, backlight))
    }

    /// Assemble a display from drivers that are already initialized
    pub fn from_parts(bus: B, lcd: Lcd<D>, backlight: Backlight) -> Self {
        Self {
            bus,
            lcd,
            backlight,
        }
    }

    /// Split back into the bus and both drivers
    pub fn into_parts(self) -> (B, Lcd<D>, Backlight) {
        (self.bus, self.lcd, self.backlight)
    }

    /// Release the bus, dropping both drivers
    pub fn release(self) -> B {
        self.bus
    }

    /// Text controller driver
    pub fn lcd(&self) -> &Lcd<D> {
        &self.lcd
    }

    /// Backlight driver
    pub fn backlight(&self) -> &Backlight {
        &self.backlight
    }

    /// List every responding device on the shared bus
    pub fn scan(&mut self) -> ScanResult {
        self.bus.scan()
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), B::Error> {
        self.lcd.write_text(&mut self.bus, text)
    }

    pub fn write_char(&mut self, code: u8) -> Result<(), B::Error> {
        self.lcd.write_char(&mut self.bus, code)
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<(), B::Error> {
        self.lcd.set_cursor_visible(&mut self.bus, visible)
    }

    pub fn set_blink(&mut self, blink: bool) -> Result<(), B::Error> {
        self.lcd.set_blink(&mut self.bus, blink)
    }

    pub fn set_autoscroll(&mut self, enabled: bool) -> Result<(), B::Error> {
        self.lcd.set_autoscroll(&mut self.bus, enabled)
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), B::Error> {
        self.lcd.set_display_on(&mut self.bus, on)
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) -> Result<(), B::Error> {
        self.lcd.set_text_direction(&mut self.bus, direction)
    }

    pub fn clear(&mut self) -> Result<(), B::Error> {
        self.lcd.clear(&mut self.bus)
    }

    pub fn home(&mut self) -> Result<(), B::Error> {
        self.lcd.home(&mut self.bus)
    }

    pub fn move_cursor(&mut self, col: u8, row: u8) -> Result<(), B::Error> {
        self.lcd.move_cursor(&mut self.bus, col, row)
    }

    pub fn scroll_display(&mut self, direction: ShiftDirection) -> Result<(), B::Error> {
        self.lcd.scroll_display(&mut self.bus, direction)
    }

    pub fn shift_cursor(&mut self, direction: ShiftDirection) -> Result<(), B::Error> {
        self.lcd.shift_cursor(&mut self.bus, direction)
    }

    pub fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<(), B::Error> {
        self.backlight.set_color(&mut self.bus, red, green, blue)
    }

    /// Blink the backlight, see [`Backlight::blink`]
    pub fn blink_backlight(&mut self) -> Result<(), B::Error> {
        self.backlight.blink(&mut self.bus)
    }

    /// Program the backlight group blink, see [`Backlight::set_blink`]
    pub fn set_backlight_blink(&mut self, period: u8, duty: u8) -> Result<(), B::Error> {
        self.backlight.set_blink(&mut self.bus, period, duty)
    }

    pub fn set_backlight_output(&mut self, output: LedOutput) -> Result<(), B::Error> {
        self.backlight.set_output(&mut self.bus, output)
    }
}

/// Formatted output at the cursor
///
/// Fails with [`fmt::Error`] before writing anything if the text contains
/// a character above U+00FF, and on any bus error.
impl<B: I2cBus, D: DelayNs> fmt::Write for Display<B, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.chars().any(|ch| u8::try_from(ch).is_err()) {
            return Err(fmt::Error);
        }
        self.write_text(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::lcd::backlight::{reg, BACKLIGHT_ADDRESS};
    use crate::lcd::controller::{COMMAND_REGISTER, DATA_REGISTER, LCD_ADDRESS};
    use crate::testing::{rig, Op};
    use core::fmt::Write;
    use periph_hal::I2cBusError;
    use std::vec;

    #[test]
    fn test_init_order() {
        let (journal, bus, delay) = rig();

        let _display = Display::new(bus, delay).unwrap();

        let ops = journal.ops();
        let targets: vec::Vec<u8> = ops
            .iter()
            .filter_map(|op| match op {
                Op::WriteRegister { address, .. } => Some(*address),
                _ => None,
            })
            .collect();
        // Backlight first (three double writes), then the text controller
        assert_eq!(&targets[..6], &[BACKLIGHT_ADDRESS; 6]);
        assert!(targets[6..].iter().all(|&a| a == LCD_ADDRESS));
        assert_eq!(
            journal.register_payloads(LCD_ADDRESS, COMMAND_REGISTER),
            vec![
                vec![0x28],
                vec![0x28],
                vec![0x28],
                vec![0x0C],
                vec![0x01],
                vec![0x06]
            ]
        );
    }

    #[test]
    fn test_pass_through() {
        let (journal, bus, delay) = rig();
        let mut display = Display::new(bus, delay).unwrap();
        journal.clear();

        display.set_color(255, 0, 128).unwrap();
        display.move_cursor(3, 1).unwrap();
        display.write_text("ok").unwrap();
        display.set_cursor_visible(true).unwrap();

        assert_eq!(
            journal.register_payloads(BACKLIGHT_ADDRESS, reg::RED),
            vec![vec![], vec![255]]
        );
        assert_eq!(
            journal.register_payloads(LCD_ADDRESS, COMMAND_REGISTER),
            vec![vec![0xC3], vec![0x0E]]
        );
        assert_eq!(
            journal.register_payloads(LCD_ADDRESS, DATA_REGISTER),
            vec![vec![b'o'], vec![b'k']]
        );
        assert!(display.lcd().state().is_cursor_visible());
    }

    #[test]
    fn test_blink_backlight() {
        let (journal, bus, delay) = rig();
        let mut display = Display::new(bus, delay).unwrap();
        journal.clear();

        display.blink_backlight().unwrap();

        assert_eq!(
            journal.register_payloads(BACKLIGHT_ADDRESS, reg::GRPFREQ),
            vec![vec![], vec![0x17]]
        );
    }

    #[test]
    fn test_group_blink_pass_through() {
        let (journal, bus, delay) = rig();
        let mut display = Display::new(bus, delay).unwrap();
        journal.clear();

        display.set_backlight_output(LedOutput::PwmGroup).unwrap();
        display.set_backlight_blink(0x2F, 0x40).unwrap();
        display.shift_cursor(ShiftDirection::Left).unwrap();

        assert_eq!(
            journal.register_payloads(BACKLIGHT_ADDRESS, reg::LEDOUT),
            vec![vec![], vec![0xFF]]
        );
        assert_eq!(
            journal.register_payloads(BACKLIGHT_ADDRESS, reg::GRPFREQ),
            vec![vec![], vec![0x2F]]
        );
        assert_eq!(
            journal.register_payloads(BACKLIGHT_ADDRESS, reg::GRPPWM),
            vec![vec![], vec![0x40]]
        );
        assert_eq!(
            journal.register_payloads(LCD_ADDRESS, COMMAND_REGISTER),
            vec![vec![0x10]]
        );
    }

    #[test]
    fn test_fmt_write() {
        let (journal, bus, delay) = rig();
        let mut display = Display::new(bus, delay).unwrap();
        journal.clear();

        write!(display, "T={}", 7).unwrap();

        assert_eq!(
            journal.register_payloads(LCD_ADDRESS, DATA_REGISTER),
            vec![vec![b'T'], vec![b'='], vec![b'7']]
        );
    }

    #[test]
    fn test_fmt_write_rejects_wide_chars() {
        let (journal, bus, delay) = rig();
        let mut display = Display::new(bus, delay).unwrap();
        journal.clear();

        assert!(write!(display, "5€").is_err());
        assert!(journal.ops().is_empty());
    }

    #[test]
    fn test_init_failure() {
        let (_, mut bus, delay) = rig();
        bus.fail_after(3);

        let result = Display::new(bus, delay);
        assert!(matches!(result, Err(I2cBusError::Nack)));
    }

    #[test]
    fn test_failure_propagates() {
        let (journal, bus, delay) = rig();
        let display = Display::new(bus, delay).unwrap();
        let (mut bus, lcd, backlight) = display.into_parts();
        bus.fail_after(0);
        journal.clear();

        let mut display = Display::from_parts(bus, lcd, backlight);
        assert_eq!(display.clear(), Err(I2cBusError::Nack));
        assert_eq!(display.set_color(1, 1, 1), Err(I2cBusError::Nack));
        assert!(journal.ops().is_empty());
    }
}
