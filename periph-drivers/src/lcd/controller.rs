//! HD44780-compatible character LCD controller (I2C)
//!
//! Drives the text controller of an RGB character LCD module. The
//! controller takes commands and character data through two I2C registers.
//!
//! # State Caching
//!
//! The function set, display control and entry mode registers cannot be
//! read back, and each one packs several independent flags. The driver
//! caches all three in a [`ControlState`]: a setter computes the new state
//! with a pure bit transform, stores it, then sends the whole composite
//! command byte built from the cached value.
//!
//! # Timing
//!
//! Bring-up follows the controller's power-on sequence: a 50 ms settle,
//! function set three times (4.5 ms, then 150 µs between sends), display
//! on, clear (2 ms), entry mode. Clear and return-home each need 2 ms to
//! complete.

use embedded_hal::delay::DelayNs;
use periph_hal::I2cBus;

use crate::fmt::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed I2C address of the LCD controller
pub const LCD_ADDRESS: u8 = 0x3E;

/// Register receiving command bytes
pub const COMMAND_REGISTER: u8 = 0x80;

/// Register receiving character data
pub const DATA_REGISTER: u8 = 0x40;

/// Command opcodes
pub mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const CURSOR_SHIFT: u8 = 0x10;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// Flag bits combined with the opcodes above
pub mod flag {
    // Entry mode
    /// Text flows left to right
    pub const ENTRY_LEFT: u8 = 0x02;
    /// Shift the display on each write
    pub const ENTRY_SHIFT_INCREMENT: u8 = 0x01;

    // Display control
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    // Cursor / display shift
    /// Shift the display instead of the cursor
    pub const DISPLAY_MOVE: u8 = 0x08;
    pub const MOVE_RIGHT: u8 = 0x04;

    // Function set
    pub const TWO_LINE: u8 = 0x08;
    pub const DOTS_5X10: u8 = 0x04;
}

/// DDRAM base address of the second row
const ROW1_BASE: u8 = 0x40;

/// Number of display lines the glass is wired for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lines {
    One,
    #[default]
    Two,
}

/// Character cell height
///
/// 5x10 is only selectable on one-line displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CharSize {
    #[default]
    Dots5x8,
    Dots5x10,
}

/// Text flow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

/// Direction for cursor and display shifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftDirection {
    Left,
    Right,
}

/// LCD configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LcdConfig {
    pub lines: Lines,
    pub char_size: CharSize,
}

impl LcdConfig {
    /// Function set flag bits for this configuration
    pub fn function_bits(&self) -> u8 {
        match (self.lines, self.char_size) {
            (Lines::Two, _) => flag::TWO_LINE,
            (Lines::One, CharSize::Dots5x10) => flag::DOTS_5X10,
            (Lines::One, CharSize::Dots5x8) => 0,
        }
    }
}

/// Cached contents of the write-only control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    /// Function set flags (line count, dot size)
    pub function: u8,
    /// Display control flags (display, cursor, blink)
    pub display: u8,
    /// Entry mode flags (direction, autoscroll)
    pub entry: u8,
}

impl ControlState {
    /// Set or clear `bits` in the display control byte
    pub const fn with_display(self, bits: u8, on: bool) -> Self {
        Self {
            display: apply(self.display, bits, on),
            ..self
        }
    }

    /// Set or clear `bits` in the entry mode byte
    pub const fn with_entry(self, bits: u8, on: bool) -> Self {
        Self {
            entry: apply(self.entry, bits, on),
            ..self
        }
    }

    /// Complete function set command
    pub const fn function_command(&self) -> u8 {
        cmd::FUNCTION_SET | self.function
    }

    /// Complete display control command
    pub const fn display_command(&self) -> u8 {
        cmd::DISPLAY_CONTROL | self.display
    }

    /// Complete entry mode command
    pub const fn entry_command(&self) -> u8 {
        cmd::ENTRY_MODE_SET | self.entry
    }

    pub const fn is_display_on(&self) -> bool {
        self.display & flag::DISPLAY_ON != 0
    }

    pub const fn is_cursor_visible(&self) -> bool {
        self.display & flag::CURSOR_ON != 0
    }

    pub const fn is_blinking(&self) -> bool {
        self.display & flag::BLINK_ON != 0
    }

    pub const fn is_autoscroll(&self) -> bool {
        self.entry & flag::ENTRY_SHIFT_INCREMENT != 0
    }
}

const fn apply(byte: u8, bits: u8, on: bool) -> u8 {
    if on {
        byte | bits
    } else {
        byte & !bits
    }
}

/// Character LCD controller driver
///
/// Construction runs the full power-on sequence; a constructed `Lcd` is
/// always ready for use. The bus is borrowed per call, so the same bus can
/// also drive the backlight controller.
pub struct Lcd<D> {
    address: u8,
    state: ControlState,
    delay: D,
}

impl<D: DelayNs> Lcd<D> {
    /// Bring up a two-line, 5x8 display
    pub fn new<B: I2cBus>(bus: &mut B, delay: D) -> Result<Self, B::Error> {
        Self::with_config(bus, delay, LcdConfig::default())
    }

    /// Bring up the display with the given geometry
    ///
    /// Blocks for at least 57 ms. The first failed write aborts the
    /// sequence and is returned unchanged.
    pub fn with_config<B: I2cBus>(
        bus: &mut B,
        delay: D,
        config: LcdConfig,
    ) -> Result<Self, B::Error> {
        let mut lcd = Self {
            address: LCD_ADDRESS,
            state: ControlState {
                function: config.function_bits(),
                ..ControlState::default()
            },
            delay,
        };

        // Power-on settle
        lcd.delay.delay_ms(50);

        let function = lcd.state.function_command();
        lcd.command(bus, function)?;
        lcd.delay.delay_us(4500);
        lcd.command(bus, function)?;
        lcd.delay.delay_us(150);
        lcd.command(bus, function)?;

        lcd.state.display = flag::DISPLAY_ON;
        lcd.set_display_on(bus, true)?;

        lcd.clear(bus)?;

        lcd.state.entry = flag::ENTRY_LEFT;
        lcd.command(bus, lcd.state.entry_command())?;

        debug!("LCD ready, function set {=u8:#04x}", function);
        Ok(lcd)
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Cached control register contents
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Show or hide the underline cursor
    pub fn set_cursor_visible<B: I2cBus>(
        &mut self,
        bus: &mut B,
        visible: bool,
    ) -> Result<(), B::Error> {
        self.update_display(bus, flag::CURSOR_ON, visible)
    }

    /// Enable or disable the blinking block cursor
    pub fn set_blink<B: I2cBus>(&mut self, bus: &mut B, blink: bool) -> Result<(), B::Error> {
        self.update_display(bus, flag::BLINK_ON, blink)
    }

    /// Turn the display on or off; DDRAM contents are kept while off
    pub fn set_display_on<B: I2cBus>(&mut self, bus: &mut B, on: bool) -> Result<(), B::Error> {
        self.update_display(bus, flag::DISPLAY_ON, on)
    }

    /// Shift the display with every character written
    pub fn set_autoscroll<B: I2cBus>(
        &mut self,
        bus: &mut B,
        enabled: bool,
    ) -> Result<(), B::Error> {
        self.update_entry(bus, flag::ENTRY_SHIFT_INCREMENT, enabled)
    }

    /// Choose which way the cursor advances after a write
    pub fn set_text_direction<B: I2cBus>(
        &mut self,
        bus: &mut B,
        direction: TextDirection,
    ) -> Result<(), B::Error> {
        self.update_entry(bus, flag::ENTRY_LEFT, direction == TextDirection::LeftToRight)
    }

    /// Clear the display and return the cursor home
    pub fn clear<B: I2cBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.command(bus, cmd::CLEAR_DISPLAY)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Return the cursor home and undo any display shift
    pub fn home<B: I2cBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.command(bus, cmd::RETURN_HOME)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Place the cursor at `col` on `row`
    ///
    /// Row 0 is the first line; every other value selects the second line.
    pub fn move_cursor<B: I2cBus>(
        &mut self,
        bus: &mut B,
        col: u8,
        row: u8,
    ) -> Result<(), B::Error> {
        let base = if row == 0 { 0 } else { ROW1_BASE };
        self.command(bus, cmd::SET_DDRAM_ADDR | base | col)
    }

    /// Shift the whole display one cell without touching DDRAM
    pub fn scroll_display<B: I2cBus>(
        &mut self,
        bus: &mut B,
        direction: ShiftDirection,
    ) -> Result<(), B::Error> {
        self.command(bus, shift_command(flag::DISPLAY_MOVE, direction))
    }

    /// Move the cursor one cell without writing
    pub fn shift_cursor<B: I2cBus>(
        &mut self,
        bus: &mut B,
        direction: ShiftDirection,
    ) -> Result<(), B::Error> {
        self.command(bus, shift_command(0, direction))
    }

    /// Write one character code at the cursor
    pub fn write_char<B: I2cBus>(&mut self, bus: &mut B, code: u8) -> Result<(), B::Error> {
        bus.write_register(self.address, DATA_REGISTER, &[code])
    }

    /// Write every character of `text` in order
    ///
    /// # Panics
    /// If `text` contains a character above U+00FF, which has no 8-bit
    /// character code.
    pub fn write_text<B: I2cBus>(&mut self, bus: &mut B, text: &str) -> Result<(), B::Error> {
        for ch in text.chars() {
            let Ok(code) = u8::try_from(ch) else {
                panic!("character outside the 8-bit LCD character set");
            };
            self.write_char(bus, code)?;
        }
        Ok(())
    }

    fn update_display<B: I2cBus>(
        &mut self,
        bus: &mut B,
        bits: u8,
        on: bool,
    ) -> Result<(), B::Error> {
        self.state = self.state.with_display(bits, on);
        self.command(bus, self.state.display_command())
    }

    fn update_entry<B: I2cBus>(&mut self, bus: &mut B, bits: u8, on: bool) -> Result<(), B::Error> {
        self.state = self.state.with_entry(bits, on);
        self.command(bus, self.state.entry_command())
    }

    fn command<B: I2cBus>(&mut self, bus: &mut B, value: u8) -> Result<(), B::Error> {
        trace!("LCD command {=u8:#04x}", value);
        bus.write_register(self.address, COMMAND_REGISTER, &[value])
    }
}

const fn shift_command(target: u8, direction: ShiftDirection) -> u8 {
    let dir = match direction {
        ShiftDirection::Left => 0,
        ShiftDirection::Right => flag::MOVE_RIGHT,
    };
    cmd::CURSOR_SHIFT | target | dir
}
