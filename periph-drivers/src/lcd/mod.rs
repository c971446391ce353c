//! RGB character LCD module drivers
//!
//! The module carries two I2C devices: an HD44780-compatible text
//! controller and a PWM LED controller for the RGB backlight.

pub mod backlight;
pub mod controller;
pub mod display;

pub use backlight::{Backlight, LedOutput, BACKLIGHT_ADDRESS};
pub use controller::{
    CharSize, ControlState, Lcd, LcdConfig, Lines, ShiftDirection, TextDirection, LCD_ADDRESS,
};
pub use display::Display;
