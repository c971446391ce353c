//! Register-level peripheral drivers
//!
//! This crate provides drivers for I2C peripherals written against the
//! [`periph_hal::I2cBus`] trait:
//!
//! - RGB character LCD module (text controller + RGB backlight)
//! - LIS3MDL 3-axis magnetometer
//!
//! Drivers borrow the bus for each call instead of owning it, so several
//! drivers can share one bus. Bus errors are returned unchanged.

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod lcd;
pub mod magnetometer;
pub mod signed;

#[cfg(test)]
mod testing;

pub use lcd::{Backlight, Display, Lcd};
pub use magnetometer::Lis3mdl;
pub use signed::to_signed;
