//! Periph Hardware Abstraction Layer
//!
//! This crate defines the bus abstraction that the peripheral drivers in
//! `periph-drivers` are written against. Drivers never talk to a concrete
//! I2C peripheral; they talk to [`I2cBus`], which any board support crate
//! (or the [`embedded::EmbeddedHalBus`] adapter) can provide.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  periph-drivers (LCD, backlight, LIS3MDL)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  periph-hal (this crate - I2cBus)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ EmbeddedHalBus│       │ board-specific│
//! │ (embedded-hal)│       │   I2cBus impl │
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod embedded;
pub mod i2c;

// Re-export key items at crate root for convenience
pub use embedded::EmbeddedHalBus;
pub use i2c::{I2cBus, I2cBusError, ScanResult};
