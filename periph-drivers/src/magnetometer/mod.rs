//! Magnetometer driver implementations

pub mod lis3mdl;

pub use lis3mdl::{
    Axis, DataRate, FullScale, Lis3mdl, Lis3mdlConfig, MeasurementMode, OperatingMode, Status,
    LIS3MDL_DEFAULT_ADDRESS,
};
