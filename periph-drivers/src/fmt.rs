//! Logging macros
//!
//! Expand to `defmt` calls when the `defmt` feature is enabled and to
//! nothing otherwise, so drivers can log without forcing a logger on users.

macro_rules! trace {
    ($($e:expr),*) => {
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($e),*);
    }
}

pub(crate) use trace;

macro_rules! debug {
    ($($e:expr),*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($e),*);
    }
}

pub(crate) use debug;
