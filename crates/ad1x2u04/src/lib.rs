//! Provides a driver for the AD122U04/AD112U04 delta-sigma ADCs over their
//! UART command interface.
//!
//! The driver speaks the sync-prefixed command protocol over any
//! [`Transport`] and waits with an `embedded-hal` [`DelayNs`](embedded_hal::delay::DelayNs).
//! All configuration lives on the device and is read back on demand.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod registers;

mod drdy;
mod driver;
mod error;
mod profile;

#[cfg(feature = "ad122u04")]
pub mod ad122u04;

#[cfg(feature = "ad112u04")]
pub mod ad112u04;

#[cfg(test)]
mod mock;

pub use drdy::{DrdyPin, DrdyProbe, Readiness};
pub use driver::{Ad1x2u04, DEFAULT_TIMEOUT};
pub use error::{Error, InvalidSetting};
pub use profile::{Profile, AD112U04, AD122U04};
pub use registers::{DataRate, DataRateMode, Gain, GpioDirection, GpioPin, Mux, Vref};

/// Byte channel to the converter.
///
/// Calls block until the channel is satisfied or its own timeout fires.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Writes the whole frame.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buffer.len()` bytes, returning how many arrived before the timeout.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Drops everything sitting in the receive buffer.
    fn discard_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buffer)
    }

    fn discard_input(&mut self) -> Result<(), Self::Error> {
        (**self).discard_input()
    }
}
