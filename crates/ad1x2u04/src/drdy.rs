//! Data-ready detection.

use alloc::boxed::Box;

use embedded_hal::digital::InputPin;
use tracing::warn;

/// Reports whether a conversion result is waiting to be read.
pub trait DrdyProbe {
    fn is_ready(&mut self) -> bool;
}

impl<F: FnMut() -> bool> DrdyProbe for F {
    fn is_ready(&mut self) -> bool {
        self()
    }
}

/// Probe backed by a host input wired to GPIO2 of the converter.
///
/// The line is driven low while data is ready. A pin that fails to read
/// counts as not ready and is logged, so the wait ends in a timeout.
pub struct DrdyPin<P> {
    pin: P,
}

impl<P: InputPin> DrdyPin<P> {
    pub fn new(pin: P) -> Self {
        pin.into()
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> From<P> for DrdyPin<P> {
    fn from(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> DrdyProbe for DrdyPin<P> {
    fn is_ready(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!(error = ?e, "drdy pin read failed");
                false
            }
        }
    }
}

/// How the driver decides a conversion has finished.
#[derive(Default)]
pub enum Readiness {
    /// Poll the DRDY bit of configuration register 2.
    #[default]
    RegisterPoll,
    /// Ask a caller supplied probe, sleeping between attempts.
    ExternalProbe(Box<dyn DrdyProbe + Send>),
}

impl core::fmt::Debug for Readiness {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RegisterPoll => f.write_str("RegisterPoll"),
            Self::ExternalProbe(_) => f.write_str("ExternalProbe(..)"),
        }
    }
}

impl From<Option<Box<dyn DrdyProbe + Send>>> for Readiness {
    fn from(probe: Option<Box<dyn DrdyProbe + Send>>) -> Self {
        probe.map_or(Readiness::RegisterPoll, Readiness::ExternalProbe)
    }
}
