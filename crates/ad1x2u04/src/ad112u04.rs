//! 16 bit AD112U04. Same command set as the AD122U04 with two byte results.

use embedded_hal::delay::DelayNs;

use crate::{Ad1x2u04, Transport};

pub use crate::profile::AD112U04 as PROFILE;

/// AD112U04 driver
pub type Ad112u04<T, D> = Ad1x2u04<T, D>;

/// Creates a new driver from an open transport.
pub fn new<T: Transport, D: DelayNs>(transport: T, delay: D) -> Ad112u04<T, D> {
    Ad1x2u04::new(transport, delay, PROFILE)
}
