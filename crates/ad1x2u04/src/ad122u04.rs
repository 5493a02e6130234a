//! 24 bit AD122U04.

use embedded_hal::delay::DelayNs;

use crate::{Ad1x2u04, Transport};

pub use crate::profile::AD122U04 as PROFILE;

/// AD122U04 driver
pub type Ad122u04<T, D> = Ad1x2u04<T, D>;

/// Creates a new driver from an open transport.
pub fn new<T: Transport, D: DelayNs>(transport: T, delay: D) -> Ad122u04<T, D> {
    Ad1x2u04::new(transport, delay, PROFILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockDevice};

    #[test]
    fn reads_three_byte_samples() {
        let mut device = MockDevice::new(3);
        device.samples.extend([-1, 0x7F_FFFF]);

        let mut adc = new(device, MockDelay::default());

        assert_eq!(adc.part_id(), "AD122U04");
        assert_eq!(adc.read_raw_sample(), Ok(-1));
        assert_eq!(adc.read_raw_sample(), Ok(0x7F_FFFF));
    }
}
