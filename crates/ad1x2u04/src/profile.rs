use crate::error::InvalidSetting;

/// Largest sample in bytes across the family.
pub(crate) const MAX_SAMPLE_BYTES: usize = 4;

/// Bits in the temperature code, left aligned in a sample.
const TEMPERATURE_BITS: u32 = 14;

/// Per-part constants. Protocol logic is identical across the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    sample_bytes: usize,
    sample_bits: u32,
    part_id: &'static str,
}

/// 24 bit converter.
pub const AD122U04: Profile = Profile {
    sample_bytes: 3,
    sample_bits: 24,
    part_id: "AD122U04",
};

/// 16 bit converter.
pub const AD112U04: Profile = Profile {
    sample_bytes: 2,
    sample_bits: 16,
    part_id: "AD112U04",
};

impl Profile {
    /// Describes a part returning `sample_bytes` from RDATA with
    /// `sample_bits` significant bits.
    ///
    /// Samples are 1 to 4 bytes wide and carry at least the 14 bits of the
    /// temperature code.
    pub const fn new(
        part_id: &'static str,
        sample_bytes: usize,
        sample_bits: u32,
    ) -> Result<Self, InvalidSetting> {
        let fits = sample_bytes >= 1
            && sample_bytes <= MAX_SAMPLE_BYTES
            && sample_bits >= TEMPERATURE_BITS
            && sample_bits as usize <= sample_bytes * 8;

        if !fits {
            return Err(InvalidSetting::Profile {
                sample_bytes,
                sample_bits,
            });
        }

        Ok(Self {
            sample_bytes,
            sample_bits,
            part_id,
        })
    }

    /// Bytes returned by RDATA.
    pub const fn sample_bytes(&self) -> usize {
        self.sample_bytes
    }

    /// Significant bits in a sample.
    pub const fn sample_bits(&self) -> u32 {
        self.sample_bits
    }

    pub const fn part_id(&self) -> &'static str {
        self.part_id
    }

    /// Right shift that leaves the 14 bit temperature code of a sample.
    pub fn temperature_shift(&self) -> u32 {
        self.sample_bits.saturating_sub(TEMPERATURE_BITS)
    }

    /// Full scale of a sample, `2^sample_bits`.
    pub fn full_scale(&self) -> f64 {
        (1u64 << self.sample_bits) as f64
    }

    /// Degrees Celsius from a sample taken in temperature sensor mode.
    pub fn temperature(&self, sample: i32) -> f32 {
        (sample >> self.temperature_shift()) as f32 * 0.03125
    }

    /// Sample as a fraction of full scale.
    pub fn normalize(&self, sample: i32) -> f64 {
        f64::from(sample) / self.full_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(AD122U04.sample_bytes() * 8, AD122U04.sample_bits() as usize);
        assert_eq!(AD112U04.sample_bytes() * 8, AD112U04.sample_bits() as usize);
        assert_eq!(AD122U04.temperature_shift(), 10);
        assert_eq!(AD112U04.temperature_shift(), 2);
        assert_eq!(AD112U04.full_scale(), 65536.0);
    }

    #[test]
    fn constructor_matches_family() {
        assert_eq!(Profile::new("AD122U04", 3, 24), Ok(AD122U04));
        assert_eq!(Profile::new("AD112U04", 2, 16), Ok(AD112U04));

        let narrow = Profile::new("AD1X", 2, 14).unwrap();
        assert_eq!(narrow.temperature_shift(), 0);
        assert_eq!(narrow.temperature(100), 3.125);
    }

    #[test]
    fn constructor_rejects_unusable_widths() {
        for (bytes, bits) in [(0, 0), (0, 14), (5, 24), (1, 8), (2, 13), (2, 17), (3, 32)] {
            assert_eq!(
                Profile::new("bad", bytes, bits),
                Err(InvalidSetting::Profile {
                    sample_bytes: bytes,
                    sample_bits: bits
                }),
                "{bytes} bytes, {bits} bits"
            );
        }
    }

    #[test]
    fn temperature_uses_top_14_bits() {
        assert_eq!(AD122U04.temperature(100 << 10), 3.125);
        assert_eq!(AD122U04.temperature((100 << 10) | 0x3FF), 3.125);
        assert_eq!(AD112U04.temperature(100 << 2), 3.125);
        assert_eq!(AD122U04.temperature(-(25 << 15)), -25.0);
    }

    #[test]
    fn normalize() {
        assert_eq!(AD122U04.normalize(0), 0.0);
        assert_eq!(AD122U04.normalize(-(1 << 23)), -0.5);
        assert_eq!(AD112U04.normalize(1 << 14), 0.25);
    }
}
