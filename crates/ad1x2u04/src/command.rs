//! Command framing for the serial interface.
//!
//! Every frame starts with the sync byte. Register commands embed the
//! register address in the low nibble of the opcode.

pub const SYNC: u8 = 0x55;
pub const RESET: u8 = 0x06;
pub const START: u8 = 0x08;
pub const POWERDOWN: u8 = 0x02;
pub const RDATA: u8 = 0x10;
pub const RREG: u8 = 0x20;
pub const WREG: u8 = 0x40;

/// Register address field of a RREG/WREG opcode, truncated to 4 bits.
#[inline]
pub fn register_address(index: u8) -> u8 {
    index.wrapping_mul(2) & 0x0F
}

#[inline]
pub fn reset() -> [u8; 2] {
    [SYNC, RESET]
}

#[inline]
pub fn start() -> [u8; 2] {
    [SYNC, START]
}

#[inline]
pub fn powerdown() -> [u8; 2] {
    [SYNC, POWERDOWN]
}

#[inline]
pub fn read_data() -> [u8; 2] {
    [SYNC, RDATA]
}

#[inline]
pub fn read_register(index: u8) -> [u8; 2] {
    [SYNC, RREG | register_address(index)]
}

#[inline]
pub fn write_register(index: u8, value: u8) -> [u8; 3] {
    [SYNC, WREG | register_address(index), value]
}

/// Decode a little-endian two's complement sample of 1 to 4 bytes.
pub fn decode_sample(bytes: &[u8]) -> i32 {
    debug_assert!((1..=4).contains(&bytes.len()));

    let mut word = [0u8; 4];
    word[..bytes.len()].copy_from_slice(bytes);

    // Move the sign bit of the sample into bit 31, then shift back arithmetically.
    let unused = 32 - 8 * bytes.len() as u32;
    (i32::from_le_bytes(word) << unused) >> unused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_frames() {
        assert_eq!(reset(), [0x55, 0x06]);
        assert_eq!(start(), [0x55, 0x08]);
        assert_eq!(powerdown(), [0x55, 0x02]);
        assert_eq!(read_data(), [0x55, 0x10]);
    }

    #[test]
    fn register_frames() {
        assert_eq!(read_register(0), [0x55, 0x20]);
        assert_eq!(read_register(2), [0x55, 0x24]);
        assert_eq!(write_register(1, 0xA5), [0x55, 0x42, 0xA5]);
        assert_eq!(write_register(4, 0x10), [0x55, 0x48, 0x10]);
    }

    #[test]
    fn register_address_is_four_bits() {
        assert_eq!(register_address(7), 0x0E);
        assert_eq!(read_register(7), [0x55, 0x2E]);
        assert_eq!(write_register(7, 0x33), [0x55, 0x4E, 0x33]);

        assert_eq!(register_address(8), 0x00);
        assert_eq!(read_register(8), [0x55, 0x20]);
        assert_eq!(write_register(8, 0x01), [0x55, 0x40, 0x01]);
    }

    #[test]
    fn sample_decoding() {
        assert_eq!(decode_sample(&[0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(decode_sample(&[0x00, 0x01, 0x00]), 256);
        assert_eq!(decode_sample(&[0xFF, 0xFF, 0x7F]), 0x7F_FFFF);
        assert_eq!(decode_sample(&[0x00, 0x00, 0x80]), -0x80_0000);

        assert_eq!(decode_sample(&[0xFF, 0xFF]), -1);
        assert_eq!(decode_sample(&[0x34, 0x12]), 0x1234);
        assert_eq!(decode_sample(&[0x00, 0x80]), -0x8000);
    }
}
