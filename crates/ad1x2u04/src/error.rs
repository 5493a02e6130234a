use core::convert::Infallible;
use core::fmt;

/// A semantic value outside the closed domain of its setting.
///
/// Produced before any bytes reach the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSetting {
    Mux,
    Gain(u32),
    DataRate(u32),
    Vref,
    GpioPin(u8),
    GpioDirection(u8),
    /// Sample width a [`Profile`](crate::Profile) cannot describe.
    Profile { sample_bytes: usize, sample_bits: u32 },
}

impl fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mux => f.write_str(
                "invalid mux setting, expected one of 0-1, 0-2, 0-3, 1-0, 1-2, 1-3, 2-3, 3-2, \
                 0, 1, 2, 3, VREFDIFF, ASUPPLYDIFF, ASUPPLYCENTER",
            ),
            Self::Gain(gain) => write!(
                f,
                "invalid gain {gain}, expected a power of two between 1 and 128"
            ),
            Self::DataRate(rate) => write!(
                f,
                "invalid data rate {rate}, expected 20, 45, 90, 175, 330, 600, 1000 (normal) \
                 or 40, 180, 350, 660, 1200, 2000 (turbo)"
            ),
            Self::Vref => {
                f.write_str("invalid reference, expected INTERNAL, EXTERNAL or ANALOGSUPPLY")
            }
            Self::GpioPin(pin) => write!(f, "invalid GPIO index {pin}, expected 0, 1 or 2"),
            Self::GpioDirection(dir) => {
                write!(f, "invalid GPIO direction {dir}, expected 0 (input) or 1 (output)")
            }
            Self::Profile {
                sample_bytes,
                sample_bits,
            } => write!(
                f,
                "invalid profile with {sample_bits} bits in {sample_bytes} bytes, expected \
                 1 to 4 bytes holding at least 14 bits"
            ),
        }
    }
}

/// Errors returned by the driver, generic over the transport's error type.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The underlying channel failed. Never retried.
    Transport(E),
    /// The transport returned fewer bytes than the response requires.
    ShortRead { expected: usize, actual: usize },
    /// A setting was rejected before any I/O took place.
    InvalidSetting(InvalidSetting),
    /// A register held a bit pattern with no semantic meaning.
    UnknownCode { register: u8, value: u8 },
    /// The readiness budget ran out without DRDY being observed.
    Timeout,
}

impl<E> From<InvalidSetting> for Error<E> {
    fn from(value: InvalidSetting) -> Self {
        Self::InvalidSetting(value)
    }
}

// Lets setters take an already typed value through the same `TryInto` bound.
impl<E> From<Infallible> for Error<E> {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::ShortRead { expected, actual } => {
                write!(f, "short read: expected {expected} bytes, got {actual}")
            }
            Self::InvalidSetting(e) => fmt::Display::fmt(e, f),
            Self::UnknownCode { register, value } => write!(
                f,
                "register {register} holds unrecognized value {value:#04x}"
            ),
            Self::Timeout => f.write_str("timed out waiting for data ready"),
        }
    }
}

impl core::error::Error for InvalidSetting {}

impl<E: fmt::Debug> core::error::Error for Error<E> {}
