//! Register map and the semantic settings packed into it.
//!
//! Each setting owns a mask inside exactly one configuration register.
//! Encoding never touches bits outside that mask.

use core::fmt;
use core::str::FromStr;

use crate::error::InvalidSetting;

pub const CONFIG0: u8 = 0;
pub const CONFIG1: u8 = 1;
pub const CONFIG2: u8 = 2;
pub const CONFIG3: u8 = 3;
pub const CONFIG4: u8 = 4;

// CONFIG0
pub const MUX_MASK: u8 = 0xF0;
pub const MUX_SHIFT: u8 = 4;
pub const GAIN_MASK: u8 = 0x0E;
pub const GAIN_SHIFT: u8 = 1;
pub const PGA_BYPASS: u8 = 0x01;

// CONFIG1
pub const DATA_RATE_MASK: u8 = 0xE0;
pub const DATA_RATE_SHIFT: u8 = 5;
pub const TURBO: u8 = 0x10;
pub const CONTINUOUS: u8 = 0x08;
pub const VREF_MASK: u8 = 0x06;
pub const VREF_SHIFT: u8 = 1;
pub const TEMP_SENSOR: u8 = 0x01;

// CONFIG2
pub const DRDY: u8 = 0x80;

// CONFIG3
pub const AUTO: u8 = 0x01;

// CONFIG4
pub const GPIO_DIRECTION_MASK: u8 = 0x70;
pub const GPIO2_DRDY: u8 = 0x08;
pub const GPIO_VALUE_MASK: u8 = 0x07;

/// Replace the bits of `reg` selected by `mask` with those of `bits`.
#[inline]
pub fn update(reg: u8, mask: u8, bits: u8) -> u8 {
    (reg & !mask) | (bits & mask)
}

/// Input multiplexer selection.
///
/// Differential pairs are named positive input first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mux {
    Ain0Ain1 = 0x0,
    Ain0Ain2 = 0x1,
    Ain0Ain3 = 0x2,
    Ain1Ain0 = 0x3,
    Ain1Ain2 = 0x4,
    Ain1Ain3 = 0x5,
    Ain2Ain3 = 0x6,
    Ain3Ain2 = 0x7,
    Ain0 = 0x8,
    Ain1 = 0x9,
    Ain2 = 0xA,
    Ain3 = 0xB,
    /// (VREFP - VREFN) / 4
    VrefDiff = 0xC,
    /// (AVDD - AVSS) / 4
    AsupplyDiff = 0xD,
    /// Both inputs shorted to (AVDD + AVSS) / 2
    AsupplyCenter = 0xE,
}

impl Mux {
    /// Every selector, indexed by its code.
    pub const ALL: [Mux; 15] = [
        Mux::Ain0Ain1,
        Mux::Ain0Ain2,
        Mux::Ain0Ain3,
        Mux::Ain1Ain0,
        Mux::Ain1Ain2,
        Mux::Ain1Ain3,
        Mux::Ain2Ain3,
        Mux::Ain3Ain2,
        Mux::Ain0,
        Mux::Ain1,
        Mux::Ain2,
        Mux::Ain3,
        Mux::VrefDiff,
        Mux::AsupplyDiff,
        Mux::AsupplyCenter,
    ];

    const NAMES: [&'static str; 15] = [
        "0-1",
        "0-2",
        "0-3",
        "1-0",
        "1-2",
        "1-3",
        "2-3",
        "3-2",
        "0",
        "1",
        "2",
        "3",
        "VREFDIFF",
        "ASUPPLYDIFF",
        "ASUPPLYCENTER",
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn encode(self) -> u8 {
        self.code() << MUX_SHIFT
    }

    /// `None` for the reserved code 0xF.
    pub fn decode(reg0: u8) -> Option<Self> {
        Self::ALL.get(usize::from((reg0 & MUX_MASK) >> MUX_SHIFT)).copied()
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[usize::from(self.code())]
    }
}

/// Single-ended channel `AINx` against AVSS.
impl TryFrom<u8> for Mux {
    type Error = InvalidSetting;

    fn try_from(channel: u8) -> Result<Self, Self::Error> {
        match channel {
            0 => Ok(Mux::Ain0),
            1 => Ok(Mux::Ain1),
            2 => Ok(Mux::Ain2),
            3 => Ok(Mux::Ain3),
            _ => Err(InvalidSetting::Mux),
        }
    }
}

/// Differential pair `(positive, negative)`.
impl TryFrom<(u8, u8)> for Mux {
    type Error = InvalidSetting;

    fn try_from(pair: (u8, u8)) -> Result<Self, Self::Error> {
        match pair {
            (0, 1) => Ok(Mux::Ain0Ain1),
            (0, 2) => Ok(Mux::Ain0Ain2),
            (0, 3) => Ok(Mux::Ain0Ain3),
            (1, 0) => Ok(Mux::Ain1Ain0),
            (1, 2) => Ok(Mux::Ain1Ain2),
            (1, 3) => Ok(Mux::Ain1Ain3),
            (2, 3) => Ok(Mux::Ain2Ain3),
            (3, 2) => Ok(Mux::Ain3Ain2),
            _ => Err(InvalidSetting::Mux),
        }
    }
}

impl FromStr for Mux {
    type Err = InvalidSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s.trim()))
            .map(|code| Self::ALL[code])
            .ok_or(InvalidSetting::Mux)
    }
}

impl TryFrom<&str> for Mux {
    type Error = InvalidSetting;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// PGA gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gain {
    X1 = 1,
    X2 = 2,
    X4 = 4,
    X8 = 8,
    X16 = 16,
    X32 = 32,
    X64 = 64,
    X128 = 128,
}

impl Gain {
    /// Every gain, indexed by its code.
    pub const ALL: [Gain; 8] = [
        Gain::X1,
        Gain::X2,
        Gain::X4,
        Gain::X8,
        Gain::X16,
        Gain::X32,
        Gain::X64,
        Gain::X128,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// log2 of the gain.
    pub fn code(self) -> u8 {
        self.value().trailing_zeros() as u8
    }

    pub fn encode(self) -> u8 {
        self.code() << GAIN_SHIFT
    }

    pub fn decode(reg0: u8) -> Self {
        Self::ALL[usize::from((reg0 & GAIN_MASK) >> GAIN_SHIFT)]
    }
}

impl TryFrom<u32> for Gain {
    type Error = InvalidSetting;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|gain| u32::from(gain.value()) == value)
            .copied()
            .ok_or(InvalidSetting::Gain(value))
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRateMode {
    Normal,
    Turbo,
}

/// Samples per second in normal mode, indexed by code.
pub const NORMAL_RATES: [u16; 7] = [20, 45, 90, 175, 330, 600, 1000];

/// Samples per second in turbo mode, indexed by code.
pub const TURBO_RATES: [u16; 7] = [40, 90, 180, 350, 660, 1200, 2000];

impl DataRateMode {
    pub fn rates(self) -> &'static [u16; 7] {
        match self {
            DataRateMode::Normal => &NORMAL_RATES,
            DataRateMode::Turbo => &TURBO_RATES,
        }
    }
}

/// Conversion rate together with the operating mode that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRate {
    mode: DataRateMode,
    code: u8,
}

impl DataRate {
    /// A rate in an explicitly chosen mode.
    pub fn new(sps: u16, mode: DataRateMode) -> Result<Self, InvalidSetting> {
        mode.rates()
            .iter()
            .position(|&rate| rate == sps)
            .map(|code| DataRate {
                mode,
                code: code as u8,
            })
            .ok_or(InvalidSetting::DataRate(u32::from(sps)))
    }

    pub fn sps(self) -> u16 {
        self.mode.rates()[usize::from(self.code)]
    }

    pub fn mode(self) -> DataRateMode {
        self.mode
    }

    pub fn code(self) -> u8 {
        self.code
    }

    pub fn encode(self) -> u8 {
        let turbo = match self.mode {
            DataRateMode::Normal => 0,
            DataRateMode::Turbo => TURBO,
        };

        (self.code << DATA_RATE_SHIFT) | turbo
    }

    /// `None` for the reserved rate code 7.
    pub fn decode(reg1: u8) -> Option<Self> {
        let mode = if reg1 & TURBO != 0 {
            DataRateMode::Turbo
        } else {
            DataRateMode::Normal
        };
        let code = (reg1 & DATA_RATE_MASK) >> DATA_RATE_SHIFT;

        (usize::from(code) < mode.rates().len()).then_some(DataRate { mode, code })
    }
}

/// Normal mode wins for rates both modes offer (90 SPS).
impl TryFrom<u32> for DataRate {
    type Error = InvalidSetting;

    fn try_from(sps: u32) -> Result<Self, Self::Error> {
        let sps = u16::try_from(sps).map_err(|_| InvalidSetting::DataRate(sps))?;

        DataRate::new(sps, DataRateMode::Normal)
            .or_else(|_| DataRate::new(sps, DataRateMode::Turbo))
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            DataRateMode::Normal => write!(f, "{} SPS", self.sps()),
            DataRateMode::Turbo => write!(f, "{} SPS (turbo)", self.sps()),
        }
    }
}

/// Voltage reference source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Vref {
    Internal = 0x0,
    External = 0x1,
    AnalogSupply = 0x2,
}

impl Vref {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn encode(self) -> u8 {
        self.code() << VREF_SHIFT
    }

    /// Codes 2 and 3 both select the analog supply.
    pub fn decode(reg1: u8) -> Self {
        match (reg1 & VREF_MASK) >> VREF_SHIFT {
            0 => Vref::Internal,
            1 => Vref::External,
            _ => Vref::AnalogSupply,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vref::Internal => "INTERNAL",
            Vref::External => "EXTERNAL",
            Vref::AnalogSupply => "ANALOGSUPPLY",
        }
    }
}

impl FromStr for Vref {
    type Err = InvalidSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Vref::Internal, Vref::External, Vref::AnalogSupply]
            .into_iter()
            .find(|vref| vref.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(InvalidSetting::Vref)
    }
}

impl TryFrom<&str> for Vref {
    type Error = InvalidSetting;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Vref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GpioPin {
    Gpio0 = 0,
    Gpio1 = 1,
    /// Doubles as the dedicated DRDY output when routed.
    Gpio2 = 2,
}

impl GpioPin {
    /// Iterate over all pins.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Gpio0, Self::Gpio1, Self::Gpio2].into_iter()
    }

    pub fn value_mask(self) -> u8 {
        0x01 << self as u8
    }

    pub fn direction_mask(self) -> u8 {
        0x10 << self as u8
    }
}

impl TryFrom<u8> for GpioPin {
    type Error = InvalidSetting;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(GpioPin::Gpio0),
            1 => Ok(GpioPin::Gpio1),
            2 => Ok(GpioPin::Gpio2),
            _ => Err(InvalidSetting::GpioPin(index)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioDirection {
    Input,
    Output,
}

impl GpioDirection {
    pub fn encode(self, pin: GpioPin) -> u8 {
        match self {
            GpioDirection::Input => 0,
            GpioDirection::Output => pin.direction_mask(),
        }
    }

    pub fn decode(reg4: u8, pin: GpioPin) -> Self {
        if reg4 & pin.direction_mask() != 0 {
            GpioDirection::Output
        } else {
            GpioDirection::Input
        }
    }
}

impl TryFrom<u8> for GpioDirection {
    type Error = InvalidSetting;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GpioDirection::Input),
            1 => Ok(GpioDirection::Output),
            _ => Err(InvalidSetting::GpioDirection(value)),
        }
    }
}
