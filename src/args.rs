use std::path::PathBuf;

use ad1x2u04::{GpioDirection, Mux, Profile, Vref, AD112U04, AD122U04, DEFAULT_TIMEOUT};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Part {
    Ad122u04,
    Ad112u04,
}

impl Part {
    pub(crate) fn profile(self) -> Profile {
        match self {
            Part::Ad122u04 => AD122U04,
            Part::Ad112u04 => AD112U04,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Input,
    Output,
}

impl From<Direction> for GpioDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Input => GpioDirection::Input,
            Direction::Output => GpioDirection::Output,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Resets the converter to its power-on configuration
    Reset,
    /// Prints the current configuration
    Show,
    /// Changes one or more settings
    Set {
        /// Input selection: 0-1, 0-2, 0-3, 1-0, 1-2, 1-3, 2-3, 3-2, 0, 1, 2, 3,
        /// VREFDIFF, ASUPPLYDIFF or ASUPPLYCENTER
        #[clap(long)]
        mux: Option<Mux>,
        /// PGA gain, a power of two from 1 to 128
        #[clap(long)]
        gain: Option<u32>,
        /// Bypass the PGA (gains 1, 2 and 4 only)
        #[clap(long)]
        pga_disabled: Option<bool>,
        /// Samples per second; normal mode is preferred when both modes offer the rate
        #[clap(long)]
        rate: Option<u32>,
        /// Force turbo mode for --rate
        #[clap(long, requires = "rate")]
        turbo: bool,
        /// INTERNAL, EXTERNAL or ANALOGSUPPLY
        #[clap(long)]
        vref: Option<Vref>,
    },
    /// Configures or reads a GPIO pin of the converter
    Gpio {
        pin: u8,
        #[clap(long, value_enum)]
        direction: Option<Direction>,
        /// Output level to drive
        #[clap(long)]
        level: Option<bool>,
    },
    /// Reads conversion results
    Read {
        #[clap(short, long, default_value_t = 1)]
        count: usize,
        /// Print a single sample as a fraction of full scale
        #[clap(long, conflicts_with = "count")]
        normalized: bool,
    },
    /// Reads the internal temperature sensor
    Temperature,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub(crate) struct Args {
    #[clap(subcommand)]
    pub(crate) command: Command,
    /// UART the converter is attached to
    #[clap(short, long, default_value = "/dev/serial0")]
    pub(crate) port: PathBuf,
    #[clap(short, long, default_value_t = 115_200)]
    pub(crate) baud: u32,
    #[clap(long, value_enum, default_value_t = Part::Ad122u04)]
    pub(crate) part: Part,
    /// BCM number of a host input wired to GPIO2/DRDY; polls the status register when absent
    #[clap(long)]
    pub(crate) drdy_gpio: Option<u8>,
    /// Data ready attempts before a read gives up
    #[clap(short, long, default_value_t = DEFAULT_TIMEOUT)]
    pub(crate) timeout: u32,
    /// Print all log messages and debug information
    #[clap(short, long)]
    pub(crate) verbose: bool,
}
