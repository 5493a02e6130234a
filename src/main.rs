//! Configure and read an AD122U04/AD112U04 attached to a Raspberry Pi UART.

// Without the Pi peripherals only the command line is checked.
#[cfg_attr(not(feature = "raspberry_pi"), allow(dead_code))]
mod args;
#[cfg(feature = "raspberry_pi")]
mod raspberry_pi;

use clap::Parser;
use tracing::Level;

use args::Args;
#[cfg(feature = "raspberry_pi")]
use raspberry_pi::run;

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    run(args)
}

#[cfg(not(feature = "raspberry_pi"))]
fn run(_args: Args) -> Result<(), anyhow::Error> {
    anyhow::bail!("built without the raspberry_pi feature, rebuild with --features raspberry_pi")
}
