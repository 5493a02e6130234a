use std::path::Path;
use std::time::Duration;

use ad1x2u04::{
    Ad1x2u04, DataRate, DataRateMode, DrdyPin, GpioDirection, GpioPin, InvalidSetting, Transport,
};
use anyhow::Context;
use rppal::gpio::Gpio;
use rppal::hal::Delay;
use rppal::uart::{Parity, Queue, Uart};
use tracing::debug;

use crate::args::{Args, Command};

type Adc = Ad1x2u04<PiUart, Delay>;

/// Opens the converter described by `args` and runs its command.
pub fn run(args: Args) -> Result<(), anyhow::Error> {
    let uart = PiUart::open(&args.port, args.baud)?;

    let mut adc = Ad1x2u04::new(uart, Delay::new(), args.part.profile());
    adc.set_timeout(args.timeout);

    debug!(part = adc.part_id(), port = %args.port.display(), "connected");

    if let Some(bcm) = args.drdy_gpio {
        let pin = Gpio::new()?.get(bcm)?.into_input_pullup();
        adc.install_drdy_probe(Some(Box::new(DrdyPin::new(pin))))?;
    }

    match args.command {
        Command::Reset => adc.reset()?,
        Command::Show => show(&mut adc)?,
        Command::Set {
            mux,
            gain,
            pga_disabled,
            rate,
            turbo,
            vref,
        } => {
            if let Some(mux) = mux {
                adc.set_mux(mux)?;
            }
            if let Some(gain) = gain {
                adc.set_gain(gain)?;
            }
            if let Some(disabled) = pga_disabled {
                adc.set_pga_disabled(disabled)?;
            }
            match rate {
                Some(rate) if turbo => {
                    let sps = u16::try_from(rate).map_err(|_| InvalidSetting::DataRate(rate))?;
                    adc.set_data_rate(DataRate::new(sps, DataRateMode::Turbo)?)?;
                }
                Some(rate) => adc.set_data_rate(rate)?,
                None => {}
            }
            if let Some(vref) = vref {
                adc.set_vref(vref)?;
            }
        }
        Command::Gpio {
            pin,
            direction,
            level,
        } => {
            let pin = GpioPin::try_from(pin)?;

            if let Some(direction) = direction {
                adc.set_gpio_direction(pin, GpioDirection::from(direction))?;
            }
            if let Some(level) = level {
                adc.set_gpio(pin, level)?;
            }

            println!(
                "GPIO{}: {:?}, {}",
                pin as u8,
                adc.gpio_direction(pin)?,
                if adc.gpio(pin)? { "high" } else { "low" }
            );
        }
        Command::Read { count, normalized } => {
            if normalized {
                println!("{:.6}", adc.read_normalized_sample()?);
            } else {
                for sample in adc.read_samples(count)? {
                    println!("{sample}");
                }
            }
        }
        Command::Temperature => println!("{:.3} °C", adc.read_temperature()?),
    }

    Ok(())
}

fn show(adc: &mut Adc) -> Result<(), ad1x2u04::Error<<PiUart as Transport>::Error>> {
    println!("part:        {}", adc.part_id());
    println!("mux:         {}", adc.mux()?);
    println!("gain:        {}", adc.gain()?);
    println!("pga bypass:  {}", adc.pga_disabled()?);
    println!("data rate:   {}", adc.data_rate()?);
    println!("reference:   {}", adc.vref()?);
    println!("temp sensor: {}", adc.temperature_sensor_enabled()?);
    println!("drdy pin:    {}", adc.drdy_pin_enabled()?);

    for pin in GpioPin::all() {
        println!(
            "GPIO{}:       {:?}, {}",
            pin as u8,
            adc.gpio_direction(pin)?,
            if adc.gpio(pin)? { "high" } else { "low" }
        );
    }

    Ok(())
}

/// How long a read waits for the next byte before returning short.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Raspberry Pi UART as the converter's byte channel.
pub struct PiUart {
    uart: Uart,
}

impl PiUart {
    /// Opens `path` at `baud`, 8N1, with blocking writes.
    pub fn open(path: &Path, baud: u32) -> Result<Self, anyhow::Error> {
        let mut uart = Uart::with_path(path, baud, Parity::None, 8, 1)
            .with_context(|| format!("opening {}", path.display()))?;

        uart.set_write_mode(true)?;
        uart.set_read_mode(0, READ_TIMEOUT)?;

        Ok(uart.into())
    }
}

impl From<Uart> for PiUart {
    fn from(uart: Uart) -> Self {
        Self { uart }
    }
}

impl Transport for PiUart {
    type Error = rppal::uart::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut written = 0;

        while written < bytes.len() {
            written += self.uart.write(&bytes[written..])?;
        }

        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;

        // Each read returns what arrived so far, or nothing once the timeout passes.
        while filled < buffer.len() {
            match self.uart.read(&mut buffer[filled..])? {
                0 => break,
                count => filled += count,
            }
        }

        Ok(filled)
    }

    fn discard_input(&mut self) -> Result<(), Self::Error> {
        self.uart.flush(Queue::Input)
    }
}
