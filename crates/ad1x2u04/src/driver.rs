use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use tracing::{debug, trace, warn};

use crate::command;
use crate::drdy::{DrdyProbe, Readiness};
use crate::error::Error;
use crate::profile::{Profile, MAX_SAMPLE_BYTES};
use crate::registers::{self, *};
use crate::Transport;

/// Readiness attempts made before giving up on a conversion.
pub const DEFAULT_TIMEOUT: u32 = 100;

/// Time left for in-flight bytes to land after continuous mode is stopped.
const SETTLE_MS: u32 = 100;

/// Pause between calls to an external DRDY probe.
const PROBE_INTERVAL_MS: u32 = 1;

/// AD122U04/AD112U04 driver.
///
/// Holds no copy of the device configuration: every getter reads the
/// register it decodes and every setter reads before it writes.
///
/// The command protocol is strictly request/response over one channel.
/// A driver must be owned by one execution context at a time.
pub struct Ad1x2u04<T, D> {
    transport: T,
    delay: D,
    profile: Profile,
    readiness: Readiness,
    timeout: u32,
}

impl<T: Transport, D: DelayNs> Ad1x2u04<T, D> {
    /// Creates a new driver for the part described by `profile`.
    /// The transport must already be open, 8N1, at the configured baud rate.
    pub fn new(transport: T, delay: D, profile: Profile) -> Self {
        Self {
            transport,
            delay,
            profile,
            readiness: Readiness::RegisterPoll,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Constants of the part this driver talks to.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Part name, such as `"AD122U04"`.
    pub fn part_id(&self) -> &'static str {
        self.profile.part_id()
    }

    /// Readiness attempts used by [`read_sample`](Self::read_sample) and friends.
    pub fn set_timeout(&mut self, timeout: u32) {
        self.timeout = timeout;
    }

    /// Current data-ready detection strategy.
    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Hands back the transport and delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), Error<T::Error>> {
        trace!(?frame, "tx");
        self.transport.write(frame).map_err(Error::Transport)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        let actual = self.transport.read(buffer).map_err(Error::Transport)?;

        if actual < buffer.len() {
            return Err(Error::ShortRead {
                expected: buffer.len(),
                actual,
            });
        }

        trace!(?buffer, "rx");
        Ok(())
    }

    /// Sends RESET. The device returns every register to its default.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        debug!("reset");
        self.send(&command::reset())
    }

    /// Starts a conversion, or the conversion stream in continuous mode.
    pub fn start(&mut self) -> Result<(), Error<T::Error>> {
        self.send(&command::start())
    }

    /// Sends POWERDOWN, which also stops continuous conversion.
    pub fn powerdown(&mut self) -> Result<(), Error<T::Error>> {
        self.send(&command::powerdown())
    }

    /// Raw value of configuration register `index`.
    pub fn read_register(&mut self, index: u8) -> Result<u8, Error<T::Error>> {
        self.send(&command::read_register(index))?;

        let mut value = [0u8; 1];
        self.receive(&mut value)?;

        Ok(value[0])
    }

    /// Overwrites configuration register `index` with `value`.
    pub fn write_register(&mut self, index: u8, value: u8) -> Result<(), Error<T::Error>> {
        self.send(&command::write_register(index, value))
    }

    /// Read-modify-write of the bits under `mask`.
    fn modify_register(&mut self, index: u8, mask: u8, bits: u8) -> Result<(), Error<T::Error>> {
        let current = self.read_register(index)?;
        self.write_register(index, registers::update(current, mask, bits))
    }

    fn read_flag(&mut self, index: u8, mask: u8) -> Result<bool, Error<T::Error>> {
        Ok(self.read_register(index)? & mask != 0)
    }

    fn write_flag(&mut self, index: u8, mask: u8, set: bool) -> Result<(), Error<T::Error>> {
        self.modify_register(index, mask, if set { mask } else { 0 })
    }

    /// Accepts a [`Mux`] or anything convertible into one, such as a
    /// channel number, a `(positive, negative)` pair, or a name.
    pub fn set_mux<M>(&mut self, mux: M) -> Result<(), Error<T::Error>>
    where
        M: TryInto<Mux>,
        Error<T::Error>: From<M::Error>,
    {
        let mux = mux.try_into()?;
        debug!(%mux, "set mux");
        self.modify_register(CONFIG0, MUX_MASK, mux.encode())
    }

    /// Input multiplexer selection from register 0.
    pub fn mux(&mut self) -> Result<Mux, Error<T::Error>> {
        let value = self.read_register(CONFIG0)?;

        Mux::decode(value).ok_or(Error::UnknownCode {
            register: CONFIG0,
            value,
        })
    }

    /// Sets the PGA gain, from a [`Gain`] or its numeric value.
    pub fn set_gain<G>(&mut self, gain: G) -> Result<(), Error<T::Error>>
    where
        G: TryInto<Gain>,
        Error<T::Error>: From<G::Error>,
    {
        let gain = gain.try_into()?;
        debug!(%gain, "set gain");
        self.modify_register(CONFIG0, GAIN_MASK, gain.encode())
    }

    /// PGA gain from register 0.
    pub fn gain(&mut self) -> Result<Gain, Error<T::Error>> {
        Ok(Gain::decode(self.read_register(CONFIG0)?))
    }

    /// Bypasses the PGA. The device only honours this for gains of 1, 2 and 4.
    pub fn set_pga_disabled(&mut self, disabled: bool) -> Result<(), Error<T::Error>> {
        debug!(disabled, "set pga bypass");
        self.write_flag(CONFIG0, PGA_BYPASS, disabled)
    }

    /// Whether the PGA is bypassed.
    pub fn pga_disabled(&mut self) -> Result<bool, Error<T::Error>> {
        self.read_flag(CONFIG0, PGA_BYPASS)
    }

    /// Selects normal or turbo mode from the rate itself, normal first.
    /// Pass a [`DataRate`] to pick turbo mode for 90 SPS.
    pub fn set_data_rate<R>(&mut self, rate: R) -> Result<(), Error<T::Error>>
    where
        R: TryInto<DataRate>,
        Error<T::Error>: From<R::Error>,
    {
        let rate = rate.try_into()?;
        debug!(%rate, "set data rate");
        self.modify_register(CONFIG1, DATA_RATE_MASK | TURBO, rate.encode())
    }

    /// Data rate and mode from register 1.
    pub fn data_rate(&mut self) -> Result<DataRate, Error<T::Error>> {
        let value = self.read_register(CONFIG1)?;

        DataRate::decode(value).ok_or(Error::UnknownCode {
            register: CONFIG1,
            value,
        })
    }

    /// Selects the voltage reference, from a [`Vref`] or its name.
    pub fn set_vref<V>(&mut self, vref: V) -> Result<(), Error<T::Error>>
    where
        V: TryInto<Vref>,
        Error<T::Error>: From<V::Error>,
    {
        let vref = vref.try_into()?;
        debug!(%vref, "set reference");
        self.modify_register(CONFIG1, VREF_MASK, vref.encode())
    }

    /// Voltage reference from register 1.
    pub fn vref(&mut self) -> Result<Vref, Error<T::Error>> {
        Ok(Vref::decode(self.read_register(CONFIG1)?))
    }

    /// Switches conversions between the inputs and the internal temperature sensor.
    pub fn set_temperature_sensor(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        self.write_flag(CONFIG1, TEMP_SENSOR, enabled)
    }

    /// Whether conversions measure the temperature sensor.
    pub fn temperature_sensor_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        self.read_flag(CONFIG1, TEMP_SENSOR)
    }

    /// Drives an output pin. Has no effect on the pin level while it is an input.
    pub fn set_gpio<P>(&mut self, pin: P, high: bool) -> Result<(), Error<T::Error>>
    where
        P: TryInto<GpioPin>,
        Error<T::Error>: From<P::Error>,
    {
        let pin = pin.try_into()?;
        debug!(?pin, high, "set gpio");
        self.write_flag(CONFIG4, pin.value_mask(), high)
    }

    /// Level of a GPIO pin as held in register 4.
    pub fn gpio<P>(&mut self, pin: P) -> Result<bool, Error<T::Error>>
    where
        P: TryInto<GpioPin>,
        Error<T::Error>: From<P::Error>,
    {
        let pin = pin.try_into()?;
        self.read_flag(CONFIG4, pin.value_mask())
    }

    /// Configures a GPIO pin as input or output.
    pub fn set_gpio_direction<P, Dir>(
        &mut self,
        pin: P,
        direction: Dir,
    ) -> Result<(), Error<T::Error>>
    where
        P: TryInto<GpioPin>,
        Dir: TryInto<GpioDirection>,
        Error<T::Error>: From<P::Error> + From<Dir::Error>,
    {
        let pin = pin.try_into()?;
        let direction = direction.try_into()?;
        debug!(?pin, ?direction, "set gpio direction");
        self.modify_register(CONFIG4, pin.direction_mask(), direction.encode(pin))
    }

    /// Direction of a GPIO pin.
    pub fn gpio_direction<P>(&mut self, pin: P) -> Result<GpioDirection, Error<T::Error>>
    where
        P: TryInto<GpioPin>,
        Error<T::Error>: From<P::Error>,
    {
        let pin = pin.try_into()?;
        self.read_register(CONFIG4)
            .map(|value| GpioDirection::decode(value, pin))
    }

    /// Routes GPIO2 as the dedicated DRDY output instead of a general purpose pin.
    pub fn set_drdy_pin(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        self.write_flag(CONFIG4, GPIO2_DRDY, enabled)
    }

    /// Whether GPIO2 is routed as the DRDY output.
    pub fn drdy_pin_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        self.read_flag(CONFIG4, GPIO2_DRDY)
    }

    /// Switches readiness detection to `probe`, or back to register polling
    /// for `None`. GPIO2 is routed as DRDY while a probe is installed.
    pub fn install_drdy_probe(
        &mut self,
        probe: Option<Box<dyn DrdyProbe + Send>>,
    ) -> Result<(), Error<T::Error>> {
        self.set_drdy_pin(probe.is_some())?;
        self.readiness = probe.into();
        debug!(readiness = ?self.readiness, "drdy strategy");
        Ok(())
    }

    /// Waits for a finished conversion, trying at most `timeout` times.
    pub fn wait_valid_data(&mut self, timeout: u32) -> Result<(), Error<T::Error>> {
        if let Readiness::ExternalProbe(probe) = &mut self.readiness {
            for _ in 0..timeout {
                if probe.is_ready() {
                    return Ok(());
                }
                self.delay.delay_ms(PROBE_INTERVAL_MS);
            }
        } else {
            for _ in 0..timeout {
                if self.read_flag(CONFIG2, DRDY)? {
                    return Ok(());
                }
            }
        }

        warn!(timeout, "no data ready");
        Err(Error::Timeout)
    }

    /// Issues RDATA and decodes the result. Does not wait for DRDY.
    pub fn read_raw_sample(&mut self) -> Result<i32, Error<T::Error>> {
        self.send(&command::read_data())?;
        self.receive_sample()
    }

    fn receive_sample(&mut self) -> Result<i32, Error<T::Error>> {
        let mut buffer = [0u8; MAX_SAMPLE_BYTES];
        let bytes = &mut buffer[..self.profile.sample_bytes()];

        self.receive(bytes)?;

        Ok(command::decode_sample(bytes))
    }

    /// Starts a single conversion, waits for it and reads it back.
    pub fn read_sample(&mut self) -> Result<i32, Error<T::Error>> {
        self.start()?;
        self.wait_valid_data(self.timeout)?;
        self.read_raw_sample()
    }

    /// Reads `count` samples in acquisition order.
    ///
    /// More than one sample runs the converter in continuous mode, see
    /// [`read_samples_into`](Self::read_samples_into).
    pub fn read_samples(&mut self, count: usize) -> Result<Vec<i32>, Error<T::Error>> {
        match count {
            0 => Ok(Vec::new()),
            1 => Ok(vec![self.read_sample()?]),
            _ => {
                let mut samples = vec![0; count];
                self.read_samples_into(&mut samples)?;
                Ok(samples)
            }
        }
    }

    /// Fills `samples` from the continuous conversion stream.
    ///
    /// Registers 1 and 3 are restored afterwards, also when the stream
    /// fails. Any bytes still arriving once the converter is powered
    /// down are discarded. There is no way to stop early.
    pub fn read_samples_into(&mut self, samples: &mut [i32]) -> Result<(), Error<T::Error>> {
        if samples.is_empty() {
            return Ok(());
        }

        let config1 = self.read_register(CONFIG1)?;
        let config3 = self.read_register(CONFIG3)?;

        debug!(count = samples.len(), "continuous acquisition");

        let streamed = self.stream(samples, config1, config3);
        let stopped = self.stop_stream(config1, config3);

        finish(streamed, stopped)
    }

    fn stream(
        &mut self,
        samples: &mut [i32],
        config1: u8,
        config3: u8,
    ) -> Result<(), Error<T::Error>> {
        self.write_register(CONFIG1, config1 | CONTINUOUS)?;
        self.write_register(CONFIG3, config3 | AUTO)?;
        self.start()?;

        // The converter pushes every result on its own at the configured rate.
        for sample in samples.iter_mut() {
            *sample = self.receive_sample()?;
        }

        Ok(())
    }

    /// Every step runs even when an earlier one failed. The first error is returned.
    fn stop_stream(&mut self, config1: u8, config3: u8) -> Result<(), Error<T::Error>> {
        let powerdown = self.powerdown();
        let config3 = self.write_register(CONFIG3, config3);
        let config1 = self.write_register(CONFIG1, config1);

        self.delay.delay_ms(SETTLE_MS);
        let discard = self.transport.discard_input().map_err(Error::Transport);

        let mut stopped = Ok(());
        for step in [powerdown, config3, config1, discard] {
            if let Err(e) = step {
                if stopped.is_ok() {
                    stopped = Err(e);
                } else {
                    warn!(error = ?e, "stopping stream");
                }
            }
        }

        stopped
    }

    /// A single sample scaled by the full scale of the part.
    pub fn read_normalized_sample(&mut self) -> Result<f64, Error<T::Error>> {
        let sample = self.read_sample()?;
        Ok(self.profile.normalize(sample))
    }

    /// Internal temperature sensor reading in degrees Celsius.
    ///
    /// Register 1 is written back as it was read, so a change made by
    /// another writer in between is lost.
    pub fn read_temperature(&mut self) -> Result<f32, Error<T::Error>> {
        let config1 = self.read_register(CONFIG1)?;
        self.write_register(CONFIG1, config1 | TEMP_SENSOR)?;

        let sample = self.read_sample();
        let restored = self.write_register(CONFIG1, config1);

        let sample = finish(sample, restored)?;
        let celsius = self.profile.temperature(sample);

        debug!(sample, celsius, "temperature");
        Ok(celsius)
    }
}

/// The result of an operation followed by its cleanup. The operation's
/// error wins over a cleanup error.
fn finish<R, E: core::fmt::Debug>(
    result: Result<R, Error<E>>,
    cleanup: Result<(), Error<E>>,
) -> Result<R, Error<E>> {
    match (result, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup)) => {
            warn!(?cleanup, "restore after failure");
            Err(e)
        }
    }
}
