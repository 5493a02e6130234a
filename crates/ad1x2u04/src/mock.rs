//! Simulated converter for unit tests.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::command::{POWERDOWN, RDATA, RESET, RREG, START, SYNC, WREG};
use crate::registers::{AUTO, CONFIG2, CONFIG3, DRDY};
use crate::Transport;

#[derive(Debug, PartialEq)]
pub struct MockError;

/// Answers command frames the way the converter does.
#[derive(Debug, Default)]
pub struct MockDevice {
    pub registers: [u8; 5],
    /// Every frame written, in order.
    pub frames: Vec<Vec<u8>>,
    /// Results served by RDATA, or streamed on START in AUTO mode.
    pub samples: VecDeque<i32>,
    /// Bytes that show up after an AUTO mode stream.
    pub trailing: Vec<u8>,
    /// Status register reads that report not ready before DRDY is set.
    pub ready_after: usize,
    pub status_reads: usize,
    pub discards: usize,
    /// Fail every write.
    pub fail: bool,
    /// Fail only writes of this frame.
    pub fail_frame: Option<Vec<u8>>,
    /// Swallow every response.
    pub mute: bool,
    sample_bytes: usize,
    rx: VecDeque<u8>,
}

impl MockDevice {
    pub fn new(sample_bytes: usize) -> Self {
        Self {
            sample_bytes,
            ..Default::default()
        }
    }

    pub fn pending(&self) -> &VecDeque<u8> {
        &self.rx
    }

    fn respond(&mut self, bytes: &[u8]) {
        if !self.mute {
            self.rx.extend(bytes);
        }
    }

    fn push_sample(&mut self) {
        if let Some(sample) = self.samples.pop_front() {
            let bytes = sample.to_le_bytes();
            self.respond(&bytes[..self.sample_bytes]);
        }
    }

    fn register_value(&mut self, index: u8) -> u8 {
        let value = self.registers.get(usize::from(index)).copied().unwrap_or(0);

        if index == CONFIG2 {
            self.status_reads += 1;
            if self.status_reads > self.ready_after {
                return value | DRDY;
            }
            return value & !DRDY;
        }

        value
    }
}

impl Transport for MockDevice {
    type Error = MockError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail || self.fail_frame.as_deref() == Some(bytes) {
            return Err(MockError);
        }

        self.frames.push(bytes.to_vec());

        assert_eq!(bytes[0], SYNC, "missing sync byte");
        let opcode = bytes[1];
        let index = (opcode & 0x0F) / 2;

        match opcode & 0xF0 {
            RREG => {
                assert_eq!(bytes.len(), 2);
                let value = self.register_value(index);
                self.respond(&[value]);
            }
            WREG => {
                assert_eq!(bytes.len(), 3);
                if let Some(register) = self.registers.get_mut(usize::from(index)) {
                    *register = bytes[2];
                }
            }
            _ => match opcode {
                RDATA => self.push_sample(),
                START if self.registers[usize::from(CONFIG3)] & AUTO != 0 => {
                    while !self.samples.is_empty() {
                        self.push_sample();
                    }
                    let trailing = core::mem::take(&mut self.trailing);
                    self.respond(&trailing);
                }
                START | POWERDOWN => {}
                RESET => self.registers = [0; 5],
                _ => panic!("unexpected opcode {opcode:#04x}"),
            },
        }

        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let count = buffer.len().min(self.rx.len());

        for (slot, byte) in buffer.iter_mut().zip(self.rx.drain(..count)) {
            *slot = byte;
        }

        Ok(count)
    }

    fn discard_input(&mut self) -> Result<(), Self::Error> {
        self.rx.clear();
        self.discards += 1;
        Ok(())
    }
}

/// Records requested delay instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
