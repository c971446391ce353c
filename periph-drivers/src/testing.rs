//! Recording fakes for driver tests
//!
//! [`RecordingBus`] and [`RecordingDelay`] append to one shared [`Journal`],
//! so tests can assert on the exact interleaving of bus traffic and waits.

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use periph_hal::{I2cBus, I2cBusError};

/// One recorded bus call or delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write { address: u8, data: Vec<u8> },
    Read { address: u8, len: usize },
    WriteRead { address: u8, data: Vec<u8>, len: usize },
    WriteRegister { address: u8, register: u8, data: Vec<u8> },
    ReadRegister { address: u8, register: u8, len: usize },
    Delay { ns: u64 },
}

/// Shared, ordered log of everything the fakes saw
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Op>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, op: Op) {
        self.0.borrow_mut().push(op);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Payloads of register writes to `register` on `address`, in order
    pub fn register_payloads(&self, address: u8, register: u8) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|op| match op {
                Op::WriteRegister {
                    address: a,
                    register: r,
                    data,
                } if *a == address && *r == register => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// All delays, in nanoseconds, in order
    pub fn delays(&self) -> Vec<u64> {
        self.0
            .borrow()
            .iter()
            .filter_map(|op| match op {
                Op::Delay { ns } => Some(*ns),
                _ => None,
            })
            .collect()
    }
}

/// Bus fake that records every call and replays scripted read data
pub struct RecordingBus {
    journal: Journal,
    responses: VecDeque<Vec<u8>>,
    /// Fail every call once this many calls have succeeded
    fail_after: Option<usize>,
    calls: usize,
}

impl RecordingBus {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            responses: VecDeque::new(),
            fail_after: None,
            calls: 0,
        }
    }

    /// Queue the bytes returned by the next read
    pub fn respond(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    /// Let `calls` calls succeed, then NACK everything
    pub fn fail_after(&mut self, calls: usize) {
        self.fail_after = Some(calls);
    }

    fn begin(&mut self) -> Result<(), I2cBusError> {
        if let Some(limit) = self.fail_after {
            if self.calls >= limit {
                return Err(I2cBusError::Nack);
            }
        }
        self.calls += 1;
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) {
        let data = self.responses.pop_front().unwrap_or_default();
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = data.get(i).copied().unwrap_or(0);
        }
    }
}

impl I2cBus for RecordingBus {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.begin()?;
        self.journal.push(Op::Write {
            address,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.begin()?;
        self.journal.push(Op::Read {
            address,
            len: buf.len(),
        });
        self.fill(buf);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.begin()?;
        self.journal.push(Op::WriteRead {
            address,
            data: write_data.to_vec(),
            len: read_buf.len(),
        });
        self.fill(read_buf);
        Ok(())
    }

    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        self.begin()?;
        self.journal.push(Op::WriteRegister {
            address,
            register,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.begin()?;
        self.journal.push(Op::ReadRegister {
            address,
            register,
            len: buf.len(),
        });
        self.fill(buf);
        Ok(())
    }
}

/// Delay fake that records requested durations instead of sleeping
pub struct RecordingDelay {
    journal: Journal,
}

impl RecordingDelay {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.journal.push(Op::Delay { ns: ns as u64 });
    }

    fn delay_us(&mut self, us: u32) {
        self.journal.push(Op::Delay {
            ns: us as u64 * 1_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.journal.push(Op::Delay {
            ns: ms as u64 * 1_000_000,
        });
    }
}

/// Journal plus a bus and delay wired to it
pub fn rig() -> (Journal, RecordingBus, RecordingDelay) {
    let journal = Journal::new();
    let bus = RecordingBus::new(journal.clone());
    let delay = RecordingDelay::new(journal.clone());
    (journal, bus, delay)
}
