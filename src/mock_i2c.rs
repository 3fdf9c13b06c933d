//! Scripted I²C bus for driver tests.
//!
//! Registers are keyed by the first byte of a write (the register pointer),
//! so word registers and command-prefixed registers both work without the
//! fake knowing anything about the chip.

use std::collections::BTreeMap;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    Nack,
    Timeout,
}

impl embedded_hal::i2c::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        match self {
            FakeError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            FakeError::Timeout => ErrorKind::Other,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeI2c {
    registers: BTreeMap<u8, Vec<u8>>,
    /// every write sent, with the address it was sent to
    pub sent: Vec<(u8, Vec<u8>)>,
    /// number of read operations served
    pub reads: usize,
    pub fail_writes: bool,
    /// accept this many writes, NACK the ones after
    pub fail_writes_after: Option<usize>,
    pub fail_reads: bool,
}

impl FakeI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register with the bytes a read of it should return
    pub fn set_register(&mut self, register: u8, bytes: &[u8]) {
        self.registers.insert(register, bytes.to_vec());
    }

    /// Preload a little-endian 16-bit register
    pub fn set_word(&mut self, register: u8, value: u16) {
        self.set_register(register, &value.to_le_bytes());
    }

    pub fn register(&self, register: u8) -> Option<&[u8]> {
        self.registers.get(&register).map(Vec::as_slice)
    }

    pub fn transactions(&self) -> usize {
        self.sent.len() + self.reads
    }
}

impl ErrorType for FakeI2c {
    type Error = FakeError;
}

impl I2c<SevenBitAddress> for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut pointer = None;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let exhausted = self.fail_writes_after.is_some_and(|n| self.sent.len() >= n);
                    if self.fail_writes || exhausted {
                        return Err(FakeError::Nack);
                    }
                    self.sent.push((address, bytes.to_vec()));
                    if let Some((&register, data)) = bytes.split_first() {
                        pointer = Some(register);
                        if !data.is_empty() {
                            self.registers.insert(register, data.to_vec());
                        }
                    }
                }
                Operation::Read(buf) => {
                    if self.fail_reads {
                        return Err(FakeError::Timeout);
                    }
                    self.reads += 1;
                    buf.fill(0);
                    if let Some(stored) = pointer.and_then(|r| self.registers.get(&r)) {
                        let len = stored.len().min(buf.len());
                        buf[..len].copy_from_slice(&stored[..len]);
                    }
                }
            }
        }
        Ok(())
    }
}
