//! Bit input abstractions and implementations
//!
//! This module provides the reading half of the bit I/O port: a trait for
//! pulling fixed-width bit fields from a source, plus implementations over
//! byte slices and seekable readers. Fields are delivered most-significant
//! bit first, and end of input is a distinguished `Ok(None)` rather than an
//! error, mirroring the sentinel returned by classic bit-stream readers.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::Result;

/// Trait for reading bit fields from a rewindable source
///
/// Implementations track the number of bits consumed since the last
/// [`reset`](BitInput::reset), which the codec reports in its statistics.
pub trait BitInput {
    /// Read the next `count` bits as an unsigned integer, most-significant
    /// bit first
    ///
    /// Returns `Ok(None)` when fewer than `count` bits remain. `count` must
    /// be at most 32. Bits consumed before a mid-field end of input are
    /// discarded, not replayed.
    fn read_bits(&mut self, count: u32) -> Result<Option<u32>>;

    /// Rewind to the start of the stream and restart the bit counter
    fn reset(&mut self) -> Result<()>;

    /// Number of bits consumed since construction or the last reset
    fn bits_read(&self) -> u64;
}

/// BitInput implementation over a byte slice
#[derive(Debug)]
pub struct SliceBitInput<'a> {
    data: &'a [u8],
    position: u64,
}

impl<'a> SliceBitInput<'a> {
    /// Create a new `SliceBitInput` positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Number of unread bits remaining
    pub fn remaining_bits(&self) -> u64 {
        self.data.len() as u64 * 8 - self.position
    }
}

impl BitInput for SliceBitInput<'_> {
    fn read_bits(&mut self, count: u32) -> Result<Option<u32>> {
        debug_assert!(count <= 32, "bit fields are at most 32 bits wide");
        if self.remaining_bits() < u64::from(count) {
            return Ok(None);
        }

        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.data[(self.position / 8) as usize];
            let bit = (byte >> (7 - (self.position % 8))) & 1;
            value = (value << 1) | u32::from(bit);
            self.position += 1;
        }
        Ok(Some(value))
    }

    fn reset(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.position
    }
}

/// BitInput implementation over a seekable `std::io::Read` source
#[derive(Debug)]
pub struct ReaderBitInput<R> {
    inner: R,
    current: u8,
    bits_left: u32,
    bits_read: u64,
}

impl<R: Read + Seek> ReaderBitInput<R> {
    /// Create a new `ReaderBitInput` over `inner`
    ///
    /// The reader is assumed to be positioned at the start of the stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Consume the port and return the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.current = buf[0];
                    self.bits_left = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read + Seek> BitInput for ReaderBitInput<R> {
    fn read_bits(&mut self, count: u32) -> Result<Option<u32>> {
        debug_assert!(count <= 32, "bit fields are at most 32 bits wide");
        let mut value = 0u32;
        for _ in 0..count {
            if self.bits_left == 0 && !self.fill()? {
                return Ok(None);
            }
            self.bits_left -= 1;
            let bit = (self.current >> self.bits_left) & 1;
            value = (value << 1) | u32::from(bit);
            self.bits_read += 1;
        }
        Ok(Some(value))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.bits_left = 0;
        self.bits_read = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}
