//! Bit output abstractions and implementations
//!
//! The writing half of the bit I/O port: a trait for appending fixed-width
//! bit fields, plus implementations over `Vec<u8>` and arbitrary
//! `std::io::Write` destinations. Fields are laid down most-significant bit
//! first; closing a port zero-fills the final partial byte.

use std::io::Write;

use crate::error::Result;

/// Trait for writing bit fields to a destination
pub trait BitOutput {
    /// Append the low `count` bits of `value`, most-significant bit of the
    /// field first
    ///
    /// `count` must be at most 32.
    fn write_bits(&mut self, count: u32, value: u32) -> Result<()>;

    /// Zero-fill the final partial byte and finalize the output
    ///
    /// After `close`, [`bits_written`](BitOutput::bits_written) includes the
    /// padding bits.
    fn close(&mut self) -> Result<()>;

    /// Number of bits written so far
    fn bits_written(&self) -> u64;
}

/// BitOutput implementation backed by a `Vec<u8>`
#[derive(Debug, Default)]
pub struct VecBitOutput {
    data: Vec<u8>,
    bit_count: u64,
}

impl VecBitOutput {
    /// Create a new empty `VecBitOutput`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new `VecBitOutput` with the specified byte capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            bit_count: 0,
        }
    }

    /// View the bytes written so far
    ///
    /// The final byte is already zero-padded, so this is valid to call both
    /// before and after [`close`](BitOutput::close).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the port and return the written bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn push_bit(&mut self, bit: bool) {
        let byte_index = (self.bit_count / 8) as usize;
        let bit_offset = self.bit_count % 8;
        if byte_index == self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[byte_index] |= 1 << (7 - bit_offset);
        }
        self.bit_count += 1;
    }
}

impl BitOutput for VecBitOutput {
    fn write_bits(&mut self, count: u32, value: u32) -> Result<()> {
        debug_assert!(count <= 32, "bit fields are at most 32 bits wide");
        for bit_pos in (0..count).rev() {
            self.push_bit((value >> bit_pos) & 1 != 0);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Bytes in the buffer are already zero in their unused low bits;
        // closing just accounts the padding.
        self.bit_count = self.data.len() as u64 * 8;
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bit_count
    }
}

/// BitOutput implementation over a `std::io::Write` destination
#[derive(Debug)]
pub struct WriterBitOutput<W> {
    inner: W,
    current: u8,
    bits_used: u32,
    bits_written: u64,
}

impl<W: Write> WriterBitOutput<W> {
    /// Create a new `WriterBitOutput` over `inner`
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            bits_used: 0,
            bits_written: 0,
        }
    }

    /// Consume the port and return the underlying writer
    ///
    /// [`close`](BitOutput::close) must be called first or a trailing
    /// partial byte is lost.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> BitOutput for WriterBitOutput<W> {
    fn write_bits(&mut self, count: u32, value: u32) -> Result<()> {
        debug_assert!(count <= 32, "bit fields are at most 32 bits wide");
        for bit_pos in (0..count).rev() {
            let bit = ((value >> bit_pos) & 1) as u8;
            self.current = (self.current << 1) | bit;
            self.bits_used += 1;
            self.bits_written += 1;
            if self.bits_used == 8 {
                self.inner.write_all(&[self.current])?;
                self.current = 0;
                self.bits_used = 0;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.bits_used > 0 {
            let padding = 8 - self.bits_used;
            self.current <<= padding;
            self.inner.write_all(&[self.current])?;
            self.bits_written += u64::from(padding);
            self.current = 0;
            self.bits_used = 0;
        }
        self.inner.flush()?;
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}
