//! Bit-granularity I/O over byte streams.
//!
//! Multi-bit fields are written and read most-significant bit first, and bits
//! fill each byte starting from its high bit. [`BitWriter::finish`] pads the
//! final partial byte with zero bits. A writer dropped without `finish` hands
//! nothing further to its sink; bytes already flushed stay there and are not
//! a complete stream.
//!
//! The reader pulls one byte from the underlying source at a time, so it never
//! consumes input beyond the byte holding the last bit asked for. Wrap files in
//! a `BufReader` to avoid a syscall per byte.

use crate::cs::compression::Result;
use crate::cs::error::Error;
use bitvec::prelude::*;
use std::io::{ErrorKind, Read, Write};

/// Pending bits are handed to the inner writer once this many accumulate.
const FLUSH_BITS: usize = 8 * 4096;

/// Widest field `write_bits` and `read_bits` accept.
pub const MAX_FIELD_BITS: usize = 32;

/// Writes individual bits and fixed-width fields to a byte sink.
pub struct BitWriter<W: Write> {
    inner: W,
    pending: BitVec<u8, Msb0>,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Creates a writer that emits bytes to `inner`.
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            pending: BitVec::with_capacity(FLUSH_BITS),
            bits_written: 0,
        }
    }

    /// Number of bits written so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.pending.push(bit);
        self.bits_written += 1;
        if self.pending.len() >= FLUSH_BITS {
            self.flush_pending()?;
        }
        Ok(())
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: usize) -> Result<()> {
        if count > MAX_FIELD_BITS {
            return Err(Error::InvalidInput(format!(
                "cannot write a {}-bit field (maximum is {})",
                count, MAX_FIELD_BITS
            )));
        }
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Writes every bit of `code` in order.
    pub fn write_code(&mut self, code: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in code.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Pads to a byte boundary, flushes, and returns the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.pad_to_byte();
        self.flush_pending()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn pad_to_byte(&mut self) {
        while self.pending.len() % 8 != 0 {
            self.pending.push(false);
        }
    }

    // Only called with a whole number of bytes pending.
    fn flush_pending(&mut self) -> Result<()> {
        debug_assert_eq!(self.pending.len() % 8, 0);
        if self.pending.is_empty() {
            return Ok(());
        }
        self.inner.write_all(self.pending.as_raw_slice())?;
        self.pending.clear();
        Ok(())
    }
}

/// Reads individual bits and fixed-width fields from a byte source.
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: usize,
    bits_read: u64,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    /// Creates a reader over `inner`.
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
            bits_read: 0,
            exhausted: false,
        }
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Returns `true` if at least one more bit can be read.
    pub fn has_more_bits(&mut self) -> Result<bool> {
        self.fill()
    }

    /// Reads one bit, or `None` at the end of the data.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if !self.fill()? {
            return Ok(None);
        }
        let bit = self.current.view_bits::<Msb0>()[8 - self.remaining];
        self.remaining -= 1;
        self.bits_read += 1;
        Ok(Some(bit))
    }

    /// Reads a `count`-bit unsigned field, most significant bit first.
    ///
    /// Returns `None` if the data ends before the field is complete; the
    /// partial field is consumed in that case.
    pub fn read_bits(&mut self, count: usize) -> Result<Option<u32>> {
        if count > MAX_FIELD_BITS {
            return Err(Error::InvalidInput(format!(
                "cannot read a {}-bit field (maximum is {})",
                count, MAX_FIELD_BITS
            )));
        }
        let mut value: u32 = 0;
        for _ in 0..count {
            match self.read_bit()? {
                Some(bit) => value = (value << 1) | u32::from(bit),
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }

    /// Returns the underlying reader. Unread bits of the current byte are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> Result<bool> {
        if self.remaining > 0 {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(_) => {
                    self.current = byte[0];
                    self.remaining = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
