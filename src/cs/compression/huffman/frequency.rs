//! Byte frequency analysis.

use crate::cs::compression::Result;
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 64 * 1024;

/// Occurrence counts for each byte value of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        FrequencyTable { counts: [0; 256] }
    }

    /// Count every byte of `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add_bytes(data);
        table
    }

    /// Count every byte of `reader` until end of input.
    ///
    /// Returns the table together with the number of bytes read.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<(Self, u64)> {
        let mut table = Self::new();
        let mut buf = vec![0u8; READ_CHUNK];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.add_bytes(&buf[..n]);
            total += n as u64;
        }
        Ok((table, total))
    }

    /// Add the bytes of `data` to the counts
    pub fn add_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Number of occurrences of `byte`
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Total number of bytes counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values that occur at least once
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Returns `true` if nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// Iterate over `(byte, count)` for every byte that occurs, in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}
