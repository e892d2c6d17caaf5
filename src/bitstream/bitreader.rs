//! BitReader: reads a packed bitstream back, most significant bit first.
//!
//! The reader works over a byte slice and can be told to ignore a number of trailing bits, which
//! is how the zero padding of the last byte written by a BitStream is skipped.
//!

use super::bitpacker::BYTE_SIZE;

/// Reads bits from a slice of packed bytes.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Number of bits that may be read in total.
    limit: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over every bit of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            limit: buffer.len() * BYTE_SIZE as usize,
        }
    }

    /// Ignore the last `n` bits of the buffer.
    pub fn drop_last(mut self, n: usize) -> Self {
        self.limit = self.limit.saturating_sub(n);
        self
    }

    fn bit_pos(&self) -> usize {
        self.cursor * BYTE_SIZE as usize + self.bit_index
    }

    /// Bits still available.
    pub fn remaining(&self) -> usize {
        self.limit - self.bit_pos()
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.bit_pos() >= self.limit {
            return None;
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == BYTE_SIZE as usize {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<usize> of the next n bits, or None if fewer than n bits are left. Nothing is
    /// consumed when None is returned.
    pub fn bint(&mut self, n: usize) -> Option<usize> {
        if n > self.remaining() {
            return None;
        }
        let mut result = 0_usize;
        for _ in 0..n {
            result = (result << 1) | self.bit()?;
        }
        Some(result)
    }

    /// Debugging function. Report current position in the buffer as [byte.bit].
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.bool_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}
