//! LSB-first bit reader over an immutable byte slice.

use crate::error::{Error, Result};

/// Sequential bit reader in DEFLATE bit order.
///
/// Bits are consumed from the least significant end of each byte. The
/// cursor only moves forward; requesting bits past the end of the slice is
/// an error rather than an implicit zero fill.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_position: usize,
    /// Always in `0..8`.
    bit_position: u8,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_position: 0,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<u32> {
        let byte = *self
            .data
            .get(self.byte_position)
            .ok_or(Error::TruncatedStream)?;
        let bit = (byte >> self.bit_position) & 1;

        self.bit_position += 1;
        if self.bit_position == 8 {
            self.bit_position = 0;
            self.byte_position += 1;
        }

        Ok(u32::from(bit))
    }

    /// Read `n` bits (at most 32); the first bit read lands in bit 0.
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);

        if self.remaining_bits() < usize::from(n) {
            // Leave the cursor where it was so the failure is not half-applied.
            return Err(Error::TruncatedStream);
        }

        let mut value = 0u32;
        for i in 0..n {
            value |= self.read_bit()? << i;
        }
        Ok(value)
    }

    /// Skip the remaining bits of a partially consumed byte.
    pub fn align_to_byte(&mut self) {
        if self.bit_position != 0 {
            self.bit_position = 0;
            self.byte_position += 1;
        }
    }

    /// Borrow `n` whole bytes starting at the next byte boundary.
    pub fn read_aligned_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.align_to_byte();

        let end = self
            .byte_position
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::TruncatedStream)?;

        let bytes = &self.data[self.byte_position..end];
        self.byte_position = end;
        Ok(bytes)
    }

    /// Number of input bytes touched so far, counting a partial byte as used.
    pub fn bytes_consumed(&self) -> usize {
        self.byte_position + usize::from(self.bit_position != 0)
    }

    fn remaining_bits(&self) -> usize {
        self.data
            .len()
            .saturating_sub(self.byte_position)
            .saturating_mul(8)
            .saturating_sub(usize::from(self.bit_position))
    }
}
