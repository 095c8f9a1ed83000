//! Canonical Huffman tables (RFC 1951 §3.2.2).

use super::bit_reader::BitReader;
use crate::error::{Error, Result};

/// Longest code length DEFLATE allows.
pub const MAX_CODE_LENGTH: usize = 15;

const EMPTY: u16 = u16::MAX;

/// Prefix-code table built from per-symbol code lengths.
///
/// Codes are stored bit-reversed, because DEFLATE transmits Huffman codes
/// most significant bit first while the stream itself is read LSB-first.
/// The slot for a code of length `len` whose reversed value is `code` is
/// `(1 << len) | code`, so every (code, length) pair has a unique slot.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    slots: Vec<u16>,
    max_length: u8,
}

impl HuffmanTable {
    /// Build the canonical table for `lengths` (0 marks an unused symbol).
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let max_length = lengths.iter().copied().max().unwrap_or(0);
        if max_length == 0 {
            return Err(Error::InvalidHuffmanSpec("all code lengths are zero"));
        }
        if usize::from(max_length) > MAX_CODE_LENGTH {
            return Err(Error::InvalidHuffmanSpec("code length exceeds 15 bits"));
        }

        let mut count = [0u32; MAX_CODE_LENGTH + 1];
        for &len in lengths {
            count[usize::from(len)] += 1;
        }
        count[0] = 0;

        let mut next_code = [0u32; MAX_CODE_LENGTH + 2];
        let mut code = 0u32;
        for len in 1..=usize::from(max_length) {
            code = (code + count[len - 1]) << 1;
            next_code[len] = code;
        }

        let mut slots = vec![EMPTY; 1 << (usize::from(max_length) + 1)];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let len_idx = usize::from(len);
            let code = next_code[len_idx];
            if code >= 1 << len {
                return Err(Error::InvalidHuffmanSpec(
                    "code lengths over-subscribe the code space",
                ));
            }
            next_code[len_idx] += 1;

            let reversed = reverse_bits(code, len) as usize;
            slots[(1 << len_idx) | reversed] = symbol as u16;
        }

        Ok(Self { slots, max_length })
    }

    /// Table for the fixed literal/length alphabet of block type 1.
    pub fn fixed_literal_length() -> Result<Self> {
        let mut lengths = [0u8; 288];
        lengths[..144].fill(8);
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths[280..].fill(8);
        Self::from_lengths(&lengths)
    }

    /// Table for the fixed distance alphabet of block type 1.
    pub fn fixed_distance() -> Result<Self> {
        Self::from_lengths(&[5u8; 32])
    }

    /// Decode one symbol, reading the stream one bit at a time.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0usize;
        for len in 1..=usize::from(self.max_length) {
            code |= (reader.read_bit()? as usize) << (len - 1);
            let symbol = self.slots[(1 << len) | code];
            if symbol != EMPTY {
                return Ok(symbol);
            }
        }
        Err(Error::InvalidHuffmanCode)
    }

    /// Look up the symbol assigned to a bit-reversed code of `len` bits.
    pub fn symbol_for(&self, reversed_code: u32, len: u8) -> Option<u16> {
        if len == 0 || len > self.max_length || reversed_code >= 1 << len {
            return None;
        }
        match self.slots[(1usize << len) | reversed_code as usize] {
            EMPTY => None,
            symbol => Some(symbol),
        }
    }

    /// Longest code length present in the table.
    pub fn max_length(&self) -> u8 {
        self.max_length
    }
}

fn reverse_bits(code: u32, len: u8) -> u32 {
    let mut reversed = 0;
    for i in 0..len {
        reversed |= ((code >> i) & 1) << (len - 1 - i);
    }
    reversed
}
