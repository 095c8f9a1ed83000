//! DEFLATE block decoder (RFC 1951).

use super::bit_reader::BitReader;
use super::huffman::HuffmanTable;
use crate::error::{Error, Result};
use log::trace;

/// Upper bound for trusting a caller's size hint when preallocating.
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

const END_OF_BLOCK: u16 = 256;

/// Length code base values (symbols 257-285).
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (symbols 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Transmission order of the code-length alphabet in dynamic blocks.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Result of inflating one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflated {
    /// Uncompressed bytes
    pub data: Vec<u8>,
    /// Compressed bytes consumed, including the final partial byte
    pub consumed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockType {
    Stored,
    FixedHuffman,
    DynamicHuffman,
}

impl BlockType {
    fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            0 => Ok(BlockType::Stored),
            1 => Ok(BlockType::FixedHuffman),
            2 => Ok(BlockType::DynamicHuffman),
            other => Err(Error::InvalidBlockType(other)),
        }
    }
}

/// Inflate a raw DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    inflate_with_hint(data, 0).map(|inflated| inflated.data)
}

/// Inflate a raw DEFLATE stream, preallocating up to `size_hint` bytes.
///
/// The hint usually comes from a ZIP header and is not trusted beyond a
/// fixed cap.
pub fn inflate_with_hint(data: &[u8], size_hint: usize) -> Result<Inflated> {
    let mut inflater = Inflater {
        reader: BitReader::new(data),
        output: Vec::with_capacity(size_hint.min(MAX_PREALLOCATION)),
    };
    inflater.run()?;

    Ok(Inflated {
        consumed: inflater.reader.bytes_consumed(),
        data: inflater.output,
    })
}

struct Inflater<'a> {
    reader: BitReader<'a>,
    output: Vec<u8>,
}

impl Inflater<'_> {
    fn run(&mut self) -> Result<()> {
        let mut fixed_tables: Option<(HuffmanTable, HuffmanTable)> = None;

        loop {
            let is_final = self.reader.read_bit()? == 1;
            let block_type = BlockType::from_bits(self.reader.read_bits(2)?)?;
            trace!(
                "deflate block {:?} (final: {}) at output offset {}",
                block_type,
                is_final,
                self.output.len()
            );

            match block_type {
                BlockType::Stored => self.stored_block()?,
                BlockType::FixedHuffman => {
                    if fixed_tables.is_none() {
                        fixed_tables = Some((
                            HuffmanTable::fixed_literal_length()?,
                            HuffmanTable::fixed_distance()?,
                        ));
                    }
                    if let Some((literal, distance)) = &fixed_tables {
                        self.huffman_block(literal, Some(distance))?;
                    }
                }
                BlockType::DynamicHuffman => {
                    let (literal, distance) = self.read_dynamic_tables()?;
                    self.huffman_block(&literal, distance.as_ref())?;
                }
            }

            if is_final {
                return Ok(());
            }
        }
    }

    fn stored_block(&mut self) -> Result<()> {
        self.reader.align_to_byte();
        let len = self.reader.read_bits(16)?;
        let nlen = self.reader.read_bits(16)?;
        if len ^ 0xFFFF != nlen {
            return Err(Error::LenNlenMismatch { len, nlen });
        }

        let bytes = self.reader.read_aligned_bytes(len as usize)?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Read the code-length header of a dynamic block and build its tables.
    ///
    /// The distance table is `None` when every distance length is zero, which
    /// encoders emit for literal-only blocks.
    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, Option<HuffmanTable>)> {
        let hlit = self.reader.read_bits(5)? as usize + 257;
        let hdist = self.reader.read_bits(5)? as usize + 1;
        let hclen = self.reader.read_bits(4)? as usize + 4;
        if hlit > 286 || hdist > 30 {
            return Err(Error::InvalidHuffmanSpec(
                "too many literal/length or distance codes",
            ));
        }

        let mut code_length_lengths = [0u8; 19];
        for &symbol in CODE_LENGTH_ORDER.iter().take(hclen) {
            code_length_lengths[symbol] = self.reader.read_bits(3)? as u8;
        }
        let code_length_table = HuffmanTable::from_lengths(&code_length_lengths)?;

        let total = hlit + hdist;
        let mut lengths: Vec<u8> = Vec::with_capacity(total);
        while lengths.len() < total {
            let symbol = code_length_table.decode_symbol(&mut self.reader)?;
            let (value, repeat) = match symbol {
                0..=15 => (symbol as u8, 1),
                16 => {
                    let previous = *lengths.last().ok_or(Error::RepeatWithNoPrior)?;
                    (previous, 3 + self.reader.read_bits(2)? as usize)
                }
                17 => (0, 3 + self.reader.read_bits(3)? as usize),
                18 => (0, 11 + self.reader.read_bits(7)? as usize),
                other => return Err(Error::InvalidSymbol(other)),
            };

            if lengths.len() + repeat > total {
                return Err(Error::InvalidHuffmanSpec(
                    "code length run overflows the alphabet",
                ));
            }
            lengths.resize(lengths.len() + repeat, value);
        }

        let (literal_lengths, distance_lengths) = lengths.split_at(hlit);
        if literal_lengths[usize::from(END_OF_BLOCK)] == 0 {
            return Err(Error::InvalidHuffmanSpec("missing end-of-block code"));
        }

        let literal = HuffmanTable::from_lengths(literal_lengths)?;
        let distance = if distance_lengths.iter().all(|&len| len == 0) {
            None
        } else {
            Some(HuffmanTable::from_lengths(distance_lengths)?)
        };

        trace!(
            "dynamic block: {} literal/length codes, {} distance codes",
            hlit,
            hdist
        );
        Ok((literal, distance))
    }

    fn huffman_block(
        &mut self,
        literal: &HuffmanTable,
        distance: Option<&HuffmanTable>,
    ) -> Result<()> {
        loop {
            let symbol = literal.decode_symbol(&mut self.reader)?;
            match symbol {
                0..=255 => self.output.push(symbol as u8),
                END_OF_BLOCK => return Ok(()),
                _ => {
                    let length = self.read_length(symbol)?;
                    let distance_table = distance.ok_or(Error::InvalidHuffmanSpec(
                        "back-reference in a block without distance codes",
                    ))?;
                    let distance = self.read_distance(distance_table)?;
                    self.copy_back_reference(distance, length)?;
                }
            }
        }
    }

    fn read_length(&mut self, symbol: u16) -> Result<usize> {
        let index = usize::from(symbol - 257);
        if index >= LENGTH_BASE.len() {
            return Err(Error::InvalidSymbol(symbol));
        }
        let extra = self.reader.read_bits(LENGTH_EXTRA[index])? as usize;
        Ok(usize::from(LENGTH_BASE[index]) + extra)
    }

    fn read_distance(&mut self, table: &HuffmanTable) -> Result<usize> {
        let symbol = table.decode_symbol(&mut self.reader)?;
        let index = usize::from(symbol);
        if index >= DISTANCE_BASE.len() {
            return Err(Error::InvalidSymbol(symbol));
        }
        let extra = self.reader.read_bits(DISTANCE_EXTRA[index])? as usize;
        Ok(usize::from(DISTANCE_BASE[index]) + extra)
    }

    /// Copy `length` bytes starting `distance` bytes back; the ranges may overlap.
    fn copy_back_reference(&mut self, distance: usize, length: usize) -> Result<()> {
        let available = self.output.len();
        if distance > available {
            return Err(Error::DistanceOutOfRange {
                distance,
                available,
            });
        }

        let start = available - distance;
        self.output.reserve(length);
        for i in 0..length {
            let byte = self.output[start + i];
            self.output.push(byte);
        }
        Ok(())
    }
}
