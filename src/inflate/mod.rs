//! In-memory DEFLATE decompression.
//!
//! Supports the three block types of RFC 1951: stored, fixed Huffman and
//! dynamic Huffman. Streams are decoded from a borrowed slice into an owned
//! buffer; back-references only ever read from that same buffer.
//!
//! # Example
//!
//! ```
//! use rawsheet::inflate::inflate;
//!
//! // One final stored block holding "HELLO".
//! let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'E', b'L', b'L', b'O'];
//! assert_eq!(inflate(&data)?, b"HELLO");
//! # Ok::<(), rawsheet::Error>(())
//! ```

mod bit_reader;
mod decoder;
mod huffman;

pub use bit_reader::BitReader;
pub use decoder::{inflate, inflate_with_hint, Inflated};
pub use huffman::{HuffmanTable, MAX_CODE_LENGTH};
