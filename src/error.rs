//! Error types for the rawsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for rawsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a spreadsheet.
///
/// Every variant is terminal for the current decode call. Cell-level
/// oddities inside otherwise valid XML never surface here; those cells are
/// skipped instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with a ZIP local file header.
    #[error("Not a ZIP container (missing local file header signature)")]
    NotAZipContainer,

    /// A local file header points past the end of the buffer.
    #[error("Corrupt ZIP header: {0}")]
    CorruptZipHeader(String),

    /// No local file header could be read at all.
    #[error("ZIP archive contains no entries")]
    EmptyArchive,

    /// The cells span a grid larger than the configured cell limit.
    #[error("Sheet spans {rows} rows x {columns} columns, over the limit of {limit} cells")]
    TooManyCells {
        /// Highest row holding a value
        rows: u32,
        /// Highest column holding a value
        columns: u32,
        /// Configured maximum number of materialized cells
        limit: usize,
    },

    /// A required part (usually the worksheet) is missing.
    #[error("Missing required entry: {0}")]
    MissingRequiredEntry(String),

    /// The entry uses a compression method other than stored or deflate.
    #[error("Unsupported compression method {method} for entry '{name}'")]
    UnsupportedCompression {
        /// Entry name
        name: String,
        /// Raw method number from the local header
        method: u16,
    },

    /// The entry is encrypted and cannot be processed.
    #[error("Entry '{0}' is encrypted")]
    Encrypted(String),

    /// The compressed stream ended before the decoder was done.
    #[error("Truncated DEFLATE stream")]
    TruncatedStream,

    /// A set of code lengths does not describe a usable prefix code.
    #[error("Invalid Huffman code lengths: {0}")]
    InvalidHuffmanSpec(&'static str),

    /// The bit stream does not match any code of the active table.
    #[error("Invalid Huffman code in stream")]
    InvalidHuffmanCode,

    /// Block type 3 is reserved by the format.
    #[error("Invalid DEFLATE block type {0}")]
    InvalidBlockType(u32),

    /// A decoded length or distance symbol has no meaning.
    #[error("Invalid DEFLATE symbol {0}")]
    InvalidSymbol(u16),

    /// A stored block's LEN does not match its one's complement.
    #[error("Stored block LEN {len:#06x} does not match NLEN {nlen:#06x}")]
    LenNlenMismatch {
        /// Declared length
        len: u32,
        /// Declared one's complement of the length
        nlen: u32,
    },

    /// Code-length code 16 appeared before any length was known.
    #[error("Code length repeat with no previous length")]
    RepeatWithNoPrior,

    /// A back-reference points before the start of the output.
    #[error("Back-reference distance {distance} exceeds {available} bytes of output")]
    DistanceOutOfRange {
        /// Requested distance
        distance: usize,
        /// Bytes produced so far
        available: usize,
    },

    /// The input is neither an OOXML container nor delimited text.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error while reading or writing delimited text.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
