//! # rawsheet
//!
//! Self-contained spreadsheet reader that turns XLSX workbooks and
//! delimited text into rectangular matrices of strings.
//!
//! Workbooks are decoded without an archive or XML library: entries are
//! found by scanning ZIP local file headers, DEFLATE streams are inflated
//! in memory, and cell values are pulled out of the shared string table
//! and one worksheet by lightweight text scanning.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rawsheet::{decode_file, DecodeOptions};
//!
//! let matrix = decode_file("data.xlsx", &DecodeOptions::default())?;
//! for row in matrix.rows() {
//!     println!("{}", row.join(" | "));
//! }
//! # Ok::<(), rawsheet::Error>(())
//! ```
//!
//! ## Selecting a Sheet
//!
//! ```no_run
//! use rawsheet::{decode, list_sheets, DecodeOptions};
//!
//! let data = std::fs::read("report.xlsx")?;
//! for sheet in list_sheets(&data)? {
//!     println!("{}: {}", sheet.position, sheet.name);
//! }
//!
//! let summary = decode(&data, &DecodeOptions::new().with_sheet_name("Summary"))?;
//! # Ok::<(), rawsheet::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: `decode_file_async`, reading the file with Tokio

pub mod container;
pub mod delimited;
pub mod detect;
pub mod error;
pub mod inflate;
pub mod model;
pub mod options;
pub mod render;
pub mod xlsx;

// Re-exports
pub use container::{OoxmlContainer, ZipEntry};
pub use delimited::{detect_delimiter, read_delimited};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use model::{Matrix, SheetCells};
pub use options::{DecodeOptions, SheetSelector, DEFAULT_MAX_CELLS};
pub use xlsx::{SheetInfo, XlsxParser};

use log::debug;
use std::path::Path;

/// Decode an XLSX workbook held in memory.
///
/// Reads the worksheet chosen by `options.sheet` and returns its cells as
/// a matrix. Decoding the same bytes with the same options always yields
/// the same matrix.
///
/// # Example
///
/// ```no_run
/// use rawsheet::{decode, DecodeOptions};
///
/// let data = std::fs::read("data.xlsx")?;
/// let matrix = decode(&data, &DecodeOptions::new().with_sheet_index(2))?;
/// println!("{} x {}", matrix.height(), matrix.width());
/// # Ok::<(), rawsheet::Error>(())
/// ```
pub fn decode(data: &[u8], options: &DecodeOptions) -> Result<Matrix> {
    XlsxParser::from_bytes(data)?.decode(options)
}

/// Read a table from bytes, dispatching on the detected format.
pub fn read_table(data: &[u8], options: &DecodeOptions) -> Result<Matrix> {
    let format = detect_format_from_bytes(data)?;
    debug!("detected {}", format);

    match format {
        FormatType::Xlsx => decode(data, options),
        FormatType::Delimited => read_delimited(data, options),
    }
}

/// Read a table from a file, dispatching on the detected format.
///
/// # Example
///
/// ```no_run
/// use rawsheet::{decode_file, DecodeOptions};
///
/// let matrix = decode_file("measurements.csv", &DecodeOptions::default())?;
/// # Ok::<(), rawsheet::Error>(())
/// ```
pub fn decode_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Matrix> {
    let data = std::fs::read(path.as_ref())?;
    read_table(&data, options)
}

/// Read a table from a file without blocking the async runtime on I/O.
///
/// Only the file read is asynchronous; decoding runs on the calling task.
#[cfg(feature = "async")]
pub async fn decode_file_async(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Matrix> {
    let data = tokio::fs::read(path.as_ref()).await?;
    read_table(&data, options)
}

/// List the worksheets of an XLSX workbook without decoding any cells.
pub fn list_sheets(data: &[u8]) -> Result<Vec<SheetInfo>> {
    XlsxParser::from_bytes(data)?.sheets()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table_text() {
        let matrix = read_table(b"a\tb\n1\t2\n", &DecodeOptions::default()).unwrap();
        assert_eq!(matrix.rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_decode_rejects_text() {
        let result = decode(b"a,b\n", &DecodeOptions::default());
        assert!(matches!(result, Err(Error::NotAZipContainer)));
    }

    #[test]
    fn test_decode_file_missing() {
        let result = decode_file("does-not-exist.xlsx", &DecodeOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
