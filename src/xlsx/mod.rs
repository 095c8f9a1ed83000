//! XLSX (Excel) spreadsheet decoding.
//!
//! Only two parts are read to produce cell values: the shared string table
//! and one worksheet. Both are scanned as text rather than parsed as XML.
//!
//! # Example
//!
//! ```no_run
//! use rawsheet::xlsx::XlsxParser;
//! use rawsheet::DecodeOptions;
//!
//! let data = std::fs::read("spreadsheet.xlsx")?;
//! let parser = XlsxParser::from_bytes(&data)?;
//!
//! for sheet in parser.sheets()? {
//!     println!("{}: {}", sheet.position, sheet.name);
//! }
//!
//! let matrix = parser.decode(&DecodeOptions::default())?;
//! println!("{} rows", matrix.height());
//! # Ok::<(), rawsheet::Error>(())
//! ```

mod cell_ref;
mod parser;
mod scan;
mod shared_strings;
mod sheet;
mod workbook;

pub use cell_ref::{column_index, column_name, parse_cell_ref, MAX_COLUMNS, MAX_ROWS};
pub use parser::XlsxParser;
pub use shared_strings::SharedStrings;
pub use sheet::parse_sheet;
pub use workbook::SheetInfo;
