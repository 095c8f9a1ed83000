//! Cell containers shared by the spreadsheet and delimited-text readers.
//!
//! Worksheet scanning fills a sparse [`SheetCells`] map, which is then
//! turned into a dense [`Matrix`] for the caller.

mod cells;
mod matrix;

pub use cells::SheetCells;
pub use matrix::Matrix;
