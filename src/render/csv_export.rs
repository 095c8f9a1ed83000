//! CSV renderer implementation.

use crate::error::{Error, Result};
use crate::model::Matrix;

use super::options::RenderOptions;

/// Convert a matrix to CSV text.
///
/// Every field is quoted and embedded quotes are doubled, so the output
/// survives values that contain delimiters or line breaks.
pub fn to_csv(matrix: &Matrix, options: &RenderOptions) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.csv_delimiter)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in matrix.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV output is not UTF-8: {}", e)))
}
