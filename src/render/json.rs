//! JSON renderer implementation.

use crate::error::Result;
use crate::model::Matrix;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a matrix to JSON.
pub fn to_json(matrix: &Matrix, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(matrix)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(matrix)?,
    };
    Ok(json)
}

/// Convert a matrix to JSON with default formatting.
pub fn to_json_default(matrix: &Matrix) -> Result<String> {
    to_json(matrix, JsonFormat::Pretty)
}
