//! Output rendering for decoded matrices.
//!
//! This module provides renderers for converting a [`Matrix`] to CSV,
//! JSON, Markdown and plain text.
//!
//! # Example
//!
//! ```no_run
//! use rawsheet::{decode_file, render::*, DecodeOptions};
//!
//! let matrix = decode_file("data.xlsx", &DecodeOptions::default())?;
//!
//! // Render to CSV
//! let csv = to_csv(&matrix, &RenderOptions::default())?;
//!
//! // Render to Markdown
//! let md = to_markdown(&matrix, &RenderOptions::default())?;
//!
//! // Render to JSON
//! let json = to_json(&matrix, JsonFormat::Pretty)?;
//! # Ok::<(), rawsheet::Error>(())
//! ```

mod csv_export;
mod json;
mod markdown;
mod options;
mod text;

pub use csv_export::to_csv;
pub use json::{to_json, to_json_default, JsonFormat};
pub use markdown::to_markdown;
pub use options::{OutputFormat, RenderOptions};
pub use text::to_text;

use crate::error::Result;
use crate::model::Matrix;

/// Render a matrix in the given format.
pub fn render(matrix: &Matrix, format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(matrix, options),
        OutputFormat::Json => to_json(matrix, options.json_format),
        OutputFormat::Markdown => to_markdown(matrix, options),
        OutputFormat::Text => to_text(matrix, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dispatch() {
        let matrix = Matrix::from_rows(vec![vec!["a".to_string(), "b".to_string()]]);
        let options = RenderOptions::new().with_json_format(JsonFormat::Compact);

        assert_eq!(
            render(&matrix, OutputFormat::Csv, &options).unwrap(),
            "\"a\",\"b\"\n"
        );
        assert_eq!(
            render(&matrix, OutputFormat::Json, &options).unwrap(),
            r#"{"rows":[["a","b"]]}"#
        );
        assert!(render(&matrix, OutputFormat::Markdown, &options)
            .unwrap()
            .starts_with("| a | b |"));
        assert!(render(&matrix, OutputFormat::Text, &options)
            .unwrap()
            .contains("| a   | b   |"));
    }
}
