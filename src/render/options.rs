//! Rendering options configuration.

use super::json::JsonFormat;

/// Output format for a rendered matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values, every field quoted
    #[default]
    Csv,
    /// JSON object with a `rows` array
    Json,
    /// Markdown pipe table
    Markdown,
    /// Plain text table with aligned columns
    Text,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
        }
    }
}

/// Options for rendering matrices.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Treat the first row as a header (Markdown and text output)
    pub header_row: bool,

    /// Field delimiter for CSV output
    pub csv_delimiter: u8,

    /// JSON layout
    pub json_format: JsonFormat,

    /// Truncate text cells wider than this many columns
    pub max_column_width: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            header_row: true,
            csv_delimiter: b',',
            json_format: JsonFormat::Pretty,
            max_column_width: None,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the first row is a header.
    pub fn with_header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }

    /// Set the CSV field delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Limit text column width; values below 3 are raised to 3.
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = Some(width.max(3));
        self
    }
}
