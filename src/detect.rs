//! Input format detection.
//!
//! A buffer is either an Office Open XML spreadsheet (a ZIP container with
//! an `xl/` tree) or delimiter-separated plain text.

use crate::container::{is_zip_file, OoxmlContainer};
use crate::error::{Error, Result};
use log::debug;
use std::path::Path;

/// Content type for XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// How many leading bytes are inspected when deciding whether input is text.
const TEXT_SNIFF_LEN: usize = 8192;

/// Detected input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
    /// Delimiter-separated text (.csv, .tsv, .txt)
    Delimited,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Delimited => "csv",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Delimited => "Delimited Text",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
///
/// # Example
///
/// ```no_run
/// use rawsheet::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("data.xlsx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), rawsheet::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let data = std::fs::read(path.as_ref())?;
    detect_format_from_bytes(&data)
}

/// Detect the format type from a byte slice.
///
/// ZIP containers are accepted as spreadsheets when `[Content_Types].xml`
/// declares a workbook or, failing that, when entries live under `xl/`.
/// Anything else without NUL bytes near the start is treated as text.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if is_zip_file(data) {
        let container = OoxmlContainer::from_bytes(data)?;

        if let Ok(content_types) = container.read_xml("[Content_Types].xml") {
            if content_types.contains(XLSX_CONTENT_TYPE) {
                return Ok(FormatType::Xlsx);
            }
        }

        // Fallback: check for the spreadsheet folder
        if !container.list_files_with_prefix("xl/").is_empty() {
            debug!("no workbook content type, detected spreadsheet by xl/ entries");
            return Ok(FormatType::Xlsx);
        }
        return Err(Error::UnknownFormat);
    }

    if looks_like_text(data) {
        Ok(FormatType::Delimited)
    } else {
        Err(Error::UnknownFormat)
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    let head = &data[..data.len().min(TEXT_SNIFF_LEN)];
    !head.is_empty() && !head.contains(&0)
}
