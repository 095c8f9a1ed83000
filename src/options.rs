//! Decoding options configuration.

use unicode_normalization::UnicodeNormalization;

/// Which worksheet of a workbook to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelector {
    /// Lowest-numbered `xl/worksheets/sheetN.xml`
    #[default]
    First,
    /// `xl/worksheets/sheet{n}.xml` (1-based)
    Index(u32),
    /// Sheet whose workbook name matches exactly
    Name(String),
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::First => write!(f, "first sheet"),
            SheetSelector::Index(n) => write!(f, "sheet {}", n),
            SheetSelector::Name(name) => write!(f, "sheet '{}'", name),
        }
    }
}

/// Default cap on `rows x columns` of a decoded worksheet.
pub const DEFAULT_MAX_CELLS: usize = 1 << 24;

/// Options for decoding a table.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Worksheet to read from a workbook
    pub sheet: SheetSelector,

    /// Field delimiter for text input (None = detect)
    pub delimiter: Option<u8>,

    /// Strip surrounding whitespace from workbook cells
    pub trim_cells: bool,

    /// Normalize cell text to Unicode NFC
    pub normalize_unicode: bool,

    /// Swap rows and columns of the result
    pub transpose: bool,

    /// Largest `rows x columns` grid a worksheet may expand to
    pub max_cells: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            sheet: SheetSelector::First,
            delimiter: None,
            trim_cells: false,
            normalize_unicode: false,
            transpose: false,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl DecodeOptions {
    /// Create new decode options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the worksheet to decode.
    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    /// Select a worksheet by its 1-based number.
    pub fn with_sheet_index(self, index: u32) -> Self {
        self.with_sheet(SheetSelector::Index(index))
    }

    /// Select a worksheet by name.
    pub fn with_sheet_name(self, name: impl Into<String>) -> Self {
        self.with_sheet(SheetSelector::Name(name.into()))
    }

    /// Use a fixed delimiter instead of detecting one.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Trim workbook cell values.
    pub fn with_trim_cells(mut self, trim: bool) -> Self {
        self.trim_cells = trim;
        self
    }

    /// Normalize cell text to NFC.
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Transpose the result.
    pub fn with_transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    /// Limit the size of the matrix a worksheet may expand to.
    ///
    /// A single cell at `XFD1048576` spans the whole grid, so the bound is
    /// on the materialized area, not on the number of stored cells.
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Apply the per-cell text options to one value.
    pub(crate) fn clean_cell(&self, value: &str) -> String {
        let value = if self.trim_cells { value.trim() } else { value };
        if self.normalize_unicode {
            value.nfc().collect()
        } else {
            value.to_string()
        }
    }

    /// Whether any per-cell text option is enabled.
    pub(crate) fn cleans_cells(&self) -> bool {
        self.trim_cells || self.normalize_unicode
    }
}
