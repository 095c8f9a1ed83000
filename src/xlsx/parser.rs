//! XLSX parser implementation.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::{Matrix, SheetCells};
use crate::options::{DecodeOptions, SheetSelector};
use log::debug;

use super::shared_strings::SharedStrings;
use super::sheet::parse_sheet;
use super::workbook::{
    parse_workbook, parse_workbook_rels, resolve_target, worksheet_number, SheetInfo,
};

const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";
const WORKBOOK_PATH: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";

/// Parser for XLSX (Excel) workbooks held in memory.
///
/// Entries are borrowed from the input buffer; only the shared string
/// table and the selected worksheet are decompressed.
pub struct XlsxParser<'a> {
    container: OoxmlContainer<'a>,
}

impl<'a> XlsxParser<'a> {
    /// Create a parser from bytes.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Ok(Self { container })
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer<'a> {
        &self.container
    }

    /// Worksheet entries in numeric order (`sheet2.xml` before `sheet10.xml`).
    pub fn worksheet_paths(&self) -> Vec<String> {
        let mut numbered: Vec<(u32, String)> = self
            .container
            .list_files_with_prefix("xl/worksheets/")
            .into_iter()
            .filter_map(|path| worksheet_number(&path).map(|n| (n, path)))
            .collect();
        numbered.sort();
        numbered.into_iter().map(|(_, path)| path).collect()
    }

    /// List the worksheets of the workbook.
    ///
    /// Names and order come from `xl/workbook.xml` and its relationships.
    /// When the workbook part is missing or lists nothing, the worksheet
    /// entries themselves are listed, named after their file stem.
    pub fn sheets(&self) -> Result<Vec<SheetInfo>> {
        let listed = if self.container.exists(WORKBOOK_PATH) {
            parse_workbook(&self.container.read_xml(WORKBOOK_PATH)?)
        } else {
            Vec::new()
        };

        if listed.is_empty() {
            return Ok(self
                .worksheet_paths()
                .into_iter()
                .enumerate()
                .map(|(idx, path)| SheetInfo {
                    name: sheet_stem(&path).to_string(),
                    position: idx + 1,
                    path,
                })
                .collect());
        }

        let rels = if self.container.exists(WORKBOOK_RELS_PATH) {
            parse_workbook_rels(&self.container.read_xml(WORKBOOK_RELS_PATH)?)
        } else {
            Default::default()
        };

        let sheets = listed
            .into_iter()
            .enumerate()
            .map(|(idx, sheet)| {
                let path = sheet
                    .rel_id
                    .as_ref()
                    .and_then(|id| rels.get(id))
                    .map(|target| resolve_target(target))
                    // Without relationships, assume the conventional numbering
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", idx + 1));
                SheetInfo {
                    name: sheet.name,
                    position: idx + 1,
                    path,
                }
            })
            .collect();
        Ok(sheets)
    }

    /// Resolve a selector to the entry path of a worksheet part.
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String> {
        let path = match selector {
            SheetSelector::First => self
                .worksheet_paths()
                .into_iter()
                .next()
                .ok_or_else(|| Error::MissingRequiredEntry("xl/worksheets/sheet1.xml".into()))?,
            SheetSelector::Index(n) => format!("xl/worksheets/sheet{}.xml", n),
            SheetSelector::Name(name) => self
                .sheets()?
                .into_iter()
                .find(|s| &s.name == name)
                .map(|s| s.path)
                .ok_or_else(|| Error::MissingRequiredEntry(format!("worksheet '{}'", name)))?,
        };

        if !self.container.exists(&path) {
            return Err(Error::MissingRequiredEntry(path));
        }
        debug!("selected {} as {}", selector, path);
        Ok(path)
    }

    /// Parse the shared string table; empty when the workbook has none.
    pub fn shared_strings(&self) -> Result<SharedStrings> {
        if !self.container.exists(SHARED_STRINGS_PATH) {
            debug!("no shared string table");
            return Ok(SharedStrings::default());
        }
        let xml = self.container.read_xml(SHARED_STRINGS_PATH)?;
        let strings = SharedStrings::parse(&xml);
        debug!("{} shared strings", strings.len());
        Ok(strings)
    }

    /// Collect the cells of the selected worksheet.
    pub fn read_cells(&self, selector: &SheetSelector) -> Result<SheetCells> {
        let path = self.select_sheet(selector)?;
        let shared_strings = self.shared_strings()?;
        let xml = self.container.read_xml(&path)?;

        let cells = parse_sheet(&xml, &shared_strings);
        debug!(
            "{}: {} cells, {} rows x {} columns",
            path,
            cells.len(),
            cells.max_row(),
            cells.max_col()
        );
        Ok(cells)
    }

    /// Decode the selected worksheet into a matrix.
    pub fn decode(&self, options: &DecodeOptions) -> Result<Matrix> {
        let mut matrix = self.read_cells(&options.sheet)?.into_matrix(options.max_cells)?;

        if options.cleans_cells() {
            matrix.map_cells(|cell| options.clean_cell(cell));
        }
        if options.transpose {
            matrix = matrix.transpose();
        }
        Ok(matrix)
    }
}

fn sheet_stem(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .and_then(|file| file.strip_suffix(".xml"))
        .unwrap_or(path)
}
