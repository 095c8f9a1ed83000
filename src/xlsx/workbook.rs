//! Workbook directory: sheet names and the parts they live in.

use super::scan::find_start_tag;
use serde::Serialize;
use std::collections::HashMap;

/// A worksheet listed by the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    /// Display name
    pub name: String,
    /// 1-based position in workbook order
    pub position: usize,
    /// Entry path of the worksheet part, e.g. `xl/worksheets/sheet1.xml`
    pub path: String,
}

/// `<sheet>` element of `xl/workbook.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WorkbookSheet {
    pub name: String,
    pub rel_id: Option<String>,
}

/// Parse the `<sheet name=".." r:id="..">` list of a workbook part.
pub(crate) fn parse_workbook(xml: &str) -> Vec<WorkbookSheet> {
    let mut sheets = Vec::new();
    let mut pos = 0;

    while let Some(tag) = find_start_tag(xml, pos, "sheet") {
        pos = tag.end;
        let Some(name) = tag.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        sheets.push(WorkbookSheet {
            name: name.to_string(),
            rel_id: tag.attr("r:id").map(str::to_string),
        });
    }
    sheets
}

/// Parse workbook relationships into an `Id -> Target` map.
pub(crate) fn parse_workbook_rels(xml: &str) -> HashMap<String, String> {
    let mut rels = HashMap::new();
    let mut pos = 0;

    while let Some(tag) = find_start_tag(xml, pos, "Relationship") {
        pos = tag.end;
        if let (Some(id), Some(target)) = (tag.attr("Id"), tag.attr("Target")) {
            if !id.is_empty() && !target.is_empty() {
                rels.insert(id.to_string(), target.to_string());
            }
        }
    }
    rels
}

/// Entry path for a relationship target relative to `xl/`.
pub(crate) fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

/// Sheet number of an `xl/worksheets/sheetN.xml` entry.
pub(crate) fn worksheet_number(path: &str) -> Option<u32> {
    path.strip_prefix("xl/worksheets/sheet")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}
