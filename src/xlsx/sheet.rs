//! Worksheet cell extraction.

use super::cell_ref::{parse_cell_ref, MAX_COLUMNS, MAX_ROWS};
use super::scan::{element_text, find_close_tag, find_start_tag, next_start_tag, Tag};
use super::shared_strings::{text_runs, SharedStrings};
use crate::model::SheetCells;
use log::trace;

/// Scan a worksheet part and collect its cell values.
///
/// Each `<c>` element contributes at most one value. Cells with a
/// malformed reference, an unterminated body, or no value are skipped
/// rather than failing the whole sheet.
pub fn parse_sheet(xml: &str, shared_strings: &SharedStrings) -> SheetCells {
    let mut cells = SheetCells::new();
    let mut cursor = RowCursor::default();
    let mut pos = 0;

    while let Some(tag) = next_start_tag(xml, pos) {
        pos = tag.end;
        match tag.name {
            "row" => cursor.enter_row(&tag),
            "c" => {
                let Some((row, col)) = cursor.cell_position(&tag) else {
                    continue;
                };
                if tag.self_closing {
                    continue;
                }

                let Some((body_end, after)) = find_close_tag(xml, tag.end, "c") else {
                    trace!("unterminated cell at offset {}", tag.start);
                    break;
                };
                pos = after;

                let body = &xml[tag.end..body_end];
                match cell_value(body, tag.attr("t"), shared_strings) {
                    Some(value) => cells.insert(row, col, value),
                    None => trace!("cell at ({}, {}) has no value", row, col),
                }
            }
            _ => {}
        }
    }

    cells
}

/// Tracks the current `<row>` so cells without `r` can be placed.
#[derive(Debug, Default)]
struct RowCursor {
    /// 0 before the first row
    row: u32,
    next_col: u32,
}

impl RowCursor {
    fn enter_row(&mut self, tag: &Tag<'_>) {
        let explicit = tag.attr("r").and_then(|r| match r.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_ROWS).contains(&n) => Some(n),
            _ => {
                trace!("ignoring malformed row number '{}'", r);
                None
            }
        });
        self.row = explicit.unwrap_or(self.row.saturating_add(1));
        self.next_col = 1;
    }

    fn cell_position(&mut self, tag: &Tag<'_>) -> Option<(u32, u32)> {
        let position = match tag.attr("r") {
            Some(reference) => match parse_cell_ref(reference.trim()) {
                Some(position) => position,
                None => {
                    trace!("skipping cell with malformed reference '{}'", reference);
                    return None;
                }
            },
            None => {
                if self.row == 0 || self.row > MAX_ROWS || self.next_col > MAX_COLUMNS {
                    trace!("skipping cell without reference at offset {}", tag.start);
                    return None;
                }
                (self.row, self.next_col)
            }
        };
        self.next_col = position.1 + 1;
        Some(position)
    }
}

/// Resolve the text of one cell body according to its `t` attribute.
fn cell_value(
    body: &str,
    cell_type: Option<&str>,
    shared_strings: &SharedStrings,
) -> Option<String> {
    if cell_type == Some("inlineStr") {
        if let Some(is) = find_start_tag(body, 0, "is") {
            let inline = if is.self_closing {
                String::new()
            } else {
                let end = find_close_tag(body, is.end, "is")
                    .map_or(body.len(), |(close, _)| close);
                text_runs(&body[is.end..end])
            };
            return Some(inline);
        }
    }

    let v = find_start_tag(body, 0, "v")?;
    let raw = element_text(body, &v)?;

    let value = match cell_type {
        Some("s") => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .unwrap_or(raw)
            .to_string(),
        Some("b") => {
            if raw.trim() == "1" {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        _ => raw.to_string(),
    };
    Some(value)
}
