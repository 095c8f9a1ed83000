//! Plain text renderer implementation.

use crate::error::Result;
use crate::model::Matrix;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::options::RenderOptions;

/// Convert a matrix to a bordered plain-text table.
///
/// Column widths are measured in terminal columns, so wide CJK characters
/// and combining marks line up. With `header_row` the first row is
/// separated from the rest by a `=` rule.
pub fn to_text(matrix: &Matrix, options: &RenderOptions) -> Result<String> {
    let col_count = matrix.width();
    if col_count == 0 {
        return Ok(String::new());
    }

    let cells: Vec<Vec<String>> = matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| fit_cell(cell, options.max_column_width))
                .collect()
        })
        .collect();

    // Minimum width of 3 for readability
    let mut widths = vec![3usize; col_count];
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut output = String::new();
    push_rule(&mut output, &widths, '-');

    for (row_idx, row) in cells.iter().enumerate() {
        output.push('|');
        for (cell, &width) in row.iter().zip(&widths) {
            output.push(' ');
            output.push_str(cell);
            output.push_str(&" ".repeat(width - cell.width()));
            output.push_str(" |");
        }
        output.push('\n');

        // Separator after header row
        if row_idx == 0 && options.header_row && cells.len() > 1 {
            push_rule(&mut output, &widths, '=');
        }
    }

    push_rule(&mut output, &widths, '-');
    Ok(output)
}

fn push_rule(output: &mut String, widths: &[usize], fill: char) {
    output.push('+');
    for &w in widths {
        output.extend(std::iter::repeat(fill).take(w + 2));
        output.push('+');
    }
    output.push('\n');
}

/// Flatten line breaks and truncate to `max` columns with a trailing `~`.
fn fit_cell(cell: &str, max: Option<usize>) -> String {
    let flat = cell.replace("\r\n", " ").replace(['\n', '\r'], " ");
    let Some(max) = max else {
        return flat;
    };
    if flat.width() <= max {
        return flat;
    }

    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('~');
    out
}
