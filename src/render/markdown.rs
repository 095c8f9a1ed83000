//! Markdown renderer implementation.

use crate::error::Result;
use crate::model::Matrix;
use crate::xlsx::column_name;

use super::options::RenderOptions;

/// Convert a matrix to a Markdown pipe table.
///
/// With `header_row` the first row becomes the table header; otherwise a
/// header of column letters (`A`, `B`, ...) is generated so that every
/// matrix row stays in the body.
pub fn to_markdown(matrix: &Matrix, options: &RenderOptions) -> Result<String> {
    let width = matrix.width();
    if width == 0 {
        return Ok(String::new());
    }

    let mut rows = matrix.rows().iter();
    let letters: Vec<String>;
    let header: Vec<&str> = if options.header_row {
        match rows.next() {
            Some(first) => first.iter().map(String::as_str).collect(),
            None => return Ok(String::new()),
        }
    } else {
        letters = (1..=width as u32).map(column_name).collect();
        letters.iter().map(String::as_str).collect()
    };

    let mut output = String::new();
    push_row(&mut output, header);

    output.push('|');
    for _ in 0..width {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in rows {
        push_row(&mut output, row.iter().map(String::as_str));
    }
    Ok(output)
}

fn push_row<'a>(output: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    output.push('|');
    for cell in cells {
        output.push(' ');
        output.push_str(&escape_cell(cell));
        output.push_str(" |");
    }
    output.push('\n');
}

/// Escape characters that would break a table cell.
fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\r' => {}
            '\n' => escaped.push_str("<br>"),
            _ => escaped.push(c),
        }
    }
    escaped
}
