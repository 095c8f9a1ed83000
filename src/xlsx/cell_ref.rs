//! A1-style cell reference resolution.

/// Last row of an Excel worksheet.
pub const MAX_ROWS: u32 = 1_048_576;

/// Last column of an Excel worksheet (XFD).
pub const MAX_COLUMNS: u32 = 16_384;

/// Resolve a reference such as `"AB12"` into 1-based `(row, column)`.
///
/// Letters are case-insensitive. Returns `None` for anything that is not a
/// letter run followed by a digit run, for row 0, and for positions outside
/// the worksheet grid.
///
/// # Example
///
/// ```
/// use rawsheet::xlsx::parse_cell_ref;
///
/// assert_eq!(parse_cell_ref("A1"), Some((1, 1)));
/// assert_eq!(parse_cell_ref("AB12"), Some((12, 28)));
/// assert_eq!(parse_cell_ref("12"), None);
/// ```
pub fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(split);

    let column = column_index(letters)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 || row > MAX_ROWS {
        return None;
    }

    Some((row, column))
}

/// Convert column letters to a 1-based index (`A` = 1, `Z` = 26, `AA` = 27).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut column: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(b.to_ascii_uppercase() - b'A' + 1);
        column = column.checked_mul(26)?.checked_add(digit)?;
        if column > MAX_COLUMNS {
            return None;
        }
    }
    Some(column)
}

/// Column letters for a 1-based index (`1` = `A`, `28` = `AB`).
pub fn column_name(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}
