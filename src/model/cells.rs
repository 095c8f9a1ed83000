//! Sparse cell map collected while scanning a worksheet.

use super::matrix::Matrix;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Cell values keyed by 1-based row, then 1-based column.
///
/// Built incrementally from the cells that actually occur; the declared
/// sheet dimension is never used to size it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetCells {
    rows: BTreeMap<u32, BTreeMap<u32, String>>,
}

impl SheetCells {
    /// Create an empty cell map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value. A later value for the same position replaces the
    /// earlier one; row or column 0 is not a position and is ignored.
    pub fn insert(&mut self, row: u32, col: u32, value: String) {
        if row == 0 || col == 0 {
            return;
        }
        self.rows.entry(row).or_default().insert(col, value);
    }

    /// Value at 1-based `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        self.rows.get(&row)?.get(&col).map(String::as_str)
    }

    /// Number of recorded cells.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if no cell was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest row that holds a value, 0 when empty.
    pub fn max_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest column that holds a value in any row, 0 when empty.
    pub fn max_col(&self) -> u32 {
        self.rows
            .values()
            .filter_map(|cols| cols.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    /// Materialize rows `1..=max_row` and columns `1..=max_col`.
    ///
    /// Gaps become empty strings, including rows with no cells at all.
    /// Fails with [`Error::TooManyCells`] before allocating when the grid
    /// would exceed `max_cells`.
    pub fn into_matrix(self, max_cells: usize) -> Result<Matrix> {
        let (max_row, max_col) = (self.max_row(), self.max_col());
        if u64::from(max_row) * u64::from(max_col) > max_cells as u64 {
            return Err(Error::TooManyCells {
                rows: max_row,
                columns: max_col,
                limit: max_cells,
            });
        }
        let width = max_col as usize;
        let height = max_row as usize;

        let mut rows = vec![vec![String::new(); width]; height];
        for (row, cols) in self.rows {
            let target = &mut rows[row as usize - 1];
            for (col, value) in cols {
                target[col as usize - 1] = value;
            }
        }
        Ok(Matrix { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_matrix_fills_gaps() {
        let mut cells = SheetCells::new();
        cells.insert(2, 2, "hi".to_string());
        cells.insert(4, 1, "x".to_string());

        assert_eq!(cells.len(), 2);
        assert_eq!(cells.max_row(), 4);
        assert_eq!(cells.max_col(), 2);

        let m = cells.into_matrix(16).unwrap();
        assert_eq!(m.height(), 4);
        assert_eq!(m.rows[0], vec!["", ""]);
        assert_eq!(m.rows[1], vec!["", "hi"]);
        assert_eq!(m.rows[2], vec!["", ""]);
        assert_eq!(m.rows[3], vec!["x", ""]);
    }

    #[test]
    fn test_empty_cells_make_empty_matrix() {
        let cells = SheetCells::new();
        assert!(cells.is_empty());
        assert!(cells.into_matrix(0).unwrap().is_empty());
    }

    #[test]
    fn test_grid_over_limit_is_rejected() {
        let mut cells = SheetCells::new();
        cells.insert(1_048_576, 16_384, "x".to_string());

        let err = cells.clone().into_matrix(1 << 24).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyCells {
                rows: 1_048_576,
                columns: 16_384,
                ..
            }
        ));

        let mut small = SheetCells::new();
        small.insert(2, 3, "y".to_string());
        assert!(small.clone().into_matrix(5).is_err());
        assert_eq!(small.into_matrix(6).unwrap().height(), 2);
    }

    #[test]
    fn test_last_value_wins() {
        let mut cells = SheetCells::new();
        cells.insert(1, 1, "old".to_string());
        cells.insert(1, 1, "new".to_string());
        assert_eq!(cells.get(1, 1), Some("new"));
        assert_eq!(cells.len(), 1);
    }
}
