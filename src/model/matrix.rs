//! Rectangular string matrix returned to callers.

use serde::{Deserialize, Serialize};

/// A rectangular table of cell values.
///
/// Every row has the same number of columns; missing cells are empty
/// strings. No type inference is applied to the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    /// Rows in sheet order
    pub rows: Vec<Vec<String>>,
}

impl Matrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from ragged rows, padding short rows with `""`.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at 0-based `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Take ownership of the rows.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Swap rows and columns.
    pub fn transpose(self) -> Self {
        let width = self.width();
        let mut columns: Vec<Vec<String>> = (0..width)
            .map(|_| Vec::with_capacity(self.rows.len()))
            .collect();

        for row in self.rows {
            for (col, value) in row.into_iter().enumerate() {
                columns[col].push(value);
            }
        }
        Self { rows: columns }
    }

    /// Apply `f` to every cell in place.
    pub fn map_cells(&mut self, mut f: impl FnMut(&str) -> String) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = f(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_rows_pads() {
        let m = Matrix::from_rows(vec![row(&["a"]), row(&["b", "c", "d"]), vec![]]);
        assert_eq!(m.height(), 3);
        assert_eq!(m.width(), 3);
        assert_eq!(m.rows[0], row(&["a", "", ""]));
        assert_eq!(m.rows[2], row(&["", "", ""]));
        assert_eq!(m.get(1, 2), Some("d"));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_rows(vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
        let t = m.transpose();
        assert_eq!(t.height(), 3);
        assert_eq!(t.width(), 2);
        assert_eq!(t.rows[2], row(&["c", "3"]));
    }

    #[test]
    fn test_empty_matrix() {
        let m = Matrix::new();
        assert!(m.is_empty());
        assert_eq!(m.width(), 0);
        assert!(m.transpose().is_empty());
    }

    #[test]
    fn test_map_cells() {
        let mut m = Matrix::from_rows(vec![row(&[" a ", "b "])]);
        m.map_cells(|s| s.trim().to_string());
        assert_eq!(m.rows[0], row(&["a", "b"]));
    }

    #[test]
    fn test_serde() {
        let m = Matrix::from_rows(vec![row(&["x", "y"])]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"rows":[["x","y"]]}"#);
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
