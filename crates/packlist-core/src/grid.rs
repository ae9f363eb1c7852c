//! Grid types for one worksheet of a packing list
//!
//! A [`Grid`] is fully materialised before any locator runs. Readers build it
//! through [`CellValue::text`] or [`CellValue::parse`], so placeholder strings
//! such as `nan` never reach the extraction code as text.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Text values that spreadsheet exports use for a blank cell
const BLANK_SENTINELS: &[&str] = &["nan", "NaN"];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Empty/null cell
    Empty,
    /// Text value, trimmed and never blank
    Text(String),
    /// Numeric value
    Number(f64),
}

impl CellValue {
    /// Build a text cell, folding blank and placeholder strings into `Empty`
    pub fn text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || BLANK_SENTINELS.contains(&trimmed) {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// Parse a raw string into a CellValue, detecting numbers
    pub fn parse(s: &str) -> Self {
        match CellValue::text(s) {
            CellValue::Text(t) => match t.parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                _ => CellValue::Text(t),
            },
            other => other,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Permissive numeric coercion shared by size and quantity parsing.
    ///
    /// Number cells pass through; text cells are accepted when their trimmed
    /// content parses as a finite decimal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// The cell rendered as a label, or `None` when it holds nothing
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(_) => Some(self.to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Read-only 2-D array of cells, row-major and 0-indexed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Build a grid from rows of cells; short rows read as empty past their end
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        CellValue::Text(s) => CellValue::text(&s),
                        other => other,
                    })
                    .collect()
            })
            .collect();
        Self { rows, width }
    }

    /// Build a grid from raw strings, detecting numbers (handy in tests)
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| CellValue::parse(s.as_ref())).collect())
                .collect(),
        )
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (length of the widest row)
    pub fn column_count(&self) -> usize {
        self.width
    }

    /// Declared shape as (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Get a cell; anything outside the grid reads as `Empty`
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// One named worksheet
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name as it appears in the workbook
    pub name: String,
    /// Materialised cell grid
    pub grid: Grid,
}

impl Sheet {
    /// Create a new sheet
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }
}

/// An ordered list of sheets read from one file
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Source file path, if the workbook came from disk
    pub source_path: Option<PathBuf>,
    /// Sheets in workbook order
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook from sheets held in memory
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self {
            source_path: None,
            sheets,
        }
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// File name of the source, if known
    pub fn file_name(&self) -> Option<String> {
        self.source_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse_number() {
        assert_eq!(CellValue::parse("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::parse(" 120.0 "), CellValue::Number(120.0));
        assert_eq!(CellValue::parse("-2.5"), CellValue::Number(-2.5));
    }

    #[test]
    fn test_cell_value_parse_text() {
        assert_eq!(CellValue::parse(" 핑크 "), CellValue::Text("핑크".to_string()));
        assert_eq!(CellValue::parse("FREE"), CellValue::Text("FREE".to_string()));
    }

    #[test]
    fn test_blank_sentinels_become_empty() {
        assert_eq!(CellValue::text(""), CellValue::Empty);
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert_eq!(CellValue::text("nan"), CellValue::Empty);
        assert_eq!(CellValue::text("NaN"), CellValue::Empty);
        // only the exact spellings are placeholders
        assert_eq!(CellValue::text("NAN"), CellValue::Text("NAN".to_string()));
    }

    #[test]
    fn test_grid_normalises_raw_text_cells() {
        let grid = Grid::new(vec![vec![CellValue::Text("nan".to_string())]]);
        assert!(grid.get(0, 0).is_empty());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Number(12.0).as_number(), Some(12.0));
        assert_eq!(CellValue::Text("5".to_string()).as_number(), Some(5.0));
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::Text("inf".to_string()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_as_label() {
        assert_eq!(CellValue::Number(1234.0).as_label(), Some("1234".to_string()));
        assert_eq!(CellValue::Number(12.5).as_label(), Some("12.5".to_string()));
        assert_eq!(CellValue::Text("루비하트".to_string()).as_label(), Some("루비하트".to_string()));
        assert_eq!(CellValue::Empty.as_label(), None);
    }

    #[test]
    fn test_grid_out_of_bounds_is_empty() {
        let grid = Grid::from_strings([vec!["a", "b"], vec!["c"]]);
        assert_eq!(grid.shape(), (2, 2));
        assert!(grid.get(1, 1).is_empty());
        assert!(grid.get(10, 10).is_empty());
    }
}
