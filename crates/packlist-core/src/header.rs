//! Locating the size-label header row

use crate::config::{ScanWindow, HEADER_SCAN_ROWS, MIN_SIZE_TOKENS, SIZE_COLUMNS};
use crate::grid::Grid;
use crate::size::Size;
use serde::{Deserialize, Serialize};

/// One size column of the detected header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeColumn {
    /// Column index in the grid (0-based)
    pub column: usize,
    /// Size label found in that column
    pub size: Size,
}

/// Column index -> size mapping in column order.
///
/// A size is mapped at most once; when the header repeats a label the first
/// column keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeColumnMap {
    columns: Vec<SizeColumn>,
}

impl SizeColumnMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column unless its size is already mapped.
    ///
    /// Returns `false` when the size was a duplicate.
    pub fn insert(&mut self, column: usize, size: Size) -> bool {
        if self.contains_size(&size) {
            return false;
        }
        self.columns.push(SizeColumn { column, size });
        true
    }

    /// Whether a size is already mapped
    pub fn contains_size(&self, size: &Size) -> bool {
        self.columns.iter().any(|c| c.size == *size)
    }

    /// Iterate over (column, size) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Size)> + '_ {
        self.columns.iter().map(|c| (c.column, c.size))
    }

    /// Sizes in column order
    pub fn sizes(&self) -> Vec<Size> {
        self.columns.iter().map(|c| c.size).collect()
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column is mapped
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(usize, Size)> for SizeColumnMap {
    fn from_iter<I: IntoIterator<Item = (usize, Size)>>(iter: I) -> Self {
        let mut map = SizeColumnMap::new();
        for (column, size) in iter {
            map.insert(column, size);
        }
        map
    }
}

/// The accepted header row and its size columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeHeader {
    /// Row index of the header (0-based)
    pub row: usize,
    /// Size columns found on that row
    pub columns: SizeColumnMap,
}

/// Finds the first row in a scan window that is dominated by size tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLocator {
    /// Region searched for the header
    pub window: ScanWindow,
    /// A row is a header when it has strictly more size tokens than this
    pub min_tokens: usize,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self {
            window: ScanWindow::new(HEADER_SCAN_ROWS, SIZE_COLUMNS),
            min_tokens: MIN_SIZE_TOKENS,
        }
    }
}

impl HeaderLocator {
    /// Create a locator with an explicit window and threshold
    pub fn new(window: ScanWindow, min_tokens: usize) -> Self {
        Self { window, min_tokens }
    }

    /// Acceptance predicate for one row
    pub fn accepts(&self, token_count: usize) -> bool {
        token_count > self.min_tokens
    }

    /// Scan the window top to bottom and return the first qualifying row.
    ///
    /// Later rows are never considered once one qualifies, even if they hold
    /// more size tokens.
    pub fn locate(&self, grid: &Grid) -> Option<SizeHeader> {
        let columns = self.window.column_range(grid.column_count());

        for row in self.window.row_range(grid.row_count()) {
            let tokens: Vec<(usize, Size)> = columns
                .clone()
                .filter_map(|col| Size::classify(grid.get(row, col)).map(|size| (col, size)))
                .collect();

            tracing::debug!(row, tokens = tokens.len(), "size tokens in header candidate");

            if self.accepts(tokens.len()) {
                return Some(SizeHeader {
                    row,
                    columns: tokens.into_iter().collect(),
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    /// Grid with `rows` rows and a header-like row of `labels` starting at `start_col`
    fn grid_with_row(rows: usize, header_row: usize, start_col: usize, labels: &[&str]) -> Grid {
        let mut cells = vec![vec![CellValue::Empty; 30]; rows];
        for (i, label) in labels.iter().enumerate() {
            cells[header_row][start_col + i] = CellValue::parse(label);
        }
        Grid::new(cells)
    }

    #[test]
    fn test_locate_header_scenario() {
        let grid = grid_with_row(
            4,
            1,
            14,
            &["120", "130", "140", "150", "160", "L", "FREE"],
        );
        let header = HeaderLocator::default().locate(&grid).unwrap();

        assert_eq!(header.row, 1);
        let pairs: Vec<(usize, String)> =
            header.columns.iter().map(|(c, s)| (c, s.to_string())).collect();
        assert_eq!(
            pairs,
            vec![
                (14, "120".to_string()),
                (15, "130".to_string()),
                (16, "140".to_string()),
                (17, "150".to_string()),
                (18, "160".to_string()),
                (19, "L".to_string()),
                (20, "FREE".to_string()),
            ]
        );
    }

    #[test]
    fn test_exactly_threshold_is_not_enough() {
        let grid = grid_with_row(3, 0, 14, &["120", "130", "140", "150", "160"]);
        assert!(HeaderLocator::default().locate(&grid).is_none());
    }

    #[test]
    fn test_first_qualifying_row_wins() {
        let mut cells = vec![vec![CellValue::Empty; 30]; 5];
        for (i, label) in ["120", "130", "140", "150", "160", "170"].iter().enumerate() {
            cells[2][14 + i] = CellValue::parse(label);
        }
        for (i, label) in ["S", "M", "L", "XL", "XXL", "XS", "FREE", "200"].iter().enumerate() {
            cells[3][14 + i] = CellValue::parse(label);
        }
        let header = HeaderLocator::default().locate(&Grid::new(cells)).unwrap();
        assert_eq!(header.row, 2);
        assert_eq!(header.columns.len(), 6);
    }

    #[test]
    fn test_rows_outside_window_are_ignored() {
        let grid = grid_with_row(10, 5, 14, &["120", "130", "140", "150", "160", "170"]);
        assert!(HeaderLocator::default().locate(&grid).is_none());
    }

    #[test]
    fn test_columns_outside_window_are_ignored() {
        let grid = grid_with_row(3, 0, 2, &["120", "130", "140", "150", "160", "170"]);
        assert!(HeaderLocator::default().locate(&grid).is_none());
    }

    #[test]
    fn test_duplicate_sizes_keep_first_column() {
        let grid = grid_with_row(
            2,
            0,
            14,
            &["120", "130", "140", "120", "150", "160"],
        );
        let header = HeaderLocator::default().locate(&grid).unwrap();
        assert_eq!(header.columns.len(), 5);
        assert_eq!(header.columns.iter().next(), Some((14, Size::Numeric(120))));
        assert!(header.columns.iter().all(|(c, _)| c != 17));
    }

    #[test]
    fn test_narrow_grid() {
        let grid = Grid::from_strings([vec!["품명", "칼라"], vec!["a", "b"]]);
        assert!(HeaderLocator::default().locate(&grid).is_none());
    }

    #[test]
    fn test_custom_window() {
        let grid = grid_with_row(3, 0, 0, &["S", "M", "L"]);
        let locator = HeaderLocator::new(ScanWindow::new(2, 0..5), 2);
        let header = locator.locate(&grid).unwrap();
        assert_eq!(header.columns.sizes(), vec![Size::Word("S"), Size::Word("M"), Size::Word("L")]);
    }
}
