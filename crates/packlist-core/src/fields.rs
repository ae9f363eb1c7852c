//! Locating the product-name and color columns

use crate::config::{
    ScanWindow, FIELD_COLUMNS, FIXED_COLOR_COLUMN, FIXED_PRODUCT_COLUMN, HEADER_SCAN_ROWS,
};
use crate::grid::{CellValue, Grid};
use serde::{Deserialize, Serialize};

/// Label fragment marking the product-name column ("품명", item name)
pub const PRODUCT_MARKERS: &[&str] = &["품명"];

/// Label fragments marking the color column ("칼라", "색상")
pub const COLOR_MARKERS: &[&str] = &["칼라", "색상"];

/// Resolved field columns; either may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldColumns {
    /// Product-name column
    pub product: Option<usize>,
    /// Color column
    pub color: Option<usize>,
}

/// How the field columns are found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FieldColumnLocator {
    /// Search the window for label cells
    Scan(ScanWindow),
    /// Use columns known in advance for this layout
    Fixed {
        product: usize,
        color: Option<usize>,
    },
}

impl Default for FieldColumnLocator {
    fn default() -> Self {
        FieldColumnLocator::Scan(ScanWindow::new(HEADER_SCAN_ROWS, FIELD_COLUMNS))
    }
}

impl FieldColumnLocator {
    /// The fixed layout used by the known supplier template
    pub fn fixed_default() -> Self {
        FieldColumnLocator::Fixed {
            product: FIXED_PRODUCT_COLUMN,
            color: Some(FIXED_COLOR_COLUMN),
        }
    }

    /// Resolve the field columns for a grid.
    ///
    /// In scan mode the first matching cell in row-then-column order wins for
    /// each field, independently of the other.
    pub fn locate(&self, grid: &Grid) -> FieldColumns {
        let window = match self {
            FieldColumnLocator::Fixed { product, color } => {
                return FieldColumns {
                    product: Some(*product),
                    color: *color,
                };
            }
            FieldColumnLocator::Scan(window) => window,
        };

        let mut found = FieldColumns::default();
        let columns = window.column_range(grid.column_count());

        'rows: for row in window.row_range(grid.row_count()) {
            for col in columns.clone() {
                let CellValue::Text(text) = grid.get(row, col) else {
                    continue;
                };
                if found.product.is_none() && contains_any(text, PRODUCT_MARKERS) {
                    tracing::debug!(row, col, "product-name column found");
                    found.product = Some(col);
                }
                if found.color.is_none() && contains_any(text, COLOR_MARKERS) {
                    tracing::debug!(row, col, "color column found");
                    found.color = Some(col);
                }
                if found.product.is_some() && found.color.is_some() {
                    break 'rows;
                }
            }
        }

        found
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    let text = text.trim();
    markers.iter().any(|m| text.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_labels(labels: &[(usize, usize, &str)]) -> Grid {
        let mut cells = vec![vec![CellValue::Empty; 30]; 6];
        for (row, col, label) in labels {
            cells[*row][*col] = CellValue::parse(label);
        }
        Grid::new(cells)
    }

    #[test]
    fn test_scan_finds_both_columns() {
        let grid = grid_with_labels(&[(0, 11, "품명"), (0, 12, "칼라")]);
        let found = FieldColumnLocator::default().locate(&grid);
        assert_eq!(
            found,
            FieldColumns {
                product: Some(11),
                color: Some(12)
            }
        );
    }

    #[test]
    fn test_scan_accepts_color_synonym_and_substring() {
        let grid = grid_with_labels(&[(1, 15, " 상품 품명 "), (2, 16, "색상/COLOR")]);
        let found = FieldColumnLocator::default().locate(&grid);
        assert_eq!(found.product, Some(15));
        assert_eq!(found.color, Some(16));
    }

    #[test]
    fn test_scan_first_match_wins() {
        let grid = grid_with_labels(&[(0, 20, "품명"), (1, 11, "품명"), (0, 25, "칼라"), (0, 21, "색상")]);
        let found = FieldColumnLocator::default().locate(&grid);
        assert_eq!(found.product, Some(20));
        assert_eq!(found.color, Some(21));
    }

    #[test]
    fn test_scan_partial_result() {
        let grid = grid_with_labels(&[(0, 11, "품명")]);
        let found = FieldColumnLocator::default().locate(&grid);
        assert_eq!(found.product, Some(11));
        assert_eq!(found.color, None);
    }

    #[test]
    fn test_scan_ignores_labels_outside_window() {
        // left-hand customs table and rows below the window
        let grid = grid_with_labels(&[(0, 2, "품명"), (5, 11, "품명"), (0, 3, "칼라")]);
        assert_eq!(FieldColumnLocator::default().locate(&grid), FieldColumns::default());
    }

    #[test]
    fn test_fixed_mode_skips_scanning() {
        let grid = grid_with_labels(&[(0, 20, "품명")]);
        let found = FieldColumnLocator::fixed_default().locate(&grid);
        assert_eq!(
            found,
            FieldColumns {
                product: Some(11),
                color: Some(12)
            }
        );
    }
}
