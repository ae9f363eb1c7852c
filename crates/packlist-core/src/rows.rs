//! Walking data rows below the header and building product records

use crate::grid::Grid;
use crate::header::SizeColumnMap;
use crate::record::{ProductRecord, Quantities, NO_COLOR};
use std::ops::Range;

/// Extracts one [`ProductRecord`] per usable data row.
///
/// Holds only borrowed inputs, so [`RowExtractor::records`] can be called any
/// number of times and always yields the same sequence.
#[derive(Debug, Clone, Copy)]
pub struct RowExtractor<'a> {
    sheet: &'a str,
    grid: &'a Grid,
    data_start_row: usize,
    product_col: usize,
    color_col: Option<usize>,
    sizes: &'a SizeColumnMap,
}

impl<'a> RowExtractor<'a> {
    /// Create an extractor for the rows from `data_start_row` to the end of the grid
    pub fn new(
        sheet: &'a str,
        grid: &'a Grid,
        data_start_row: usize,
        product_col: usize,
        color_col: Option<usize>,
        sizes: &'a SizeColumnMap,
    ) -> Self {
        Self {
            sheet,
            grid,
            data_start_row,
            product_col,
            color_col,
            sizes,
        }
    }

    /// Lazily iterate the records in row order
    pub fn records(&self) -> Records<'a> {
        Records {
            extractor: *self,
            rows: self.data_start_row..self.grid.row_count().max(self.data_start_row),
        }
    }

    /// Build the record for one row, if the row has a product name and at
    /// least one positive quantity
    pub fn extract_row(&self, row: usize) -> Option<ProductRecord> {
        let product_name = self.grid.get(row, self.product_col).as_label()?;

        let color = self
            .color_col
            .and_then(|col| self.grid.get(row, col).as_label())
            .unwrap_or_else(|| NO_COLOR.to_string());

        let quantities: Quantities = self
            .sizes
            .iter()
            .filter_map(|(col, size)| quantity(self.grid, row, col).map(|q| (size, q)))
            .collect();

        if quantities.is_empty() {
            return None;
        }

        Some(ProductRecord {
            sheet: self.sheet.to_string(),
            row: row + 1,
            product_name,
            color,
            quantities,
        })
    }
}

/// A positive whole quantity, or `None` for blank, non-numeric, zero, or negative cells
fn quantity(grid: &Grid, row: usize, col: usize) -> Option<u64> {
    let value = grid.get(row, col).as_number()?;
    if value <= 0.0 {
        return None;
    }
    let whole = value.trunc();
    if whole < 1.0 {
        return None;
    }
    // saturates above u64::MAX
    Some(whole as u64)
}

/// Iterator returned by [`RowExtractor::records`]
#[derive(Debug, Clone)]
pub struct Records<'a> {
    extractor: RowExtractor<'a>,
    rows: Range<usize>,
}

impl Iterator for Records<'_> {
    type Item = ProductRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.rows.by_ref() {
            if let Some(record) = self.extractor.extract_row(row) {
                return Some(record);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rows.len()))
    }
}
