//! Reading spreadsheet files into in-memory workbooks

use crate::error::{Error, Result};
use crate::grid::{CellValue, Grid, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// File extensions the reader can open
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Open a workbook and materialise every sheet.
///
/// Failing to open the file or any of its sheets is fatal for the run.
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let workbook_error = |source: calamine::Error| Error::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
        let grid = range_to_grid(&range);
        tracing::debug!(sheet = %name, rows = grid.row_count(), cols = grid.column_count(), "sheet loaded");
        sheets.push(Sheet::new(name, grid));
    }

    Ok(Workbook {
        source_path: Some(path.to_path_buf()),
        sheets,
    })
}

/// Convert a calamine range into a grid anchored at A1.
///
/// calamine ranges start at the first used cell, so leading blank rows and
/// columns are padded back in to keep column indices absolute.
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(convert_value));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Bool(_) | Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
