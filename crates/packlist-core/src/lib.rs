//! packlist-core: Table-structure discovery and quantity extraction for packing lists
//!
//! Supplier packing lists share no fixed layout. This library provides
//! functionality to:
//! - Read workbooks into typed cell grids
//! - Find the size header row and the product-name / color columns heuristically
//! - Extract per-size positive quantities for every product row
//! - Query, summarise, and export the extracted records

pub mod config;
pub mod error;
pub mod export;
pub mod fields;
pub mod grid;
pub mod header;
pub mod reader;
pub mod record;
pub mod rows;
pub mod scanner;
pub mod sheet;
pub mod size;
pub mod store;

pub use config::{ExtractConfig, ScanWindow};
pub use error::{Error, Result};
pub use export::{flatten, load_json, regroup, write_csv, write_json, ExportRow, ExportedRecord};
pub use fields::{FieldColumnLocator, FieldColumns};
pub use grid::{CellValue, Grid, Sheet, Workbook};
pub use header::{HeaderLocator, SizeColumnMap, SizeHeader};
pub use reader::open_workbook;
pub use record::{ProductRecord, Quantities, NO_COLOR};
pub use rows::RowExtractor;
pub use scanner::{scan_inputs, ScanResult};
pub use sheet::{Extraction, RunReport, SheetExtractor, SheetOutcome, SheetReport, SkipReason};
pub use size::Size;
pub use store::{
    aggregate_by_name, search, ColorTotal, ProductSummary, Provenance, RecordStore, SearchMatch,
    SearchQuery, SearchResult,
};
