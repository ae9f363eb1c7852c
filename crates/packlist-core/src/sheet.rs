//! Per-sheet orchestration of the locators and the row extractor
//!
//! The first sheet of a packing-list workbook is the customs declaration and
//! never holds product rows, so it is always skipped.

use crate::config::ExtractConfig;
use crate::fields::FieldColumns;
use crate::grid::{Sheet, Workbook};
use crate::header::SizeHeader;
use crate::rows::RowExtractor;
use crate::size::Size;
use crate::store::{Provenance, RecordStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Why a sheet contributed no records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The first sheet of every workbook
    LeadingSheet,
    /// No row in the scan window had enough size tokens
    HeaderNotFound,
    /// A header was found but no product-name column
    ProductColumnNotFound,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::LeadingSheet => write!(f, "first sheet is always skipped"),
            SkipReason::HeaderNotFound => write!(f, "size header not found"),
            SkipReason::ProductColumnNotFound => write!(f, "product-name column not found"),
        }
    }
}

/// What happened to one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    /// Records were extracted (possibly zero)
    Extracted {
        /// Header row, 1-based
        header_row: usize,
        /// Sizes from the header, in column order
        sizes: Vec<Size>,
        /// Product-name column (0-based)
        product_col: usize,
        /// Color column (0-based), if any
        color_col: Option<usize>,
        /// Number of records appended
        records: usize,
    },
    /// The sheet was skipped
    Skipped { reason: SkipReason },
}

/// Per-sheet line of a run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetReport {
    /// Sheet name
    pub sheet: String,
    /// Result for the sheet
    pub outcome: SheetOutcome,
}

impl SheetReport {
    /// Records this sheet contributed
    pub fn records(&self) -> usize {
        match self.outcome {
            SheetOutcome::Extracted { records, .. } => records,
            SheetOutcome::Skipped { .. } => 0,
        }
    }

    /// Whether the sheet was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SheetOutcome::Skipped { .. })
    }
}

/// Counts for one workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Source file, if known
    pub file: Option<PathBuf>,
    /// When extraction started
    pub started_at: DateTime<Utc>,
    /// One entry per sheet in workbook order
    pub sheets: Vec<SheetReport>,
}

impl RunReport {
    /// Total records extracted
    pub fn total_records(&self) -> usize {
        self.sheets.iter().map(SheetReport::records).sum()
    }

    /// Number of sheets that contributed nothing because they were skipped
    pub fn skipped_sheets(&self) -> usize {
        self.sheets.iter().filter(|s| s.is_skipped()).count()
    }
}

/// Result of processing one workbook
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Records in sheet order, then row order
    pub store: RecordStore,
    /// Per-sheet diagnostics
    pub report: RunReport,
}

/// Runs header and field discovery plus row extraction over a workbook
#[derive(Debug, Clone, Default)]
pub struct SheetExtractor {
    config: ExtractConfig,
}

impl SheetExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Process every sheet after the first, in workbook order.
    ///
    /// A sheet whose structure cannot be found is reported and skipped; it
    /// never stops the remaining sheets.
    pub fn process(&self, workbook: &Workbook, provenance: Provenance) -> Extraction {
        let mut store = RecordStore::new(provenance);
        let mut sheets = Vec::with_capacity(workbook.sheets.len());
        let started_at = Utc::now();

        for (index, sheet) in workbook.sheets.iter().enumerate() {
            let outcome = if index == 0 {
                tracing::debug!(sheet = %sheet.name, "skipping leading sheet");
                SheetOutcome::Skipped {
                    reason: SkipReason::LeadingSheet,
                }
            } else {
                self.process_sheet(sheet, &mut store)
            };
            sheets.push(SheetReport {
                sheet: sheet.name.clone(),
                outcome,
            });
        }

        Extraction {
            store,
            report: RunReport {
                file: workbook.source_path.clone(),
                started_at,
                sheets,
            },
        }
    }

    /// Extract one sheet into the store
    pub fn process_sheet(&self, sheet: &Sheet, store: &mut RecordStore) -> SheetOutcome {
        let (header, fields) = match self.inspect(sheet) {
            Ok(found) => found,
            Err(reason) => {
                tracing::warn!(sheet = %sheet.name, %reason, "skipping sheet");
                return SheetOutcome::Skipped { reason };
            }
        };
        let Some(product_col) = fields.product else {
            tracing::warn!(sheet = %sheet.name, reason = %SkipReason::ProductColumnNotFound, "skipping sheet");
            return SheetOutcome::Skipped {
                reason: SkipReason::ProductColumnNotFound,
            };
        };

        let extractor = RowExtractor::new(
            &sheet.name,
            &sheet.grid,
            header.row + 1,
            product_col,
            fields.color,
            &header.columns,
        );
        let before = store.len();
        store.extend(extractor.records());
        let records = store.len() - before;

        tracing::info!(
            sheet = %sheet.name,
            header_row = header.row + 1,
            sizes = header.columns.len(),
            records,
            "sheet extracted"
        );

        SheetOutcome::Extracted {
            header_row: header.row + 1,
            sizes: header.columns.sizes(),
            product_col,
            color_col: fields.color,
            records,
        }
    }

    /// Run both locators on a sheet without extracting rows
    pub fn inspect(&self, sheet: &Sheet) -> Result<(SizeHeader, FieldColumns), SkipReason> {
        let header = self
            .config
            .header
            .locate(&sheet.grid)
            .ok_or(SkipReason::HeaderNotFound)?;
        let fields = self.config.fields.locate(&sheet.grid);
        Ok((header, fields))
    }
}
