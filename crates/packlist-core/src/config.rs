//! Scan windows, thresholds, and the JSON extraction config
//!
//! Real packing lists put their size table on the right-hand side of the
//! sheet with the header in the first few rows, so the defaults below only
//! look there.

use crate::error::{Error, Result};
use crate::fields::FieldColumnLocator;
use crate::header::HeaderLocator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Rows searched for the size header and the field labels
pub const HEADER_SCAN_ROWS: usize = 5;

/// Columns searched for size labels
pub const SIZE_COLUMNS: Range<usize> = 14..28;

/// A header row needs strictly more size tokens than this
pub const MIN_SIZE_TOKENS: usize = 5;

/// Columns searched for the product-name and color labels
pub const FIELD_COLUMNS: Range<usize> = 10..28;

/// Product-name column of the known fixed layout
pub const FIXED_PRODUCT_COLUMN: usize = 11;

/// Color column of the known fixed layout
pub const FIXED_COLOR_COLUMN: usize = 12;

/// A bounded region of a grid: the first `rows` rows, restricted to `columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    /// Number of leading rows to search
    pub rows: usize,
    /// Half-open column range to search
    pub columns: Range<usize>,
}

impl ScanWindow {
    /// Create a new scan window
    pub fn new(rows: usize, columns: Range<usize>) -> Self {
        Self { rows, columns }
    }

    /// Row indices inside the window for a grid of `height` rows
    pub fn row_range(&self, height: usize) -> Range<usize> {
        0..self.rows.min(height)
    }

    /// Column indices inside the window for a grid of `width` columns
    pub fn column_range(&self, width: usize) -> Range<usize> {
        let end = self.columns.end.min(width);
        self.columns.start.min(end)..end
    }

    fn validate(&self, what: &str) -> Result<()> {
        if self.rows == 0 {
            return Err(Error::InvalidConfig(format!("{} scan window has no rows", what)));
        }
        if self.columns.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{} scan window has an empty column range {:?}",
                what, self.columns
            )));
        }
        Ok(())
    }
}

/// Settings for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// How the size header row is found
    pub header: HeaderLocator,
    /// How the product-name and color columns are found
    pub fields: FieldColumnLocator,
}

impl ExtractConfig {
    /// Load a config from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject windows that could never match anything
    pub fn validate(&self) -> Result<()> {
        self.header.window.validate("header")?;
        if let FieldColumnLocator::Scan(window) = &self.fields {
            window.validate("field")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_range_clamps_to_grid() {
        let window = ScanWindow::new(5, 14..28);
        assert_eq!(window.column_range(40), 14..28);
        assert_eq!(window.column_range(20), 14..20);
        assert_eq!(window.column_range(10), 10..10);
        assert!(window.column_range(10).is_empty());
    }

    #[test]
    fn test_row_range_clamps_to_grid() {
        let window = ScanWindow::new(5, 0..1);
        assert_eq!(window.row_range(100), 0..5);
        assert_eq!(window.row_range(2), 0..2);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.header.window, ScanWindow::new(HEADER_SCAN_ROWS, SIZE_COLUMNS));
        assert_eq!(config.header.min_tokens, MIN_SIZE_TOKENS);
    }

    #[test]
    fn test_validate_rejects_empty_window() {
        let mut config = ExtractConfig::default();
        config.header.window.columns = 20..20;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = ExtractConfig::default();
        config.fields = FieldColumnLocator::Scan(ScanWindow::new(0, 10..28));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = ExtractConfig {
            fields: FieldColumnLocator::Fixed {
                product: 3,
                color: None,
            },
            ..ExtractConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"mode\":\"fixed\""));
        let back: ExtractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
