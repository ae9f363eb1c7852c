//! Size labels and the classifier that recognises them in header cells

use crate::error::{Error, Result};
use crate::grid::CellValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Numeric garment sizes (children's heights in cm)
pub const NUMERIC_SIZES: RangeInclusive<i64> = 100..=250;

/// Closed vocabulary of word sizes, matched case-sensitively
pub const SIZE_WORDS: &[&str] = &["S", "M", "L", "XL", "XXL", "XS", "FREE"];

/// A normalized size label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Size {
    /// Integer size within [`NUMERIC_SIZES`]
    Numeric(u16),
    /// One of [`SIZE_WORDS`]
    Word(&'static str),
}

impl Size {
    /// Classify a single cell as a size token.
    ///
    /// Word sizes must match exactly after trimming. Everything else goes
    /// through the shared numeric coercion, so `120`, `"120"` and `"120.0"` all
    /// become `Numeric(120)`.
    pub fn classify(cell: &CellValue) -> Option<Size> {
        if let CellValue::Text(s) = cell {
            if let Some(word) = Self::word(s.trim()) {
                return Some(word);
            }
        }
        cell.as_number().and_then(Self::numeric)
    }

    fn word(s: &str) -> Option<Size> {
        SIZE_WORDS.iter().copied().find(|w| *w == s).map(Size::Word)
    }

    fn numeric(n: f64) -> Option<Size> {
        let truncated = n.trunc() as i64;
        if NUMERIC_SIZES.contains(&truncated) {
            u16::try_from(truncated).ok().map(Size::Numeric)
        } else {
            None
        }
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Size::classify(&CellValue::text(s)).ok_or_else(|| Error::InvalidSize(s.to_string()))
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Size::Numeric(n) => write!(f, "{}", n),
            Size::Word(w) => write!(f, "{}", w),
        }
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
