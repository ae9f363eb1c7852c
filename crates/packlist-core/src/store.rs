//! The ordered record collection of an extraction run and its query surface

use crate::record::ProductRecord;
use crate::size::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where the records of one ingestion run came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// Wholesaler the packing list belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wholesaler: Option<String>,
    /// Source file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Provenance {
    /// Create provenance metadata
    pub fn new(wholesaler: Option<String>, file_name: Option<String>) -> Self {
        Self {
            wholesaler,
            file_name,
        }
    }
}

/// Append-only, ordered records of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    provenance: Provenance,
    records: Vec<ProductRecord>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            records: Vec::new(),
        }
    }

    /// Metadata shared by every record in the store
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Append one record
    pub fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    /// Records in insertion order
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of every quantity in the store
    pub fn total_quantity(&self) -> u64 {
        self.records
            .iter()
            .fold(0, |acc, r| acc.saturating_add(r.total_quantity()))
    }

    /// Expand matching records into (record, size, quantity) tuples
    pub fn filter(&self, query: &SearchQuery) -> SearchResult<'_> {
        let mut result = SearchResult::default();
        result.collect(self, query);
        result
    }

    /// Per-product, per-color totals
    pub fn aggregate_by_name(&self) -> Vec<ProductSummary> {
        aggregate_by_name(&self.records)
    }
}

impl Extend<ProductRecord> for RecordStore {
    fn extend<I: IntoIterator<Item = ProductRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

/// Search criteria; `None` leaves a field unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Case-insensitive substring of the color
    pub color: Option<String>,
    /// Exact size
    pub size: Option<Size>,
}

impl SearchQuery {
    /// Whether the record passes the name and color filters
    pub fn matches(&self, record: &ProductRecord) -> bool {
        contains_ignore_case(&record.product_name, self.name.as_deref())
            && contains_ignore_case(&record.color, self.color.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// One matched (record, size) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch<'a> {
    /// Provenance of the store the record belongs to
    pub provenance: &'a Provenance,
    /// Matching record
    pub record: &'a ProductRecord,
    /// Matched size
    pub size: Size,
    /// Quantity for that size
    pub quantity: u64,
}

/// Matches in store order plus their summed quantity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult<'a> {
    /// Matches in store insertion order
    pub matches: Vec<SearchMatch<'a>>,
    /// Sum of matched quantities
    pub total: u64,
}

impl<'a> SearchResult<'a> {
    fn collect(&mut self, store: &'a RecordStore, query: &SearchQuery) {
        for record in store.records.iter().filter(|r| query.matches(r)) {
            for (size, quantity) in record.quantities.iter() {
                if query.size.is_some_and(|wanted| wanted != size) {
                    continue;
                }
                self.total = self.total.saturating_add(quantity);
                self.matches.push(SearchMatch {
                    provenance: &store.provenance,
                    record,
                    size,
                    quantity,
                });
            }
        }
    }
}

/// Run one query over several stores, keeping store order
pub fn search<'a>(stores: &'a [RecordStore], query: &SearchQuery) -> SearchResult<'a> {
    let mut result = SearchResult::default();
    for store in stores {
        result.collect(store, query);
    }
    result
}

/// Summed quantity of one color of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTotal {
    /// Color label
    pub color: String,
    /// Summed quantity over all sizes and records
    pub quantity: u64,
}

/// Totals for one product name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Exact product name
    pub product_name: String,
    /// Per-color totals in first-seen order
    pub colors: Vec<ColorTotal>,
    /// Total over all colors
    pub total: u64,
}

/// Group records by exact product name, summing quantities per color.
///
/// Products and colors keep the order in which they first appear.
pub fn aggregate_by_name<'a, I>(records: I) -> Vec<ProductSummary>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut summaries: Vec<ProductSummary> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let slot = *index
            .entry(record.product_name.as_str())
            .or_insert_with(|| {
                summaries.push(ProductSummary {
                    product_name: record.product_name.clone(),
                    colors: Vec::new(),
                    total: 0,
                });
                summaries.len() - 1
            });

        let summary = &mut summaries[slot];
        let quantity = record.total_quantity();
        summary.total = summary.total.saturating_add(quantity);
        match summary.colors.iter_mut().find(|c| c.color == record.color) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => summary.colors.push(ColorTotal {
                color: record.color.clone(),
                quantity,
            }),
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Quantities;

    fn record(name: &str, color: &str, quantities: &[(Size, u64)]) -> ProductRecord {
        ProductRecord {
            sheet: "Sheet2".to_string(),
            row: 3,
            product_name: name.to_string(),
            color: color.to_string(),
            quantities: quantities.iter().copied().collect::<Quantities>(),
        }
    }

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new(Provenance::new(
            Some("OH".to_string()),
            Some("20260115-OH.xls".to_string()),
        ));
        store.push(record(
            "루비하트",
            "핑크",
            &[(Size::Numeric(140), 12), (Size::Numeric(150), 5)],
        ));
        store.push(record("바다공주", "실버", &[(Size::Word("FREE"), 8)]));
        store.push(record("루비하트", "블랙", &[(Size::Numeric(150), 2)]));
        store
    }

    #[test]
    fn test_filter_name_and_size() {
        let store = sample_store();
        let query = SearchQuery {
            name: Some("루비".to_string()),
            size: Some(Size::Numeric(140)),
            ..SearchQuery::default()
        };
        let result = store.filter(&query);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].quantity, 12);
        assert_eq!(result.matches[0].record.color, "핑크");
        assert_eq!(result.total, 12);
    }

    #[test]
    fn test_filter_expands_every_size() {
        let store = sample_store();
        let result = store.filter(&SearchQuery {
            name: Some("루비".to_string()),
            ..SearchQuery::default()
        });
        let tuples: Vec<(&str, Size, u64)> = result
            .matches
            .iter()
            .map(|m| (m.record.color.as_str(), m.size, m.quantity))
            .collect();
        assert_eq!(
            tuples,
            vec![
                ("핑크", Size::Numeric(140), 12),
                ("핑크", Size::Numeric(150), 5),
                ("블랙", Size::Numeric(150), 2),
            ]
        );
        assert_eq!(result.total, 19);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut store = RecordStore::default();
        store.push(record("Ruby Heart", "Pink", &[(Size::Word("M"), 1)]));
        let result = store.filter(&SearchQuery {
            name: Some("ruby".to_string()),
            color: Some("PINK".to_string()),
            size: None,
        });
        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn test_filter_unconstrained_returns_everything() {
        let store = sample_store();
        let result = store.filter(&SearchQuery::default());
        assert_eq!(result.matches.len(), 4);
        assert_eq!(result.total, store.total_quantity());
    }

    #[test]
    fn test_filter_no_match() {
        let store = sample_store();
        let result = store.filter(&SearchQuery {
            color: Some("골드".to_string()),
            ..SearchQuery::default()
        });
        assert!(result.matches.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_search_across_stores_keeps_provenance() {
        let first = sample_store();
        let mut second = RecordStore::new(Provenance::new(Some("LR".to_string()), None));
        second.push(record("루비하트", "핑크", &[(Size::Numeric(140), 1)]));
        let stores = vec![first, second];

        let result = search(
            &stores,
            &SearchQuery {
                size: Some(Size::Numeric(140)),
                ..SearchQuery::default()
            },
        );
        let wholesalers: Vec<Option<&str>> = result
            .matches
            .iter()
            .map(|m| m.provenance.wholesaler.as_deref())
            .collect();
        assert_eq!(wholesalers, vec![Some("OH"), Some("LR")]);
        assert_eq!(result.total, 13);
    }

    #[test]
    fn test_aggregate_by_name() {
        let mut store = sample_store();
        store.push(record("루비하트", "핑크", &[(Size::Numeric(160), 3)]));
        let summary = store.aggregate_by_name();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].product_name, "루비하트");
        assert_eq!(
            summary[0].colors,
            vec![
                ColorTotal {
                    color: "핑크".to_string(),
                    quantity: 20
                },
                ColorTotal {
                    color: "블랙".to_string(),
                    quantity: 2
                },
            ]
        );
        assert_eq!(summary[0].total, 22);
        assert_eq!(summary[1].product_name, "바다공주");
        assert_eq!(summary[1].total, 8);
    }
}
