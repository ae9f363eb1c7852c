//! Extracted product records

use crate::size::Size;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Color written when a row has no color value
pub const NO_COLOR: &str = "-";

/// Size -> quantity in header column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quantities {
    entries: Vec<(Size, u64)>,
}

impl Quantities {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for a size, keeping its original position if present
    pub fn insert(&mut self, size: Size, quantity: u64) {
        match self.entries.iter_mut().find(|(s, _)| *s == size) {
            Some(entry) => entry.1 = quantity,
            None => self.entries.push((size, quantity)),
        }
    }

    /// Add to the quantity for a size
    pub fn add(&mut self, size: Size, quantity: u64) {
        match self.entries.iter_mut().find(|(s, _)| *s == size) {
            Some(entry) => entry.1 = entry.1.saturating_add(quantity),
            None => self.entries.push((size, quantity)),
        }
    }

    /// Quantity for a size
    pub fn get(&self, size: &Size) -> Option<u64> {
        self.entries.iter().find(|(s, _)| s == size).map(|(_, q)| *q)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Size, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of sizes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no size has a quantity
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all sizes
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0, |acc, (_, q)| acc.saturating_add(*q))
    }
}

impl FromIterator<(Size, u64)> for Quantities {
    fn from_iter<I: IntoIterator<Item = (Size, u64)>>(iter: I) -> Self {
        let mut quantities = Quantities::new();
        for (size, quantity) in iter {
            quantities.insert(size, quantity);
        }
        quantities
    }
}

impl Serialize for Quantities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (size, quantity) in &self.entries {
            map.serialize_entry(size, quantity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Quantities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuantitiesVisitor;

        impl<'de> Visitor<'de> for QuantitiesVisitor {
            type Value = Quantities;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of size labels to quantities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Quantities, A::Error> {
                let mut quantities = Quantities::new();
                while let Some((size, quantity)) = access.next_entry::<Size, u64>()? {
                    quantities.insert(size, quantity);
                }
                Ok(quantities)
            }
        }

        deserializer.deserialize_map(QuantitiesVisitor)
    }
}

/// One product/color line of a packing list with its positive per-size quantities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Sheet the row came from
    pub sheet: String,
    /// Source row number, 1-based
    pub row: usize,
    /// Trimmed product name, never blank
    pub product_name: String,
    /// Color, or [`NO_COLOR`]
    pub color: String,
    /// Never empty
    pub quantities: Quantities,
}

impl ProductRecord {
    /// Total quantity over all sizes
    pub fn total_quantity(&self) -> u64 {
        self.quantities.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_keep_insertion_order() {
        let q: Quantities = [
            (Size::Word("FREE"), 1),
            (Size::Numeric(120), 2),
            (Size::Word("L"), 3),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"FREE":1,"120":2,"L":3}"#);

        let back: Quantities = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn test_quantities_insert_and_add() {
        let mut q = Quantities::new();
        q.insert(Size::Numeric(140), 12);
        q.insert(Size::Numeric(150), 5);
        q.insert(Size::Numeric(140), 7);
        q.add(Size::Numeric(150), 1);
        assert_eq!(q.get(&Size::Numeric(140)), Some(7));
        assert_eq!(q.get(&Size::Numeric(150)), Some(6));
        assert_eq!(q.iter().next(), Some((Size::Numeric(140), 7)));
        assert_eq!(q.total(), 13);
    }

    #[test]
    fn test_quantities_reject_unknown_size_on_load() {
        let result: Result<Quantities, _> = serde_json::from_str(r#"{"XXXL":1}"#);
        assert!(result.is_err());
    }
}
