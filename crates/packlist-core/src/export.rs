//! JSON and flattened CSV output for extracted records
//!
//! JSON keeps one object per record, decorated with the store's provenance.
//! The CSV form has one line per (record, size) and starts with a UTF-8 BOM
//! so spreadsheet applications detect the encoding of Korean text.

use crate::error::{Error, Result};
use crate::record::{ProductRecord, Quantities};
use crate::size::Size;
use crate::store::{Provenance, RecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Placeholder for missing provenance in flattened rows
const MISSING: &str = "-";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV header of the flattened export
pub const CSV_HEADER: [&str; 8] = [
    "no",
    "wholesaler",
    "file_name",
    "sheet",
    "product_name",
    "color",
    "size",
    "quantity",
];

/// A record as written to JSON, with provenance fields inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRecord {
    #[serde(flatten)]
    pub provenance: Provenance,
    #[serde(flatten)]
    pub record: ProductRecord,
}

/// Decorate every record of every store with its provenance
pub fn exported_records(stores: &[RecordStore]) -> Vec<ExportedRecord> {
    stores
        .iter()
        .flat_map(|store| {
            store.records().iter().map(|record| ExportedRecord {
                provenance: store.provenance().clone(),
                record: record.clone(),
            })
        })
        .collect()
}

/// Write stores as a pretty-printed JSON array
pub fn write_json<P: AsRef<Path>>(stores: &[RecordStore], path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(&exported_records(stores))?;
    fs::write(path, content)?;
    Ok(())
}

/// Load a JSON export back into stores.
///
/// Consecutive records sharing provenance end up in the same store, so a
/// file written by [`write_json`] reads back as the stores it came from
/// (adjacent stores with identical provenance are merged).
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<RecordStore>> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;
    let records: Vec<ExportedRecord> = serde_json::from_str(&content)?;
    Ok(into_stores(records))
}

/// Group decorated records into stores by runs of equal provenance
pub fn into_stores(records: Vec<ExportedRecord>) -> Vec<RecordStore> {
    let mut stores: Vec<RecordStore> = Vec::new();
    for ExportedRecord { provenance, record } in records {
        match stores.last_mut() {
            Some(store) if *store.provenance() == provenance => store.push(record),
            _ => {
                let mut store = RecordStore::new(provenance);
                store.push(record);
                stores.push(store);
            }
        }
    }
    stores
}

/// One line of the flattened export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Sequence number, 1-based across the whole export
    pub no: usize,
    pub wholesaler: String,
    pub file_name: String,
    pub sheet: String,
    pub product_name: String,
    pub color: String,
    pub size: Size,
    pub quantity: u64,
}

/// Flatten stores into one row per size per record
pub fn flatten(stores: &[RecordStore]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for store in stores {
        let provenance = store.provenance();
        let wholesaler = provenance.wholesaler.as_deref().unwrap_or(MISSING);
        let file_name = provenance.file_name.as_deref().unwrap_or(MISSING);

        for record in store.records() {
            for (size, quantity) in record.quantities.iter() {
                rows.push(ExportRow {
                    no: rows.len() + 1,
                    wholesaler: wholesaler.to_string(),
                    file_name: file_name.to_string(),
                    sheet: record.sheet.clone(),
                    product_name: record.product_name.clone(),
                    color: record.color.clone(),
                    size,
                    quantity,
                });
            }
        }
    }
    rows
}

/// Rebuild quantities per (sheet, product_name, color) from flattened rows.
///
/// Rows sharing a key and size are summed.
pub fn regroup(rows: &[ExportRow]) -> BTreeMap<(String, String, String), Quantities> {
    let mut groups: BTreeMap<(String, String, String), Quantities> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.sheet.clone(), row.product_name.clone(), row.color.clone()))
            .or_default()
            .add(row.size, row.quantity);
    }
    groups
}

/// Write flattened rows as UTF-8 CSV with a byte-order mark
pub fn write_csv<P: AsRef<Path>>(stores: &[RecordStore], path: P) -> Result<usize> {
    let path = path.as_ref();
    let csv_error = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    let rows = flatten(stores);
    for row in &rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush()?;

    Ok(rows.len())
}
