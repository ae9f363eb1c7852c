//! Directory scanner for discovering packing-list workbooks

use crate::error::Result;
use crate::reader::WORKBOOK_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning input paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Roots that were scanned
    pub roots: Vec<PathBuf>,
    /// Workbook files found, sorted by path
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    /// Number of workbook files found
    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

/// Collect workbook files under one or more roots.
///
/// A root that is itself a file is taken as-is when it has a workbook
/// extension. Directories are walked recursively.
pub fn scan_inputs<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut files = Vec::new();

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_workbook(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        files,
    })
}

/// Whether a path looks like a workbook we can read.
///
/// Office lock files (`~$name.xlsx`) are excluded.
pub fn is_workbook(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with("~$") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook(Path::new("20260115-OH-닝보출항.xls")));
        assert!(is_workbook(Path::new("dir/list.XLSX")));
        assert!(!is_workbook(Path::new("dir/~$list.xlsx")));
        assert!(!is_workbook(Path::new("extracted.json")));
        assert!(!is_workbook(Path::new("noext")));
    }

    #[test]
    fn test_scan_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2026").join("01");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.xlsx"), b"").unwrap();
        fs::write(nested.join("a.xls"), b"").unwrap();
        fs::write(nested.join("~$a.xls"), b"").unwrap();
        fs::write(nested.join("notes.txt"), b"").unwrap();

        let result = scan_inputs(&[dir.path()]).unwrap();
        assert_eq!(result.total_files(), 2);
        assert_eq!(
            result.files,
            vec![nested.join("a.xls"), dir.path().join("b.xlsx")]
        );
    }

    #[test]
    fn test_scan_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("list.xlsx");
        fs::write(&file, b"").unwrap();

        let result = scan_inputs(&[&file]).unwrap();
        assert_eq!(result.files, vec![file]);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        assert!(scan_inputs(&[Path::new("does/not/exist")]).is_err());
    }
}
