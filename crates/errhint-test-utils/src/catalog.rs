//! Hint catalog fixtures.
//!
//! [`TestCatalog`] owns a temp directory holding a `hints.yml`, so tests can
//! point a file-backed engine at it and rewrite it between searches.

use std::path::{Path, PathBuf};

use errhint_catalog::{Catalog, HintRecord};
use tempfile::TempDir;

/// Two-record catalog used across the workspace's tests.
pub const SAMPLE_CATALOG_YAML: &str = "\
errors:
  - type: NullPointerException
    hint: Check for null before use
  - type: IndexOutOfBounds
    hint: Check array bounds
";

/// In-memory equivalent of [`SAMPLE_CATALOG_YAML`].
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        HintRecord::new("NullPointerException", "Check for null before use"),
        HintRecord::new("IndexOutOfBounds", "Check array bounds"),
    ])
}

/// Render records as a catalog YAML document.
pub fn catalog_yaml(records: &[HintRecord]) -> String {
    if records.is_empty() {
        return "errors: []\n".to_string();
    }
    let mut out = String::from("errors:\n");
    for record in records {
        out.push_str(&format!(
            "  - type: {}\n    hint: {}\n",
            quote(&record.error_type),
            quote(&record.hint)
        ));
    }
    out
}

// Single-quoted YAML scalars only need `'` doubled.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// A catalog file in a temp directory, deleted on drop.
pub struct TestCatalog {
    path: PathBuf,
    temp_dir: TempDir,
}

impl TestCatalog {
    /// Write `yaml` to `<tempdir>/hints.yml`.
    pub fn with_yaml(yaml: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("hints.yml");
        std::fs::write(&path, yaml).expect("failed to write test catalog");
        Self {
            path,
            temp_dir,
        }
    }

    /// A fixture containing [`SAMPLE_CATALOG_YAML`].
    pub fn sample() -> Self {
        Self::with_yaml(SAMPLE_CATALOG_YAML)
    }

    pub fn with_records(records: &[HintRecord]) -> Self {
        Self::with_yaml(&catalog_yaml(records))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the catalog; put an `errhint.toml` here to test
    /// relative path resolution.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Overwrite the catalog file (for reload testing).
    pub fn write(&self, yaml: &str) {
        std::fs::write(&self.path, yaml).expect("failed to write updated catalog");
    }
}
