//! Hint catalog document: loading, schema validation, and substring lookup.
//!
//! A catalog is a YAML document with a single top-level `errors` sequence:
//!
//! ```yaml
//! errors:
//!   - type: NullPointerException
//!     hint: Check for null before use
//!   - type: IndexOutOfBounds
//!     hint: Check array bounds
//! ```
//!
//! The document is parsed into an untyped [`serde_yaml::Value`] first and then
//! checked field by field, so a record whose `type` is `42` or `~` is rejected
//! at load time instead of being coerced into a string.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Errors raised while loading a hint catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog document does not exist or could not be read.
    #[error("hint catalog not found at {path:?}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed YAML or does not match the catalog schema.
    #[error("failed to parse hint catalog{}: {source}", location(.path))]
    Parse {
        /// `None` when the catalog was parsed from an in-memory string.
        path: Option<PathBuf>,
        #[source]
        source: ParseFailure,
    },
}

impl CatalogError {
    /// Whether this is a missing/unreadable document error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// Whether this is a syntax or schema error.
    pub fn is_parse(&self) -> bool {
        matches!(self, CatalogError::Parse { .. })
    }
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {p:?}"),
        None => String::new(),
    }
}

/// Why a catalog document failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    /// The file content is not UTF-8 text.
    #[error("catalog is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The content is not well-formed YAML.
    #[error("invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// The YAML is well-formed but does not have the expected shape.
    #[error("{0}")]
    Schema(String),
}

/// One known error type and its remediation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    /// The error type this hint applies to (the `type` key in YAML).
    #[serde(rename = "type")]
    pub error_type: String,
    /// Remediation text shown to the user.
    pub hint: String,
}

impl HintRecord {
    pub fn new(error_type: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            hint: hint.into(),
        }
    }

    /// Exact, case-sensitive, unanchored substring match on the error type.
    pub fn matches(&self, query: &str) -> bool {
        self.error_type.contains(query)
    }
}

impl fmt::Display for HintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.hint)
    }
}

/// An ordered, immutable set of hint records sourced from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    errors: Vec<HintRecord>,
}

impl Catalog {
    /// Build a catalog directly from records, keeping their order.
    pub fn new(records: Vec<HintRecord>) -> Self {
        Self { errors: records }
    }

    /// Read and parse the catalog document at `path`.
    ///
    /// Only I/O failures map to [`CatalogError::NotFound`]; a readable file
    /// with bad content is a [`CatalogError::Parse`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_bytes(bytes, path)
    }

    /// Same as [`Catalog::load`], reading the file with async I/O.
    pub async fn load_async(path: &Path) -> Result<Self, CatalogError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CatalogError::NotFound {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse_bytes(bytes, path)
    }

    /// Parse a catalog from an in-memory YAML string.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        Self::parse_at(s, None)
    }

    fn parse_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self, CatalogError> {
        let content = String::from_utf8(bytes).map_err(|e| CatalogError::Parse {
            path: Some(path.to_path_buf()),
            source: e.into(),
        })?;
        Self::parse_at(&content, Some(path))
    }

    fn parse_at(s: &str, path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = parse_document(s).map_err(|source| CatalogError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;
        debug!(
            path = ?path,
            records = catalog.len(),
            "Hint catalog parsed"
        );
        Ok(catalog)
    }

    /// All records in source order.
    pub fn records(&self) -> &[HintRecord] {
        &self.errors
    }

    /// Records whose error type contains `query`, in catalog order.
    pub fn matching<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a HintRecord> + 'a {
        self.errors.iter().filter(move |r| r.matches(query))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn parse_document(s: &str) -> Result<Catalog, ParseFailure> {
    let doc: Value = serde_yaml::from_str(s)?;
    let Value::Mapping(root) = doc else {
        return Err(schema("document must be a mapping with an `errors` key"));
    };
    let errors = root
        .get("errors")
        .ok_or_else(|| schema("missing top-level `errors` key"))?;
    let Value::Sequence(items) = errors else {
        return Err(schema("`errors` must be a sequence"));
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Value::Mapping(entry) = item else {
            return Err(schema(format!("errors[{i}] must be a mapping")));
        };
        records.push(HintRecord {
            error_type: string_field(entry, "type", i)?,
            hint: string_field(entry, "hint", i)?,
        });
    }
    Ok(Catalog::new(records))
}

fn string_field(entry: &Mapping, key: &str, index: usize) -> Result<String, ParseFailure> {
    match entry.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(schema(format!("errors[{index}].{key} must be a string"))),
        None => Err(schema(format!("errors[{index}].{key} is required"))),
    }
}

fn schema(msg: impl Into<String>) -> ParseFailure {
    ParseFailure::Schema(msg.into())
}
