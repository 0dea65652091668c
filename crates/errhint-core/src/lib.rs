#![deny(unsafe_code)]

//! errhint core: the error-hint search engine.
//!
//! Given a free-text error message, the [`HintSearchEngine`] filters the hint
//! catalog by error-type substring, keeps the display-ready results, and tells
//! observers the results changed. Hosts talk to it through the
//! [`ErrorHintProvider`], which adds the blank-input guard and tree accessors.

/// Substring search over the catalog and the current result set.
pub mod engine;
/// In-memory diagnostics log for the TUI.
pub mod logging;
/// Results-changed callbacks and broadcast channel.
pub mod observer;
/// Host-facing provider: input guard, children, tree items.
pub mod provider;

pub use engine::{EngineState, HintSearchEngine, SearchResult};
pub use errhint_catalog::{AppConfig, Catalog, CatalogError, HintRecord, ReloadPolicy};
pub use logging::{DiagnosticsLog, DiagnosticsReader, LogEntry};
pub use observer::{ObserverId, ResultsChanged};
pub use provider::{ErrorHintProvider, SearchOutcome, TreeItem};
