//! Hint search engine: substring lookup over the catalog plus the current
//! result set.

use std::fmt;
use std::path::{Path, PathBuf};

use errhint_catalog::{AppConfig, Catalog, CatalogError, HintRecord, ReloadPolicy};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::observer::{ObserverId, ObserverRegistry, ResultsChanged};

/// Message of the `info` event logged at the start of every search. The
/// event carries the query in its `query` field.
pub const SEARCH_STARTED: &str = "Searching for hints";

/// One display-ready match, formatted as `"<type>: <hint>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SearchResult {
    label: String,
}

impl SearchResult {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Hover text for the result; identical to the label.
    pub fn tooltip(&self) -> &str {
        &self.label
    }
}

impl From<&HintRecord> for SearchResult {
    fn from(record: &HintRecord) -> Self {
        Self {
            label: record.to_string(),
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No search has completed yet; the result set is empty.
    Idle,
    /// The last search completed, possibly with zero results.
    Populated,
}

/// Where the engine gets its catalog from.
#[derive(Debug, Clone)]
enum CatalogSource {
    File { path: PathBuf, policy: ReloadPolicy },
    Memory,
}

/// Filters the hint catalog by error-type substring and holds the latest
/// result set.
///
/// `search` takes `&mut self`, so one engine runs at most one search at a time.
/// Hosts sharing an engine between tasks wrap it in `Arc<Mutex<_>>`; searches
/// then serialize and the last one to finish owns the result set.
#[derive(Debug)]
pub struct HintSearchEngine {
    source: CatalogSource,
    catalog: Option<Catalog>,
    results: Vec<SearchResult>,
    last_query: Option<String>,
    observers: ObserverRegistry,
}

impl HintSearchEngine {
    /// Create an engine backed by the catalog document at `path`. Nothing is
    /// read until the first search.
    pub fn new(path: impl Into<PathBuf>, policy: ReloadPolicy) -> Self {
        Self::from_source(CatalogSource::File {
            path: path.into(),
            policy,
        })
    }

    /// Create an engine from application config, resolving a relative
    /// catalog path against `base_dir`.
    pub fn from_config(config: &AppConfig, base_dir: &Path) -> Self {
        Self::new(
            config.resolve_catalog_path(base_dir),
            config.catalog.reload,
        )
    }

    /// Create an engine over an in-memory catalog with no backing file.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let mut engine = Self::from_source(CatalogSource::Memory);
        engine.catalog = Some(catalog);
        engine
    }

    fn from_source(source: CatalogSource) -> Self {
        Self {
            source,
            catalog: None,
            results: Vec::new(),
            last_query: None,
            observers: ObserverRegistry::new(),
        }
    }

    /// Replace the result set with every record whose error type contains
    /// `query`, then notify observers.
    ///
    /// Catalog errors are returned as-is. On error the previous result set is
    /// kept and no observer is notified.
    pub fn search(&mut self, query: &str) -> Result<&[SearchResult], CatalogError> {
        info!(query, "{}", SEARCH_STARTED);

        let catalog = self.ensure_catalog()?;
        let results: Vec<SearchResult> = catalog.matching(query).map(SearchResult::from).collect();

        for result in &results {
            debug!(hint = %result, "Found hint");
        }
        if results.is_empty() {
            info!(query, "No hints found");
        } else {
            info!(query, matches = results.len(), "Search complete");
        }

        self.results = results;
        self.last_query = Some(query.to_string());
        self.observers.notify();
        Ok(&self.results)
    }

    fn ensure_catalog(&mut self) -> Result<&Catalog, CatalogError> {
        if let CatalogSource::File { path, policy } = &self.source {
            if self.catalog.is_none() || *policy == ReloadPolicy::EverySearch {
                self.catalog = Some(Catalog::load(path)?);
            }
        }
        Ok(self.catalog.get_or_insert_with(Catalog::default))
    }

    /// Reread the catalog document now. The cached catalog is only replaced
    /// if the new one loads cleanly. Returns the new record count.
    pub fn reload(&mut self) -> Result<usize, CatalogError> {
        if let CatalogSource::File { path, .. } = &self.source {
            let catalog = Catalog::load(path)?;
            info!(path = %path.display(), records = catalog.len(), "Hint catalog reloaded");
            self.catalog = Some(catalog);
        }
        Ok(self.catalog.as_ref().map_or(0, Catalog::len))
    }

    /// The current result set.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn state(&self) -> EngineState {
        if self.last_query.is_some() {
            EngineState::Populated
        } else {
            EngineState::Idle
        }
    }

    /// The query of the last successful search.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// The cached catalog, if one has been loaded.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Path of the backing catalog document, if any.
    pub fn catalog_path(&self) -> Option<&Path> {
        match &self.source {
            CatalogSource::File { path, .. } => Some(path),
            CatalogSource::Memory => None,
        }
    }

    /// Register a results-changed callback.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Subscribe to results-changed events over a broadcast channel.
    pub fn changes(&self) -> broadcast::Receiver<ResultsChanged> {
        self.observers.channel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use errhint_test_utils::catalog::{SAMPLE_CATALOG_YAML, TestCatalog, sample_catalog};

    fn labels(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(SearchResult::label).collect()
    }

    fn count_notifications(engine: &mut HintSearchEngine) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        engine.subscribe(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_concrete_scenario() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());

        assert_eq!(
            labels(engine.search("Null").unwrap()),
            vec!["NullPointerException: Check for null before use"]
        );
        assert_eq!(
            labels(engine.search("Exception").unwrap()),
            vec!["NullPointerException: Check for null before use"]
        );
        assert!(engine.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_results_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            HintRecord::new("TimeoutError", "Raise the deadline"),
            HintRecord::new("KeyError", "Check the key exists"),
            HintRecord::new("ConnectionError", "Check the network"),
        ]);
        let mut engine = HintSearchEngine::with_catalog(catalog);
        assert_eq!(
            labels(engine.search("Error").unwrap()),
            vec![
                "TimeoutError: Raise the deadline",
                "KeyError: Check the key exists",
                "ConnectionError: Check the network",
            ]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let catalog = Catalog::new(vec![
            HintRecord::new("NullPointerException", "upper"),
            HintRecord::new("nullable-violation", "lower"),
        ]);
        let mut engine = HintSearchEngine::with_catalog(catalog);
        assert_eq!(
            labels(engine.search("Null").unwrap()),
            vec!["NullPointerException: upper"]
        );
        assert_eq!(
            labels(engine.search("null").unwrap()),
            vec!["nullable-violation: lower"]
        );
    }

    #[test]
    fn test_empty_query_returns_all_records() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        assert_eq!(engine.search("").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_catalog_never_errors() {
        let mut engine = HintSearchEngine::with_catalog(Catalog::default());
        assert!(engine.search("anything").unwrap().is_empty());
        assert!(engine.search("").unwrap().is_empty());
    }

    #[test]
    fn test_search_is_idempotent() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let first = engine.search("Index").unwrap().to_vec();
        let second = engine.search("Index").unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.results().is_empty());

        engine.search("zzz").unwrap();
        assert_eq!(engine.state(), EngineState::Populated);
        assert_eq!(engine.last_query(), Some("zzz"));
    }

    #[test]
    fn test_result_tooltip_equals_label() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let result = &engine.search("Index").unwrap()[0];
        assert_eq!(result.tooltip(), result.label());
        assert_eq!(result.to_string(), "IndexOutOfBounds: Check array bounds");
    }

    // ── Notification ──────────────────────────────────────────────────

    #[test]
    fn test_observer_notified_once_per_search() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let count = count_notifications(&mut engine);

        engine.search("Null").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Zero matches still notifies so views can clear stale rows.
        engine.search("zzz").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_all_observers_notified() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let first = count_notifications(&mut engine);
        let second = count_notifications(&mut engine);

        engine.search("Null").unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribed_observer_not_notified() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        let id = engine.subscribe(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        assert!(engine.unsubscribe(id));

        engine.search("Null").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_change_channel_fires_after_results_update() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        let mut rx = engine.changes();

        engine.search("Index").unwrap();
        assert_eq!(rx.recv().await.unwrap(), ResultsChanged);
        assert_eq!(engine.results().len(), 1);
    }

    // ── File-backed catalog ───────────────────────────────────────────

    #[test_log::test]
    fn test_missing_file_leaves_no_side_effects() {
        let mut engine = HintSearchEngine::new("/nonexistent/hints.yml", ReloadPolicy::Cached);
        let count = count_notifications(&mut engine);

        let err = engine.search("Null").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.results().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test_log::test]
    fn test_failed_search_keeps_stale_results() {
        let fixture = TestCatalog::with_yaml(SAMPLE_CATALOG_YAML);
        let mut engine = HintSearchEngine::new(fixture.path(), ReloadPolicy::EverySearch);
        engine.search("Null").unwrap();

        fixture.write("errors: [");
        let count = count_notifications(&mut engine);
        let err = engine.search("Index").unwrap_err();

        assert!(err.is_parse());
        assert_eq!(
            labels(engine.results()),
            vec!["NullPointerException: Check for null before use"]
        );
        assert_eq!(engine.last_query(), Some("Null"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cached_policy_ignores_disk_changes_until_reload() {
        let fixture = TestCatalog::with_yaml(SAMPLE_CATALOG_YAML);
        let mut engine = HintSearchEngine::new(fixture.path(), ReloadPolicy::Cached);
        assert_eq!(engine.search("").unwrap().len(), 2);

        fixture.write("errors:\n  - type: OnlyOne\n    hint: h\n");
        assert_eq!(engine.search("").unwrap().len(), 2);

        assert_eq!(engine.reload().unwrap(), 1);
        assert_eq!(labels(engine.search("").unwrap()), vec!["OnlyOne: h"]);
    }

    #[test]
    fn test_every_search_policy_sees_disk_changes() {
        let fixture = TestCatalog::with_yaml(SAMPLE_CATALOG_YAML);
        let mut engine = HintSearchEngine::new(fixture.path(), ReloadPolicy::EverySearch);
        assert_eq!(engine.search("").unwrap().len(), 2);

        fixture.write("errors: []\n");
        assert!(engine.search("").unwrap().is_empty());
    }

    #[test]
    fn test_failed_reload_keeps_cached_catalog() {
        let fixture = TestCatalog::with_yaml(SAMPLE_CATALOG_YAML);
        let mut engine = HintSearchEngine::new(fixture.path(), ReloadPolicy::Cached);
        engine.search("").unwrap();

        fixture.write("not: [valid");
        assert!(engine.reload().is_err());
        assert_eq!(engine.catalog().map(Catalog::len), Some(2));
        assert_eq!(engine.search("Null").unwrap().len(), 1);
    }

    #[test]
    fn test_reload_in_memory_engine_is_noop() {
        let mut engine = HintSearchEngine::with_catalog(sample_catalog());
        assert_eq!(engine.reload().unwrap(), 2);
        assert!(engine.catalog_path().is_none());
    }

    #[test]
    fn test_from_config_resolves_relative_path() {
        let config = AppConfig::default();
        let engine = HintSearchEngine::from_config(&config, Path::new("/opt/errhint"));
        assert_eq!(
            engine.catalog_path(),
            Some(Path::new("/opt/errhint/hints.yml"))
        );
        assert!(engine.catalog().is_none());
    }
}
