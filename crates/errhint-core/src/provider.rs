//! Host-facing adapter over the search engine.
//!
//! A host (CLI, TUI, editor plugin) prompts for an error message, hands it to
//! [`ErrorHintProvider::search_error`], and on each results-changed event asks
//! for the root's [`children`](ErrorHintProvider::children) and renders each
//! one via [`tree_item`](ErrorHintProvider::tree_item).

use errhint_catalog::CatalogError;
use tracing::debug;

use crate::engine::{HintSearchEngine, SearchResult};

/// What happened to a submitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The message was blank; the engine was not consulted.
    Skipped,
    /// The search ran and produced `matches` results.
    Searched { matches: usize },
}

/// A rendered row: the label plus its hover text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub tooltip: String,
}

/// Flat, single-level tree of hint results backed by a [`HintSearchEngine`].
#[derive(Debug)]
pub struct ErrorHintProvider {
    engine: HintSearchEngine,
}

impl ErrorHintProvider {
    pub fn new(engine: HintSearchEngine) -> Self {
        Self { engine }
    }

    /// Search for `message`, skipping blank or whitespace-only input.
    ///
    /// The message is passed to the engine untrimmed.
    pub fn search_error(&mut self, message: &str) -> Result<SearchOutcome, CatalogError> {
        if message.trim().is_empty() {
            debug!("Ignoring blank error message");
            return Ok(SearchOutcome::Skipped);
        }
        let matches = self.engine.search(message)?.len();
        Ok(SearchOutcome::Searched { matches })
    }

    /// Children of `parent`: the current results for the root, nothing for
    /// a result node.
    pub fn children(&self, parent: Option<&SearchResult>) -> Vec<SearchResult> {
        match parent {
            None => self.engine.results().to_vec(),
            Some(_) => Vec::new(),
        }
    }

    pub fn tree_item(&self, node: &SearchResult) -> TreeItem {
        TreeItem {
            label: node.label().to_string(),
            tooltip: node.tooltip().to_string(),
        }
    }

    pub fn engine(&self) -> &HintSearchEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HintSearchEngine {
        &mut self.engine
    }
}
