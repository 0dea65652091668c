//! TUI panel implementations.

mod catalog;
mod logs;
mod results;

pub use catalog::CatalogPanel;
pub use logs::LogsPanel;
pub use results::ResultsPanel;

/// Trait for panels that support scrolling.
pub trait PanelState {
    /// Scroll down by `n` lines.
    fn scroll_down(&mut self, n: usize);

    /// Scroll up by `n` lines.
    fn scroll_up(&mut self, n: usize);

    /// Scroll to the very top.
    fn scroll_to_top(&mut self);

    /// Scroll to the very bottom.
    fn scroll_to_bottom(&mut self);
}
