//! Catalog panel: every loaded hint record, in catalog order.

use errhint_core::Catalog;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::PanelState;

/// Read-only view of the loaded catalog.
pub struct CatalogPanel {
    /// `(type, hint)` pairs; empty until a catalog has been loaded.
    rows: Vec<(String, String)>,
    loaded: bool,
    scroll_offset: usize,
}

impl CatalogPanel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            loaded: false,
            scroll_offset: 0,
        }
    }

    /// Refresh from the engine's cached catalog. Keeps the scroll position
    /// when the record count is unchanged.
    pub fn update(&mut self, catalog: Option<&Catalog>) {
        let Some(catalog) = catalog else {
            return;
        };
        let rows: Vec<(String, String)> = catalog
            .records()
            .iter()
            .map(|r| (r.error_type.clone(), r.hint.clone()))
            .collect();
        if rows.len() != self.rows.len() {
            self.scroll_offset = 0;
        }
        self.rows = rows;
        self.loaded = true;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.loaded {
            let empty = Paragraph::new("  (catalog loads on the first search; press r to load now)")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(" Catalog ").borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let visible_height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .rows
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .map(|(error_type, hint)| {
                Line::from(vec![
                    Span::styled(
                        error_type.as_str(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(": "),
                    Span::styled(hint.as_str(), Style::default().fg(Color::Green)),
                ])
            })
            .collect();

        let title = format!(" Catalog ({} hints) ", self.len());
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

impl Default for CatalogPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState for CatalogPanel {
    fn scroll_down(&mut self, n: usize) {
        let max = self.rows.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.rows.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errhint_core::HintRecord;
    use errhint_test_utils::catalog::sample_catalog;

    #[test]
    fn test_update_ignores_unloaded_catalog() {
        let mut panel = CatalogPanel::new();
        panel.update(None);
        assert!(!panel.loaded);
        assert_eq!(panel.len(), 0);
    }

    #[test]
    fn test_update_copies_records_in_order() {
        let mut panel = CatalogPanel::new();
        panel.update(Some(&sample_catalog()));
        assert!(panel.loaded);
        assert_eq!(panel.rows[0].0, "NullPointerException");
        assert_eq!(panel.rows[1].1, "Check array bounds");
    }

    #[test]
    fn test_scroll_resets_when_catalog_size_changes() {
        let records = (0..20)
            .map(|i| HintRecord::new(format!("E{i}"), "h"))
            .collect();
        let mut panel = CatalogPanel::new();
        panel.update(Some(&Catalog::new(records)));

        panel.scroll_down(5);
        assert_eq!(panel.scroll_offset, 5);
        panel.scroll_up(3);
        assert_eq!(panel.scroll_offset, 2);
        panel.scroll_to_bottom();
        assert_eq!(panel.scroll_offset, 19);

        panel.update(Some(&sample_catalog()));
        assert_eq!(panel.scroll_offset, 0);
    }
}
