//! Results panel: the hint list for the last search.

use errhint_core::TreeItem;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::PanelState;

/// Selectable list of search results. The selected row's tooltip is shown
/// beneath the list, since terminal rows cannot hover.
pub struct ResultsPanel {
    items: Vec<TreeItem>,
    selected: usize,
    /// Query the current items belong to; `None` before the first search.
    query: Option<String>,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            query: None,
        }
    }

    /// Replace the rows wholesale and reset the selection.
    pub fn set_items(&mut self, query: Option<&str>, items: Vec<TreeItem>) {
        self.items = items;
        self.query = query.map(str::to_string);
        self.selected = 0;
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn selected_item(&self) -> Option<&TreeItem> {
        self.items.get(self.selected)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.query {
            Some(q) => format!(" Hints for {q:?} ({}) ", self.items().len()),
            None => " Hints ".to_string(),
        };

        if self.items.is_empty() {
            let text = if self.query.is_some() {
                "  No hints found"
            } else {
                "  Press / to search for an error message"
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(4)])
            .split(area);

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let line = match item.label.split_once(": ") {
                    Some((error_type, hint)) => Line::from(vec![
                        Span::styled(
                            error_type,
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(": "),
                        Span::raw(hint),
                    ]),
                    None => Line::from(item.label.as_str()),
                };
                ListItem::new(line)
            })
            .collect();

        let list = List::new(rows)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let tooltip = self
            .selected_item()
            .map(|item| item.tooltip.as_str())
            .unwrap_or_default();
        let detail = Paragraph::new(tooltip)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Detail ").borders(Borders::ALL));
        frame.render_widget(detail, chunks[1]);
    }
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState for ResultsPanel {
    fn scroll_down(&mut self, n: usize) {
        let max = self.items.len().saturating_sub(1);
        self.selected = (self.selected + n).min(max);
    }

    fn scroll_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.selected = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }
}
