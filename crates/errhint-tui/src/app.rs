//! Core TUI application state and event handling.

use crossterm::event::KeyCode;
use errhint_core::{DiagnosticsReader, ErrorHintProvider, ResultsChanged, SearchOutcome};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::keymap::{Action, KeyMapper};
use crate::panels::{CatalogPanel, LogsPanel, PanelState, ResultsPanel};

/// The panels available in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Results,
    Catalog,
    Logs,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::Results => "Results",
            Panel::Catalog => "Catalog",
            Panel::Logs => "Logs",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Panel::Results => Panel::Catalog,
            Panel::Catalog => Panel::Logs,
            Panel::Logs => Panel::Results,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Results => Panel::Logs,
            Panel::Catalog => Panel::Results,
            Panel::Logs => Panel::Catalog,
        }
    }
}

const ALL_PANELS: [Panel; 3] = [Panel::Results, Panel::Catalog, Panel::Logs];

/// Whether keys drive navigation or edit the search prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompt,
}

/// TUI application state.
pub struct App {
    /// Whether the application should quit.
    pub should_quit: bool,

    /// Currently selected panel.
    pub active_panel: Panel,

    pub mode: Mode,

    /// Text typed into the search prompt.
    pub input: String,

    /// Feedback from the last search or reload.
    pub status_message: String,

    keymap: KeyMapper,
    provider: ErrorHintProvider,
    changes: broadcast::Receiver<ResultsChanged>,

    pub results: ResultsPanel,
    pub catalog_panel: CatalogPanel,
    pub logs: LogsPanel,
}

impl App {
    /// Create the app around a provider. The app listens for the provider's
    /// results-changed events and redraws the results panel from them.
    pub fn new(provider: ErrorHintProvider, log_reader: DiagnosticsReader) -> Self {
        let changes = provider.engine().changes();
        Self {
            should_quit: false,
            active_panel: Panel::Results,
            mode: Mode::Normal,
            input: String::new(),
            status_message: String::new(),
            keymap: KeyMapper::new(),
            provider,
            changes,
            results: ResultsPanel::new(),
            catalog_panel: CatalogPanel::new(),
            logs: LogsPanel::new(log_reader),
        }
    }

    /// Route a key press to the prompt or to the key mapper.
    pub fn handle_key(&mut self, key: KeyCode) {
        match self.mode {
            Mode::Prompt => self.handle_prompt_key(key),
            Mode::Normal => {
                let action = self.keymap.resolve(key);
                self.handle_action(action);
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let message = std::mem::take(&mut self.input);
                self.submit(&message);
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Process a resolved action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::OpenPrompt => {
                self.mode = Mode::Prompt;
                self.input.clear();
            }
            Action::Reload => self.reload(),
            Action::NextPanel => self.active_panel = self.active_panel.next(),
            Action::PrevPanel => self.active_panel = self.active_panel.prev(),
            Action::GoToPanel(n) => {
                if let Some(&panel) = ALL_PANELS.get(n) {
                    self.active_panel = panel;
                }
            }
            Action::ScrollDown => self.active_panel_state_mut().scroll_down(1),
            Action::ScrollUp => self.active_panel_state_mut().scroll_up(1),
            Action::HalfPageDown => self.active_panel_state_mut().scroll_down(10),
            Action::HalfPageUp => self.active_panel_state_mut().scroll_up(10),
            Action::ScrollToTop => self.active_panel_state_mut().scroll_to_top(),
            Action::ScrollToBottom => self.active_panel_state_mut().scroll_to_bottom(),
            Action::None => {}
        }
    }

    /// Run a search for `message`. Results arrive through the change channel
    /// on the next [`tick`](App::tick).
    pub fn submit(&mut self, message: &str) {
        self.active_panel = Panel::Results;
        self.status_message = match self.provider.search_error(message) {
            Ok(SearchOutcome::Skipped) => "Enter an error message to search for".to_string(),
            Ok(SearchOutcome::Searched { matches: 0 }) => {
                format!("No hints found for {message:?}")
            }
            Ok(SearchOutcome::Searched { matches }) => {
                format!("{matches} hint(s) for {message:?}")
            }
            Err(e) => {
                warn!(error = %e, "Hint search failed");
                format!("could not load hints: {e}")
            }
        };
        self.catalog_panel.update(self.provider.engine().catalog());
    }

    fn reload(&mut self) {
        self.status_message = match self.provider.engine_mut().reload() {
            Ok(count) => format!("Catalog reloaded ({count} hints)"),
            Err(e) => {
                warn!(error = %e, "Catalog reload failed");
                format!("could not reload hints: {e}")
            }
        };
        self.catalog_panel.update(self.provider.engine().catalog());
    }

    /// Tick: apply pending results-changed events and refresh the log view.
    pub fn tick(&mut self) {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(ResultsChanged) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            let items = self
                .provider
                .children(None)
                .iter()
                .map(|node| self.provider.tree_item(node))
                .collect();
            self.results
                .set_items(self.provider.engine().last_query(), items);
        }
        self.logs.refresh();
    }

    fn active_panel_state_mut(&mut self) -> &mut dyn PanelState {
        match self.active_panel {
            Panel::Results => &mut self.results,
            Panel::Catalog => &mut self.catalog_panel,
            Panel::Logs => &mut self.logs,
        }
    }

    /// Get the status line text.
    pub fn status_line(&self) -> String {
        let keys = match self.mode {
            Mode::Normal => {
                " q:quit  /:search  r:reload  Tab:next  j/k:scroll  g/G:top/bottom  1-3:panels"
            }
            Mode::Prompt => " Enter:search  Esc:cancel",
        };
        format!("{keys}  [{}]", self.active_panel.title())
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // prompt
                Constraint::Min(1),    // active panel
                Constraint::Length(2), // status
            ])
            .split(frame.area());

        let (prompt_text, prompt_style) = match self.mode {
            Mode::Prompt => (
                format!("{}_", self.input),
                Style::default().fg(Color::White),
            ),
            Mode::Normal => (
                "Enter the error message (press /)".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        };
        let prompt = Paragraph::new(prompt_text)
            .style(prompt_style)
            .block(Block::default().title(" Search ").borders(Borders::ALL));
        frame.render_widget(prompt, chunks[0]);

        match self.active_panel {
            Panel::Results => self.results.render(frame, chunks[1]),
            Panel::Catalog => self.catalog_panel.render(frame, chunks[1]),
            Panel::Logs => self.logs.render(frame, chunks[1]),
        }

        let status = Paragraph::new(vec![
            Line::from(Span::styled(
                self.status_message.as_str(),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(
                self.status_line(),
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(status, chunks[2]);
    }
}
