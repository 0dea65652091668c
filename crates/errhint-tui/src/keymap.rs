//! Vim-style keybindings for normal mode.
//!
//! Maps key events to actions. Supports single keys and the `gg` sequence.
//! Keys typed while the search prompt is open never reach the mapper.

use crossterm::event::KeyCode;

/// An action the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenPrompt,
    Reload,
    NextPanel,
    PrevPanel,
    GoToPanel(usize),
    ScrollDown,
    ScrollUp,
    HalfPageDown,
    HalfPageUp,
    ScrollToTop,
    ScrollToBottom,
    None,
}

/// Key mapper with support for two-key sequences.
pub struct KeyMapper {
    /// First key of a pending sequence (the first `g` in `gg`).
    pending: Option<KeyCode>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Feed a key code and return the resolved action.
    ///
    /// A key that starts a sequence yields `Action::None` until the next key
    /// arrives. An unknown sequence drops the pending key and resolves the
    /// second key on its own.
    pub fn resolve(&mut self, key: KeyCode) -> Action {
        if let Some(prev) = self.pending.take() {
            return self.resolve_sequence(prev, key);
        }

        match key {
            KeyCode::Char('q') => Action::Quit,

            KeyCode::Char('/') | KeyCode::Char('s') => Action::OpenPrompt,
            KeyCode::Char('r') => Action::Reload,

            // Panel switching
            KeyCode::Tab | KeyCode::Char('l') => Action::NextPanel,
            KeyCode::BackTab | KeyCode::Char('h') => Action::PrevPanel,
            KeyCode::Char('1') => Action::GoToPanel(0),
            KeyCode::Char('2') => Action::GoToPanel(1),
            KeyCode::Char('3') => Action::GoToPanel(2),

            // Vim scrolling
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('d') | KeyCode::PageDown => Action::HalfPageDown,
            KeyCode::Char('u') | KeyCode::PageUp => Action::HalfPageUp,
            KeyCode::Char('G') | KeyCode::End => Action::ScrollToBottom,
            KeyCode::Home => Action::ScrollToTop,

            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }

            _ => Action::None,
        }
    }

    fn resolve_sequence(&mut self, first: KeyCode, second: KeyCode) -> Action {
        match (first, second) {
            (KeyCode::Char('g'), KeyCode::Char('g')) => Action::ScrollToTop,
            _ => self.resolve(second),
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keys() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('q')), Action::Quit);
        assert_eq!(km.resolve(KeyCode::Char('j')), Action::ScrollDown);
        assert_eq!(km.resolve(KeyCode::Char('k')), Action::ScrollUp);
        assert_eq!(km.resolve(KeyCode::Char('G')), Action::ScrollToBottom);
        assert_eq!(km.resolve(KeyCode::Tab), Action::NextPanel);
        assert_eq!(km.resolve(KeyCode::BackTab), Action::PrevPanel);
    }

    #[test]
    fn test_prompt_and_reload_keys() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('/')), Action::OpenPrompt);
        assert_eq!(km.resolve(KeyCode::Char('s')), Action::OpenPrompt);
        assert_eq!(km.resolve(KeyCode::Char('r')), Action::Reload);
    }

    #[test]
    fn test_gg_sequence() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::None);
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::ScrollToTop);
    }

    #[test]
    fn test_invalid_sequence_falls_through() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('g')), Action::None);
        assert_eq!(km.resolve(KeyCode::Char('/')), Action::OpenPrompt);
    }

    #[test]
    fn test_number_panels() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(KeyCode::Char('1')), Action::GoToPanel(0));
        assert_eq!(km.resolve(KeyCode::Char('2')), Action::GoToPanel(1));
        assert_eq!(km.resolve(KeyCode::Char('3')), Action::GoToPanel(2));
        assert_eq!(km.resolve(KeyCode::Char('4')), Action::None);
    }
}
