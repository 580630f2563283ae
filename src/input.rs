//! Key bindings: arrows, WASD and vim-style hjkl.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Confirm,
    Pause,
    Quit,
    None,
}

impl Action {
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            Self::MoveLeft | Self::MoveRight | Self::MoveUp | Self::MoveDown
        )
    }
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::Pause,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Action::MoveDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        _ => Action::None,
    }
}
