use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::input::Action;

pub fn handle_key(key: KeyCode, state: &mut AppState) -> Action {
    if state.pending_deletion.is_none() {
        state.mode = Mode::Normal;
        return Action::None;
    }

    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmDelete,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.close_dialogs();
            Action::None
        }
        _ => Action::None,
    }
}
