use chrono::Days;
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::input::Action;

pub fn handle_key(key: KeyCode, state: &mut AppState) -> Action {
    match key {
        KeyCode::Char('h') => extend(state, -1),
        KeyCode::Char('l') => extend(state, 1),
        KeyCode::Char('j') => extend(state, 7),
        KeyCode::Char('k') => extend(state, -7),
        KeyCode::Char('a') | KeyCode::Enter => {
            if let Some((start, end)) = state.get_visual_selection_range() {
                state.visual_selection_start = None;
                state.open_range_form(start, end);
            }
        }
        KeyCode::Esc => {
            state.visual_selection_start = None;
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    Action::None
}

fn extend(state: &mut AppState, days: i64) {
    let moved = if days >= 0 {
        state.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        state.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    if let Some(date) = moved {
        state.selected_date = date;
    }
}
