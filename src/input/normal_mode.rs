use chrono::{Datelike, Days, Months, NaiveDate};
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode, ViewType};
use crate::input::Action;

pub fn handle_key(key: KeyCode, state: &mut AppState) -> Action {
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('r') => return Action::Refresh,
        KeyCode::Char('h') => move_days(state, -1),
        KeyCode::Char('l') => move_days(state, 1),
        KeyCode::Char('j') => {
            if !state.move_event_selection_down() && !has_events_on_selected_date(state) {
                move_days(state, 7);
            }
        }
        KeyCode::Char('k') => {
            if !state.move_event_selection_up() && !has_events_on_selected_date(state) {
                move_days(state, -7);
            }
        }
        KeyCode::Char('t') => {
            let today = state.today;
            jump_to(state, today);
        }
        KeyCode::Char('g') => jump_to_first_of_month(state),
        KeyCode::Char('G') => jump_to_end_of_month(state),
        KeyCode::Char('{') => move_months(state, false),
        KeyCode::Char('}') => move_months(state, true),
        KeyCode::Char('m') => state.view = ViewType::Month,
        KeyCode::Char('w') => state.view = ViewType::Week,
        KeyCode::Char('a') => {
            let date = state.selected_date;
            state.open_create_form(date, "");
        }
        KeyCode::Char('E') | KeyCode::Enter => {
            if !state.open_edit_form() {
                state.status_message = Some("No event selected".to_string());
            }
        }
        KeyCode::Char('x') => {
            state.open_delete_selected_block();
        }
        KeyCode::Char('v') => {
            state.visual_selection_start = Some(state.selected_date);
            state.mode = Mode::Visual;
        }
        KeyCode::Tab => state.focus_next_calendar(),
        KeyCode::Char(' ') => {
            if state.toggle_focused_calendar().is_none() {
                state.status_message = Some("No calendars loaded".to_string());
            }
        }
        KeyCode::Char('c') => state.open_calendar_create(""),
        KeyCode::Char('C') => {
            state.open_calendar_edit();
        }
        KeyCode::Char('X') => {
            state.open_delete_focused_calendar();
        }
        KeyCode::Char(':') => {
            state.mode = Mode::Command;
            state.command_buffer = ":".to_string();
        }
        KeyCode::Char('?') => state.show_help = true,
        _ => {}
    }
    Action::None
}

fn has_events_on_selected_date(state: &AppState) -> bool {
    !state.visible_events_on(state.selected_date).is_empty()
}

fn jump_to(state: &mut AppState, date: NaiveDate) {
    state.selected_date = date;
    state.reset_event_selection();
}

fn move_days(state: &mut AppState, days: i64) {
    let moved = if days >= 0 {
        state.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        state.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    if let Some(date) = moved {
        jump_to(state, date);
    }
}

fn jump_to_first_of_month(state: &mut AppState) {
    if let Some(first) = state.selected_date.with_day(1) {
        jump_to(state, first);
    }
}

fn jump_to_end_of_month(state: &mut AppState) {
    if let Some(first) = state.selected_date.with_day(1)
        && let Some(next_first) = first.checked_add_months(Months::new(1))
        && let Some(last) = next_first.pred_opt()
    {
        jump_to(state, last);
    }
}

/// Same day of month in the adjacent month, clamped to its length.
fn move_months(state: &mut AppState, forward: bool) {
    let moved = if forward {
        state.selected_date.checked_add_months(Months::new(1))
    } else {
        state.selected_date.checked_sub_months(Months::new(1))
    };
    if let Some(date) = moved {
        jump_to(state, date);
    }
}
