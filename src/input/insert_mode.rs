use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::forms::FormField;
use crate::input::Action;

/// Keys for whichever form is open. The calendar form takes precedence since
/// it can only be opened from normal mode.
pub fn handle_key(key: KeyCode, state: &mut AppState) -> Action {
    if state.calendar_form.is_some() {
        handle_calendar_form_key(key, state)
    } else if state.event_form.is_some() {
        handle_event_form_key(key, state)
    } else {
        state.mode = Mode::Normal;
        Action::None
    }
}

fn handle_event_form_key(key: KeyCode, state: &mut AppState) -> Action {
    let today = state.today;
    let Some(form) = state.event_form.as_mut() else {
        return Action::None;
    };

    match key {
        KeyCode::Esc => {
            state.close_dialogs();
        }
        KeyCode::Enter => return Action::SubmitEventForm,
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Insert => {
            form.add_block(today);
        }
        KeyCode::Delete => {
            if let Some(target) = form.delete_target() {
                state.event_form = None;
                state.open_delete(target);
            } else if let Some(index) = form.active_block() {
                form.remove_block(index);
            }
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.active_field == FormField::Calendar => {
            form.cycle_calendar(key != KeyCode::Left);
        }
        KeyCode::Backspace => {
            if let Some(text) = form.active_text_mut() {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = form.active_text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
    Action::None
}

fn handle_calendar_form_key(key: KeyCode, state: &mut AppState) -> Action {
    let Some(form) = state.calendar_form.as_mut() else {
        return Action::None;
    };

    match key {
        KeyCode::Esc => state.close_dialogs(),
        KeyCode::Enter => return Action::SubmitCalendarForm,
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Delete => {
            if let Some(target) = form.delete_target() {
                state.calendar_form = None;
                state.open_delete(target);
            }
        }
        KeyCode::Backspace => {
            form.active_text_mut().pop();
        }
        KeyCode::Char(c) => form.active_text_mut().push(c),
        _ => {}
    }
    Action::None
}
