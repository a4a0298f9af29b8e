use chrono::NaiveDate;
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::input::Action;
use crate::ui::theme::Theme;

#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Refresh,
    Goto(NaiveDate),
    NewEvent(Option<String>),
    ToggleCalendar(String),
    NewCalendar(Option<String>),
    Theme(String),
    Help,
    Error(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(command_text) = trimmed.strip_prefix(':') else {
        return Command::Error("Commands must start with ':'".to_string());
    };
    let parts: Vec<&str> = command_text.split_whitespace().collect();

    let Some(&name) = parts.first() else {
        return Command::Error("Empty command".to_string());
    };
    let rest = (parts.len() > 1).then(|| parts[1..].join(" "));

    match name {
        "q" | "quit" => Command::Quit,
        "w" | "write" | "refresh" => Command::Refresh,
        "help" => Command::Help,
        "goto" => match rest {
            None => Command::Error("goto requires a date argument".to_string()),
            Some(arg) => match NaiveDate::parse_from_str(&arg, "%Y-%m-%d") {
                Ok(date) => Command::Goto(date),
                Err(_) => Command::Error(format!("Invalid date format: {}", arg)),
            },
        },
        "new" => Command::NewEvent(rest),
        "cal" | "calendar" => match rest {
            None => Command::Error("cal requires a calendar name".to_string()),
            Some(name) => Command::ToggleCalendar(name),
        },
        "newcal" => Command::NewCalendar(rest),
        "theme" => match rest {
            None => Command::Error("theme requires a theme name".to_string()),
            Some(name) => Command::Theme(name),
        },
        _ => Command::Error(format!("Unknown command: {}", name)),
    }
}

/// Applies `command` to the state and returns what the session still has to do.
pub fn execute(command: Command, state: &mut AppState) -> Action {
    state.command_buffer.clear();
    state.mode = Mode::Normal;

    match command {
        Command::Quit => return Action::Quit,
        Command::Refresh => return Action::Refresh,
        Command::Goto(date) => {
            state.selected_date = date;
            state.reset_event_selection();
        }
        Command::NewEvent(title) => {
            let date = state.selected_date;
            state.open_create_form(date, title.as_deref().unwrap_or_default());
        }
        Command::ToggleCalendar(name) => match state.find_calendar_by_name(&name).map(|c| c.id) {
            Some(id) => {
                let shown = state.toggle_calendar(id);
                state.status_message = Some(format!(
                    "{} {}",
                    name,
                    if shown { "shown" } else { "hidden" }
                ));
            }
            None => state.status_message = Some(format!("No calendar named {}", name)),
        },
        Command::NewCalendar(name) => state.open_calendar_create(name.as_deref().unwrap_or_default()),
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => state.theme = theme,
            None => {
                state.status_message = Some(format!(
                    "Unknown theme {} (available: {})",
                    name,
                    Theme::available_themes().join(", ")
                ))
            }
        },
        Command::Help => state.show_help = !state.show_help,
        Command::Error(message) => state.status_message = Some(message),
    }
    Action::None
}

pub fn handle_key(key: KeyCode, state: &mut AppState) -> Action {
    match key {
        KeyCode::Enter => {
            let command = parse_command(&state.command_buffer);
            execute(command, state)
        }
        KeyCode::Esc => {
            state.command_buffer.clear();
            state.mode = Mode::Normal;
            Action::None
        }
        KeyCode::Backspace => {
            state.command_buffer.pop();
            if state.command_buffer.is_empty() {
                state.mode = Mode::Normal;
            }
            Action::None
        }
        KeyCode::Char(c) => {
            state.command_buffer.push(c);
            Action::None
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{date, state_with};

    #[test]
    fn parse_quit_command() {
        assert_eq!(parse_command(":q"), Command::Quit);
        assert_eq!(parse_command(":quit"), Command::Quit);
    }

    #[test]
    fn parse_write_and_refresh() {
        assert_eq!(parse_command(":w"), Command::Refresh);
        assert_eq!(parse_command(":refresh"), Command::Refresh);
    }

    #[test]
    fn parse_goto_command_with_date() {
        let cmd = parse_command(":goto 2025-01-15");
        assert_eq!(cmd, Command::Goto(date(2025, 1, 15)));
    }

    #[test]
    fn parse_goto_errors() {
        assert!(matches!(parse_command(":goto invalid"), Command::Error(_)));
        assert!(matches!(parse_command(":goto"), Command::Error(_)));
    }

    #[test]
    fn parse_new_event_with_multiple_words() {
        let cmd = parse_command(":new Sprint planning session");
        assert_eq!(cmd, Command::NewEvent(Some("Sprint planning session".to_string())));
        assert_eq!(parse_command(":new"), Command::NewEvent(None));
    }

    #[test]
    fn parse_calendar_commands() {
        assert_eq!(parse_command(":cal Team Work"), Command::ToggleCalendar("Team Work".to_string()));
        assert_eq!(parse_command(":newcal Gym"), Command::NewCalendar(Some("Gym".to_string())));
        assert!(matches!(parse_command(":cal"), Command::Error(_)));
    }

    #[test]
    fn parse_rejects_unknown_and_malformed() {
        assert!(matches!(parse_command(":unknown"), Command::Error(_)));
        assert!(matches!(parse_command("quit"), Command::Error(_)));
        assert!(matches!(parse_command(":"), Command::Error(_)));
    }

    #[test]
    fn goto_moves_selection_and_returns_to_normal() {
        let mut state = state_with(date(2025, 1, 15), vec![]);
        state.mode = Mode::Command;
        state.command_buffer = ":goto 2025-03-02".to_string();

        let action = handle_key(KeyCode::Enter, &mut state);

        assert_eq!(action, Action::None);
        assert_eq!(state.selected_date, date(2025, 3, 2));
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.command_buffer.is_empty());
    }

    #[test]
    fn cal_toggles_named_calendar() {
        let mut state = state_with(date(2025, 1, 15), vec![]);

        execute(Command::ToggleCalendar("home".to_string()), &mut state);

        assert!(!state.visible.is_visible(2));
        assert_eq!(state.status_message.as_deref(), Some("home hidden"));
    }

    #[test]
    fn new_opens_form_with_title() {
        let mut state = state_with(date(2025, 1, 15), vec![]);

        execute(Command::NewEvent(Some("Standup".to_string())), &mut state);

        assert_eq!(state.event_form.as_ref().map(|f| f.title.as_str()), Some("Standup"));
        assert_eq!(state.mode, Mode::Insert);
    }

    #[test]
    fn theme_switches_or_reports_unknown() {
        let mut state = state_with(date(2025, 1, 15), vec![]);

        execute(Command::Theme("nord".to_string()), &mut state);
        assert_eq!(state.theme.name, "nord");

        execute(Command::Theme("neon".to_string()), &mut state);
        assert_eq!(state.theme.name, "nord");
        assert!(state.status_message.is_some());
    }

    #[test]
    fn quit_and_refresh_are_session_actions() {
        let mut state = state_with(date(2025, 1, 15), vec![]);
        assert_eq!(execute(Command::Quit, &mut state), Action::Quit);
        assert_eq!(execute(Command::Refresh, &mut state), Action::Refresh);
    }
}
