use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use planify::app::{AppState, Mode, SyncStatus, ViewType};
use crate::tui::{calendar_views, dialogs};

fn status_line(app: &AppState) -> (String, ratatui::style::Color) {
    if matches!(app.mode, Mode::Command) {
        return (app.command_buffer.clone(), app.theme.command_mode);
    }

    let (sync, color) = match &app.sync_status {
        SyncStatus::Synced => ("Synced".to_string(), app.theme.success),
        SyncStatus::Syncing => ("Syncing...".to_string(), app.theme.warning),
        SyncStatus::Partial(summary) => (summary.clone(), app.theme.warning),
        SyncStatus::Error(message) => (message.clone(), app.theme.error),
    };

    let text = match &app.status_message {
        Some(message) => format!("{} | {}", message, sync),
        None => format!("Events: {} | {} | Press 'q' to quit, '?' for help", app.events.len(), sync),
    };
    let color = if matches!(app.sync_status, SyncStatus::Synced) { app.theme.status_bar } else { color };
    (text, color)
}

pub fn ui(f: &mut Frame, app: &AppState) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .split(main_chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(app.calendars.len().max(1) as u16 + 2),
        ])
        .split(content_chunks[1]);

    let title_text = format!("Planify - {} View - {:?} Mode",
        match app.view {
            ViewType::Month => "Month",
            ViewType::Week => "Week",
        },
        app.mode
    );

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    match app.view {
        ViewType::Month => calendar_views::month::render(f, app, content_chunks[0]),
        ViewType::Week => calendar_views::week::render(f, app, content_chunks[0]),
    }

    calendar_views::event_list::render(f, app, sidebar_chunks[0]);
    calendar_views::calendar_list::render(f, app, sidebar_chunks[1]);

    let (status_text, status_color) = status_line(app);
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(if matches!(app.mode, Mode::Command) { Alignment::Left } else { Alignment::Center })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, main_chunks[2]);

    if app.event_form.is_some() {
        dialogs::event_form::render(f, app);
    }

    if app.calendar_form.is_some() {
        dialogs::calendar_form::render(f, app);
    }

    if app.pending_deletion.is_some() {
        dialogs::delete_confirmation::render(f, app);
    }

    if app.show_help {
        dialogs::help::render(f, app);
    }
}
