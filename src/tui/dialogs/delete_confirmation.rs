use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use planify::app::AppState;
use planify::forms::FormPhase;

use crate::tui::dialogs::{centered, footer};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(pending) = &app.pending_deletion else {
        return;
    };

    let dialog_area = centered(f.size(), 60, 11);
    f.render_widget(Clear, dialog_area);

    let heading = if pending.removes_calendar() { "Delete Calendar?" } else { "Delete Time Block?" };

    let mut dialog_text = vec![
        Line::from(vec![Span::styled(heading, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![Span::styled(
            pending.target.prompt(),
            Style::default().fg(Color::Yellow),
        )]),
        Line::from(""),
        Line::from("This action cannot be undone."),
        Line::from(""),
    ];
    dialog_text.extend(footer(
        pending.phase == FormPhase::Submitting,
        pending.error.as_deref(),
        app.theme.error,
    ));
    dialog_text.push(Line::from(vec![
        Span::styled("Y", Style::default().fg(Color::Green)),
        Span::raw(" = Yes, delete | "),
        Span::styled("N", Style::default().fg(Color::Red)),
        Span::raw(" = No, cancel"),
    ]));

    let dialog_paragraph = Paragraph::new(dialog_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Delete ")
            .style(Style::default().bg(Color::Black)))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(dialog_paragraph, dialog_area);
}
