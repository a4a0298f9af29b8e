use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use planify::app::AppState;

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let mut lines = Vec::new();

    if app.calendars.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("No calendars yet (c to create)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    for (idx, calendar) in app.calendars.iter().enumerate() {
        let visible = app.visible.is_visible(calendar.id);
        let failed = app.failed_calendars.iter().any(|f| f.calendar_id == calendar.id);
        let focused = idx == app.focused_calendar;

        let checkbox = if visible { "[x] " } else { "[ ] " };
        let mut name_style = if visible {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(app.theme.inactive_day)
        };
        if focused {
            name_style = name_style.bg(app.theme.selected_bg).add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::raw(if focused { ">" } else { " " }),
            Span::raw(checkbox),
            Span::styled("■ ", Style::default().fg(app.theme.calendar_color(Some(&calendar.color)))),
            Span::styled(calendar.name.as_str(), name_style),
        ];
        if failed {
            spans.push(Span::styled(" (!)", Style::default().fg(app.theme.warning)));
        }
        lines.push(Line::from(spans));
    }

    let content = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Calendars (Tab/Space) "),
    );
    f.render_widget(content, area);
}
