use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use planify::app::AppState;

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let events = app.visible_events_on(app.selected_date);

    let title = format!("Schedule for {}", app.selected_date.format("%A, %B %d"));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    if events.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Nothing scheduled", Style::default().fg(Color::DarkGray)),
        ]));
    } else {
        let selected_base = Style::default().bg(app.theme.selected_bg).add_modifier(Modifier::BOLD);

        for (idx, event) in events.iter().enumerate() {
            let is_selected = idx == app.selected_event_index;
            let calendar = app.calendar(event.calendar_id);
            let marker_color = app.theme.calendar_color(calendar.map(|c| c.color.as_str()));

            let (time_style, title_style) = if is_selected {
                (selected_base.fg(app.theme.selected_fg), selected_base.fg(app.theme.selected_fg))
            } else {
                (Style::default().fg(Color::Green), Style::default().fg(Color::White))
            };

            let cursor = if is_selected { ">" } else { " " };

            lines.push(Line::from(vec![
                Span::styled(cursor, Style::default().fg(app.theme.selected_bg)),
                Span::styled("■ ", Style::default().fg(marker_color)),
                Span::styled(event.time_range_label(), time_style),
                Span::raw(" "),
                Span::styled(event.title.as_str(), title_style),
            ]));

            let mut details = Vec::new();
            if let Some(calendar) = calendar {
                details.push(calendar.name.clone());
            }
            if !event.location.is_empty() {
                details.push(format!("@ {}", event.location));
            }
            if !details.is_empty() {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(details.join("  "), Style::default().fg(Color::DarkGray)),
                ]));
            }
            if is_selected && !event.description.is_empty() {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(event.description.as_str(), Style::default().fg(Color::Gray)),
                ]));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Cyan)),
            Span::raw(" = Navigate | "),
            Span::styled("E", Style::default().fg(Color::Green)),
            Span::raw(" = Edit | "),
            Span::styled("x", Style::default().fg(Color::Red)),
            Span::raw(" = Delete"),
        ]));
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}
