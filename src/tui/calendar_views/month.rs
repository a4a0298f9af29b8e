use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use chrono::NaiveDate;
use planify::{
    app::{AppState, Mode},
    ui::month_view::{self, DayCell, MAX_MARKERS},
};

use crate::tui::calendar_views::fit;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn day_style(app: &AppState, cell: &DayCell) -> Style {
    let style = Style::default();
    if cell.in_visual_selection {
        style.bg(Color::DarkGray).fg(Color::White).add_modifier(Modifier::BOLD)
    } else if cell.is_selected {
        style.bg(app.theme.selected_bg).fg(app.theme.selected_fg).add_modifier(Modifier::BOLD)
    } else if cell.is_today {
        style.fg(app.theme.today).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn calendar_color(app: &AppState, calendar_id: i64) -> Color {
    app.theme
        .calendar_color(app.calendar(calendar_id).map(|c| c.color.as_str()))
}

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let layout = month_view::calculate_layout(app);

    let month_name = NaiveDate::from_ymd_opt(layout.year, layout.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", layout.year, layout.month));

    let cell_width = (area.width.saturating_sub(2) / 7).max(5) as usize;

    // Rows left for the grid after borders, title, header and hint line.
    let grid_rows = area.height.saturating_sub(7) as usize;
    let rows_per_week = grid_rows / layout.weeks.len().max(1);
    let marker_rows = rows_per_week.saturating_sub(1).min(MAX_MARKERS);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(month_name, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(
            WEEKDAYS
                .iter()
                .map(|name| Span::styled(fit(&format!(" {}", name), cell_width), Style::default().fg(app.theme.weekday_header)))
                .collect::<Vec<_>>(),
        ),
    ];

    for week in &layout.weeks {
        let mut day_spans = Vec::new();
        for cell in &week.days {
            let Some(day) = cell.day else {
                day_spans.push(Span::styled(fit("", cell_width), Style::default().fg(app.theme.inactive_day)));
                continue;
            };
            let (shown, hidden) = cell.markers();
            let hidden = hidden + shown.len().saturating_sub(marker_rows);
            let label = if hidden > 0 {
                format!(" {:>2} +{}", day.day, hidden)
            } else {
                format!(" {:>2}", day.day)
            };
            day_spans.push(Span::styled(fit(&label, cell_width), day_style(app, cell)));
        }
        lines.push(Line::from(day_spans));

        for row in 0..marker_rows {
            let spans: Vec<Span> = week
                .days
                .iter()
                .map(|cell| match cell.markers().0.get(row) {
                    Some(event) => Span::styled(
                        fit(&format!(" ■{}", event.title), cell_width),
                        Style::default().fg(calendar_color(app, event.calendar_id)),
                    ),
                    None => Span::raw(fit("", cell_width)),
                })
                .collect();
            lines.push(Line::from(spans));
        }
    }

    lines.push(Line::from(""));

    if app.mode == Mode::Visual {
        if let Some((start, end)) = app.get_visual_selection_range() {
            let days = (end - start).num_days() + 1;
            lines.push(Line::from(vec![
                Span::styled("VISUAL ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
                Span::styled(format!("({} day{})", days, if days == 1 { "" } else { "s" }), Style::default().fg(Color::Yellow)),
                Span::raw(" | "),
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" = Schedule each day | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" = Cancel"),
            ]));
        }
    } else {
        lines.push(Line::from(vec![
            Span::styled("hjkl", Style::default().fg(Color::Cyan)),
            Span::raw(" = Navigate | "),
            Span::styled("a", Style::default().fg(Color::Green)),
            Span::raw(" = Add | "),
            Span::styled("v", Style::default().fg(Color::Magenta)),
            Span::raw(" = Visual | "),
            Span::styled("w", Style::default().fg(Color::Cyan)),
            Span::raw(" = Week view"),
        ]));
    }

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}
