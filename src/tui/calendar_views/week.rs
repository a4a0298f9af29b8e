use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use chrono::Datelike;
use planify::{
    app::AppState,
    ui::week_view::{self, DayColumn, EventBlock},
};

use crate::tui::calendar_views::fit;

const TIME_GUTTER: usize = 6;

/// The block covering grid row `row`, and whether `row` is its first row.
fn block_at(column: &DayColumn, row: f64) -> Option<(&EventBlock, bool)> {
    column.blocks.iter().find_map(|block| {
        let top = block.position.top;
        let bottom = top + block.position.height.max(1.0);
        (row + 1.0 > top && row < bottom).then(|| (block, row <= top.max(0.0)))
    })
}

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let layout = week_view::calculate_layout(app);
    let geometry = &layout.geometry;

    let week_range = match layout.days.last() {
        Some(last_day) => format!("{} - {}",
            layout.week_start.format("%b %d"),
            last_day.date.format("%b %d, %Y")),
        None => layout.week_start.format("%b %d, %Y").to_string(),
    };

    let column_width = ((area.width as usize).saturating_sub(2 + TIME_GUTTER) / 7).max(4);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(week_range, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    let mut header_spans = vec![Span::raw(fit("", TIME_GUTTER))];
    for day in &layout.days {
        let day_str = format!(" {} {}", day.date.format("%a"), day.date.day());

        let style = if app.is_date_in_visual_selection(day.date) {
            Style::default().bg(Color::DarkGray).fg(Color::White).add_modifier(Modifier::BOLD)
        } else if day.is_selected {
            Style::default().bg(app.theme.selected_bg).fg(app.theme.selected_fg)
        } else if day.is_today {
            Style::default().fg(app.theme.today).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.weekday_header)
        };

        header_spans.push(Span::styled(fit(&day_str, column_width), style));
    }
    lines.push(Line::from(header_spans));

    let rows = geometry.column_height().ceil() as usize;
    let rows_per_hour = geometry.slot_height.max(1.0) as usize;

    for row in 0..rows {
        let gutter = if row % rows_per_hour == 0 {
            format!("{:02}:00 ", geometry.day_start_hour as usize + row / rows_per_hour)
        } else {
            String::new()
        };
        let mut line_spans = vec![Span::styled(fit(&gutter, TIME_GUTTER), Style::default().fg(app.theme.hour_grid))];

        for day in &layout.days {
            let span = match block_at(day, row as f64) {
                Some((block, first_row)) => {
                    let calendar_color = app
                        .theme
                        .calendar_color(app.calendar(block.event.calendar_id).map(|c| c.color.as_str()));
                    let mut style = Style::default().bg(calendar_color).fg(Color::Black);
                    if block.is_selected {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    let text = if first_row {
                        format!("{} {}", block.event.start_time.format("%H:%M"), block.event.title)
                    } else {
                        String::new()
                    };
                    Span::styled(fit(&text, column_width.saturating_sub(1)), style)
                }
                None => Span::styled(
                    fit(if row % rows_per_hour == 0 { "·" } else { "" }, column_width.saturating_sub(1)),
                    Style::default().fg(app.theme.hour_grid),
                ),
            };
            line_spans.push(span);
            line_spans.push(Span::raw(" "));
        }

        lines.push(Line::from(line_spans));
    }

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}
