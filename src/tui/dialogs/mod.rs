pub mod calendar_form;
pub mod delete_confirmation;
pub mod event_form;
pub mod help;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};

/// A `width` x `height` box centred in `area`, shrunk to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub(crate) fn field_line<'a>(label: &'a str, value: &'a str, active: bool, active_color: Color) -> Line<'a> {
    let label_color = if active { active_color } else { Color::DarkGray };
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
        Span::styled(label, Style::default().fg(label_color)),
        Span::raw(value),
        Span::styled(cursor, Style::default().fg(active_color)),
    ])
}

pub(crate) fn footer<'a>(saving: bool, error: Option<&'a str>, error_color: Color) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(error_color))));
    }
    if saving {
        lines.push(Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow))));
    }
    lines
}
