use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use planify::app::AppState;
use planify::forms::{CalendarField, FormPhase};

use crate::tui::dialogs::{centered, field_line, footer};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(form) = &app.calendar_form else {
        return;
    };

    let form_area = centered(f.size(), 60, 14);
    f.render_widget(Clear, form_area);

    let active_color = app.theme.selected_bg;
    let title = if form.is_editing() { "Edit Calendar" } else { "New Calendar" };

    let mut color_line = field_line("Color: ", &form.color, form.active_field == CalendarField::Color, active_color);
    color_line.spans.push(Span::styled(
        "  ■",
        Style::default().fg(app.theme.calendar_color(Some(&form.color))),
    ));

    let mut form_text = vec![
        Line::from(vec![Span::styled(title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        field_line("Name: ", &form.name, form.active_field == CalendarField::Name, active_color),
        field_line("Description: ", &form.description, form.active_field == CalendarField::Description, active_color),
        color_line,
        Line::from(""),
    ];
    form_text.extend(footer(form.phase == FormPhase::Submitting, form.error.as_deref(), app.theme.error));

    let mut keys = vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(" = Next field | "),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" = Save | "),
    ];
    if form.is_editing() {
        keys.push(Span::styled("Del", Style::default().fg(Color::Red)));
        keys.push(Span::raw(" = Delete | "));
    }
    keys.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    keys.push(Span::raw(" = Cancel"));
    form_text.push(Line::from(keys));

    let form_paragraph = Paragraph::new(form_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(form_paragraph, form_area);
}
