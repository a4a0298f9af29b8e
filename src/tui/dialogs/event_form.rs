use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use planify::app::AppState;
use planify::forms::FormField;

use crate::tui::dialogs::{centered, field_line, footer};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(form) = &app.event_form else {
        return;
    };

    let form_height = 16 + 2 * form.blocks.len() as u16;
    let form_area = centered(f.size(), 72, form_height);

    f.render_widget(Clear, form_area);

    let active_color = app.theme.selected_bg;
    let is_active = |field: FormField| form.active_field == field;

    let calendar_name = form
        .calendar_id
        .and_then(|id| app.calendar(id))
        .map(|c| c.name.as_str())
        .unwrap_or("(none)");
    let calendar_color = app.theme.calendar_color(
        form.calendar_id.and_then(|id| app.calendar(id)).map(|c| c.color.as_str()),
    );
    let picker_hint = if form.calendar_locked() { "" } else { "  < Left/Right >" };

    let form_title = if form.is_editing() { "Edit Schedule" } else { "New Schedule" };

    let mut form_text = vec![
        Line::from(vec![Span::styled(form_title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Calendar: ",
                Style::default().fg(if is_active(FormField::Calendar) { active_color } else { Color::DarkGray }),
            ),
            Span::styled("■ ", Style::default().fg(calendar_color)),
            Span::raw(calendar_name),
            Span::styled(picker_hint, Style::default().fg(Color::DarkGray)),
        ]),
        field_line("Title: ", &form.title, is_active(FormField::Title), active_color),
        field_line("Description: ", &form.description, is_active(FormField::Description), active_color),
        field_line("Location: ", &form.location, is_active(FormField::Location), active_color),
        Line::from(""),
        Line::from(vec![Span::styled("Time blocks:", Style::default().fg(app.theme.help_section))]),
    ];

    for (i, block) in form.blocks.iter().enumerate() {
        let saved = if form.is_block_saved(i) { " (saved)" } else { "" };
        form_text.push(Line::from(vec![Span::styled(
            format!("  #{}{}", i + 1, saved),
            Style::default().fg(Color::Gray),
        )]));
        let mut line = field_line("    Date: ", &block.date, is_active(FormField::BlockDate(i)), active_color);
        line.spans.extend(field_line("  Start: ", &block.start, is_active(FormField::BlockStart(i)), active_color).spans);
        line.spans.extend(field_line("  End: ", &block.end, is_active(FormField::BlockEnd(i)), active_color).spans);
        form_text.push(line);
    }

    form_text.push(Line::from(""));
    form_text.extend(footer(form.is_submitting(), form.error.as_deref(), app.theme.error));

    let delete_hint = if form.is_editing() { " = Delete block | " } else { " = Remove block | " };
    let mut keys = vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(" = Next field | "),
    ];
    if !form.is_editing() {
        keys.push(Span::styled("Ins", Style::default().fg(Color::Cyan)));
        keys.push(Span::raw(" = Add block | "));
    }
    keys.extend([
        Span::styled("Del", Style::default().fg(Color::Cyan)),
        Span::raw(delete_hint),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" = Save | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" = Cancel"),
    ]);
    form_text.push(Line::from(keys));

    let block_title = if form.is_editing() { " Edit Schedule " } else { " New Schedule " };

    let form_paragraph = Paragraph::new(form_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(block_title)
            .style(Style::default().bg(Color::Black)))
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    f.render_widget(form_paragraph, form_area);
}
