use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use planify::app::AppState;

use crate::tui::dialogs::centered;

pub fn render(f: &mut Frame, app: &AppState) {
    let help_height = 23;
    let help_area = centered(f.size(), 62, help_height);

    f.render_widget(Clear, help_area);

    let section = |name: &'static str| {
        Line::from(vec![Span::styled(name, Style::default().fg(app.theme.help_section))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Planify Help", Style::default().fg(app.theme.help_title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        section("Navigation:"),
        Line::from("  h/l      - Previous/next day"),
        Line::from("  j/k      - Navigate events (or week if no events)"),
        Line::from("  t        - Jump to today"),
        Line::from("  g/G      - First/last day of month"),
        Line::from("  { / }    - Previous/next month"),
        Line::from("  m/w      - Month/Week view"),
        Line::from(""),
        section("Schedules:"),
        Line::from("  a        - New schedule on selected day"),
        Line::from("  v        - Select days, then a/Enter for one block per day"),
        Line::from("  E/Enter  - Edit selected time block"),
        Line::from("  x        - Delete selected time block"),
        Line::from(""),
        section("Calendars:"),
        Line::from("  Tab      - Focus next calendar"),
        Line::from("  Space    - Show/hide focused calendar"),
        Line::from("  c / C    - New calendar / edit focused calendar"),
        Line::from("  X        - Delete focused calendar"),
        Line::from(""),
        section("In forms:"),
        Line::from("  Tab/S-Tab - Next/previous field"),
        Line::from("  Left/Right - Pick calendar"),
        Line::from("  Insert   - Add time block"),
        Line::from("  Delete   - Remove block (or delete when editing)"),
        Line::from("  Enter    - Save | Esc - Cancel"),
        Line::from(""),
        section("Commands:"),
        Line::from("  :q       - Quit"),
        Line::from("  :w       - Reload from the server"),
        Line::from("  :goto    - Jump to date (:goto 2025-12-25)"),
        Line::from("  :new     - New schedule (:new Standup)"),
        Line::from("  :cal     - Show/hide calendar (:cal Work)"),
        Line::from("  :newcal  - New calendar (:newcal Gym)"),
        Line::from("  :theme   - Change theme (:theme gruvbox)"),
        Line::from("  :help    - Show this help"),
    ];

    let visible_lines = help_height.saturating_sub(3) as usize;
    let total_lines = help_text.len();
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.help_scroll.min(max_scroll);

    let scrolled_text: Vec<Line> = help_text
        .into_iter()
        .skip(scroll)
        .take(visible_lines)
        .collect();

    let help_paragraph = Paragraph::new(scrolled_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!(" Help (j/k to scroll, q to close) [{}/{}] ", scroll + 1, total_lines))
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}
