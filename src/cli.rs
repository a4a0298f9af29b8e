use std::{
    env,
    io::{self, Write},
    process::{Command, Stdio},
};

use chrono::{Datelike, Local, NaiveDate};

use planify::{
    calendar::{DayEvent, DayEventIndex, UserCalendar, VisibleCalendars},
    storage::config::Config,
    sync::{AuthContext, CalendarFailure, SyncEngine},
    ui::month_view::build_month_grid,
};

pub const USAGE: &str = "Usage: planify [--agenda [YYYY/MM/DD]] [--month [YYYY-MM]] [--help]";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CliMode {
    Interactive,
    Agenda(NaiveDate),
    /// Year and 1-based month.
    Month(i32, u32),
    Help,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1), Local::now().date_naive())
}

/// `today` fills in omitted dates.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I, today: NaiveDate) -> Result<CliMode, String> {
    let mut mode = CliMode::Interactive;
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        let value = args.next_if(|next| !next.starts_with("--"));
        mode = match arg.as_str() {
            "--agenda" => match value {
                Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                    .map(CliMode::Agenda)
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                None => CliMode::Agenda(today),
            },
            "--month" => match value {
                Some(month_str) => NaiveDate::parse_from_str(&format!("{}-01", month_str), "%Y-%m-%d")
                    .map(|d| CliMode::Month(d.year(), d.month()))
                    .map_err(|_| format!("Invalid month '{}'. Use YYYY-MM.", month_str))?,
                None => CliMode::Month(today.year(), today.month()),
            },
            "--help" | "-h" => return Ok(CliMode::Help),
            _ => return Err(format!("Unknown argument: {}", arg)),
        };
    }

    Ok(mode)
}

fn calendar_name(calendars: &[UserCalendar], calendar_id: i64) -> &str {
    calendars
        .iter()
        .find(|c| c.id == calendar_id)
        .map(|c| c.name.as_str())
        .unwrap_or("?")
}

fn report_failures(failed: &[CalendarFailure]) {
    for failure in failed {
        eprintln!("Could not load calendar {}: {}", failure.name, failure.reason);
    }
}

pub async fn run_agenda_mode(config: Config, auth: AuthContext, date: NaiveDate) -> Result<(), io::Error> {
    let sync_engine = SyncEngine::new(config, auth);

    let agenda = match sync_engine.load_agenda(date).await {
        Ok(agenda) => agenda,
        Err(e) => {
            tracing::error!("Agenda failed: {}", e);
            eprintln!("{}", e.user_message("Failed to fetch events."));
            return Ok(());
        }
    };

    report_failures(&agenda.failed);
    let text = format_agenda_text(date, &agenda.events, &agenda.calendars);
    display_with_pager(&text)
}

pub async fn run_month_mode(config: Config, auth: AuthContext, year: i32, month: u32) -> Result<(), io::Error> {
    let sync_engine = SyncEngine::new(config, auth);

    let calendars = match sync_engine.load_calendars().await {
        Ok(calendars) => calendars,
        Err(e) => {
            tracing::error!("Calendar list failed: {}", e);
            eprintln!("{}", e.user_message("Failed to fetch calendars."));
            return Ok(());
        }
    };
    let visible = VisibleCalendars::all(&calendars);

    match sync_engine.load_month(&calendars, &visible, year, month).await {
        Ok(aggregate) => {
            report_failures(&aggregate.failed);
            print!("{}", format_month_text(year, month, &aggregate.events));
        }
        Err(e) => {
            tracing::error!("Month load failed: {}", e);
            eprintln!("{}", e.user_message("Failed to fetch events."));
        }
    }
    Ok(())
}

fn format_agenda_text(date: NaiveDate, events: &[DayEvent], calendars: &[UserCalendar]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Agenda – {}", date.format("%A, %B %d, %Y")));
    lines.push(String::new());

    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for event in events {
            let name = calendar_name(calendars, event.calendar_id);
            lines.push(format!("- {}", build_agenda_line(event, name, usize::MAX)));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn build_agenda_line(event: &DayEvent, calendar: &str, width: usize) -> String {
    let mut line = format!("{:<13} {} [{}]", event.time_range_label(), event.title, calendar);
    if !event.location.is_empty() {
        line.push_str(&format!(" @ {}", event.location));
    }
    truncate_to_width(&line, width)
}

/// Monday-first grid with each day's event count in parentheses.
fn format_month_text(year: i32, month: u32, events: &DayEventIndex) -> String {
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month));

    let mut out = format!("{:^42}\n", title);
    for name in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
        out.push_str(&format!("{:<6}", name));
    }
    out.push('\n');

    for week in build_month_grid(year, month.saturating_sub(1)) {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => match events.events_on(day.date).len() {
                    0 => format!("{:<6}", format!("{:>2}", day.day)),
                    n => format!("{:<6}", format!("{:>2}({})", day.day, n)),
                },
                None => " ".repeat(6),
            })
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let Some(cmd) = parts.next() else {
        print!("{text}");
        return Ok(());
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(e) => {
            tracing::warn!("Pager {} unavailable: {}", cmd, e);
            print!("{text}");
        }
    }

    Ok(())
}
