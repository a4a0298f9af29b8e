use std::io;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use planify::{
    app::{AppState, Mode, SyncStatus, ViewType},
    input::{Action, command_mode, confirm_mode, insert_mode, normal_mode, visual_mode},
    storage::config::Config,
    sync::{AuthContext, SyncEngine, SyncError},
    ui::theme::Theme,
};
use crate::tui::presentation::ui;

pub async fn run_tui(config: Config, auth: AuthContext) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::get_by_name(&config.ui.theme);
    let view = ViewType::from_name(&config.ui.default_view).unwrap_or_else(|| {
        tracing::warn!("Unknown default view {:?}, using month", config.ui.default_view);
        ViewType::Month
    });
    let mut app = AppState::new()
        .with_theme(theme)
        .with_week_config(config.week.clone())
        .with_view(view);

    let sync_engine = SyncEngine::new(config, auth);

    let res = run_app(&mut terminal, &mut app, &sync_engine).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    sync_engine: &SyncEngine,
) -> io::Result<()> {
    loop {
        sync_if_needed(terminal, app, sync_engine).await?;

        terminal.draw(|f| ui(f, app))?;

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = if app.show_help {
                handle_help_keys(key.code, app);
                Action::None
            } else {
                app.status_message = None;
                match app.mode {
                    Mode::Normal => normal_mode::handle_key(key.code, app),
                    Mode::Insert => insert_mode::handle_key(key.code, app),
                    Mode::Visual => visual_mode::handle_key(key.code, app),
                    Mode::Command => command_mode::handle_key(key.code, app),
                    Mode::Confirm => confirm_mode::handle_key(key.code, app),
                }
            };

            if perform(action, terminal, app, sync_engine).await? {
                return Ok(());
            }
        }
    }
}

fn handle_help_keys(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Char('j') => {
            app.help_scroll = app.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc => {
            app.show_help = false;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn report_sync_failure(app: &mut AppState, err: &SyncError, fallback: &str) {
    tracing::error!("{}: {}", fallback, err);
    app.sync_status = SyncStatus::Error(err.user_message(fallback));
}

/// Reloads whatever the last actions invalidated: the calendar list, then
/// the displayed months. A failed load is not retried until the user asks.
async fn sync_if_needed<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    sync_engine: &SyncEngine,
) -> io::Result<()> {
    if app.calendars_stale {
        app.sync_status = SyncStatus::Syncing;
        terminal.draw(|f| ui(f, app))?;

        match sync_engine.load_calendars().await {
            Ok(calendars) => {
                tracing::info!("Loaded {} calendars", calendars.len());
                app.set_calendars(calendars);
            }
            Err(e) => {
                report_sync_failure(app, &e, "Could not load calendars.");
                app.calendars_stale = false;
                app.loaded_months = app.displayed_months();
                return Ok(());
            }
        }
    }

    if app.needs_month_load() {
        let months = app.displayed_months();
        app.sync_status = SyncStatus::Syncing;
        terminal.draw(|f| ui(f, app))?;

        match sync_engine
            .load_months(&app.calendars, &app.visible, &months)
            .await
        {
            Ok(aggregate) => app.apply_month(aggregate),
            Err(e) => {
                report_sync_failure(app, &e, "Could not load events.");
                app.events.clear();
                app.loaded_months = months;
            }
        }
    }

    Ok(())
}

/// Carries out the backend side of `action`. Returns `true` to quit.
async fn perform<B: Backend>(
    action: Action,
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    sync_engine: &SyncEngine,
) -> io::Result<bool> {
    match action {
        Action::None => {}
        Action::Quit => return Ok(true),
        Action::Refresh => app.request_full_reload(),
        Action::SubmitEventForm => {
            let previous = show_syncing(terminal, app)?;
            let Some(mut form) = app.event_form.take() else {
                return Ok(false);
            };
            match form.submit(sync_engine.api()).await {
                Ok(()) => {
                    app.close_dialogs();
                    app.status_message = Some(format!("Saved \"{}\"", form.title.trim()));
                    app.request_reload();
                }
                Err(e) => {
                    tracing::warn!("Schedule not saved: {}", e);
                    app.sync_status = previous;
                    app.event_form = Some(form);
                }
            }
        }
        Action::SubmitCalendarForm => {
            let previous = show_syncing(terminal, app)?;
            let Some(mut form) = app.calendar_form.take() else {
                return Ok(false);
            };
            match form.submit(sync_engine.api()).await {
                Ok(()) => {
                    app.close_dialogs();
                    app.status_message = Some(format!("Saved calendar \"{}\"", form.name.trim()));
                    app.request_full_reload();
                }
                Err(e) => {
                    tracing::warn!("Calendar not saved: {}", e);
                    app.sync_status = previous;
                    app.calendar_form = Some(form);
                }
            }
        }
        Action::ConfirmDelete => {
            let previous = show_syncing(terminal, app)?;
            let Some(mut pending) = app.pending_deletion.take() else {
                return Ok(false);
            };
            match pending.confirm(sync_engine.api()).await {
                Ok(()) => {
                    app.close_dialogs();
                    app.status_message = Some("Deleted".to_string());
                    if pending.removes_calendar() {
                        app.request_full_reload();
                    } else {
                        app.request_reload();
                    }
                }
                Err(e) => {
                    tracing::warn!("Delete failed: {}", e);
                    app.sync_status = previous;
                    app.pending_deletion = Some(pending);
                }
            }
        }
    }
    Ok(false)
}

fn show_syncing<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> io::Result<SyncStatus> {
    let previous = std::mem::replace(&mut app.sync_status, SyncStatus::Syncing);
    terminal.draw(|f| ui(f, app))?;
    Ok(previous)
}
