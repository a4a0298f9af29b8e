use std::io;

use planify::storage::config::Config;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{CliMode, USAGE, parse_cli_mode, run_agenda_mode, run_month_mode};
mod tui;
use tui::{check_or_setup_auth, run_tui};

const LOG_ENV: &str = "PLANIFY_LOG";

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if cli_mode == CliMode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Check {}", Config::config_path().display());
            tracing::error!("Config failed: {}", e);
            return Ok(());
        }
    };

    let auth = match check_or_setup_auth(&config) {
        Ok(auth) => auth,
        Err(e) => {
            eprintln!("Authentication error: {:#}", e);
            tracing::error!("Authentication failed: {:#}", e);
            return Ok(());
        }
    };

    match cli_mode {
        CliMode::Agenda(date) => run_agenda_mode(config, auth, date).await,
        CliMode::Month(year, month) => run_month_mode(config, auth, year, month).await,
        CliMode::Interactive | CliMode::Help => run_tui(config, auth).await,
    }
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "planify.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("planify started");
}
