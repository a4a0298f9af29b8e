mod authentication;
mod session;
mod presentation;
mod calendar_views;
mod dialogs;

pub use authentication::check_or_setup_auth;
pub use session::run_tui;
