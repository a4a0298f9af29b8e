pub mod app;
pub mod calendar;
pub mod forms;
pub mod input;
pub mod storage;
pub mod sync;
pub mod ui;

pub use app::{AppState, Mode, SyncStatus, ViewType};
pub use calendar::{DayEvent, UserCalendar, VisibleCalendars};

pub use input::{Action, command_mode, confirm_mode, insert_mode, normal_mode, visual_mode};
