pub mod command_mode;
pub mod confirm_mode;
pub mod insert_mode;
pub mod normal_mode;
pub mod visual_mode;

/// Work a key press asks of the session loop beyond updating `AppState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    SubmitEventForm,
    SubmitCalendarForm,
    ConfirmDelete,
}
