//! Modal form state machines.
//!
//! A form is `Editing` until submitted, `Submitting` while its backend writes
//! are in flight, then either closed by the caller on success or back to
//! `Editing` with an error message on failure.

pub mod calendar_form;
pub mod delete;
pub mod event_form;

use thiserror::Error;

use crate::sync::api::ApiError;

pub use calendar_form::{CalendarField, CalendarForm};
pub use delete::{DeleteConfirmation, DeleteTarget};
pub use event_form::{EventForm, EventFormMode, FormField, TimeBlockInput};

pub const SAVE_EVENT_FALLBACK: &str = "Could not save the schedule.";
pub const DELETE_BLOCK_FALLBACK: &str = "Could not delete the time block.";
pub const SAVE_CALENDAR_FALLBACK: &str = "Could not save the calendar.";
pub const DELETE_CALENDAR_FALLBACK: &str = "Could not delete the calendar.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Select a calendar.")]
    NoCalendar,
    #[error("Title is required.")]
    EmptyTitle,
    #[error("Add at least one time block.")]
    NoBlocks,
    #[error("Block {0}: date must be YYYY-MM-DD.")]
    InvalidDate(usize),
    #[error("Block {0}: times must be HH:MM.")]
    InvalidTime(usize),
    #[error("Block {0}: start must be before end.")]
    EndBeforeStart(usize),
    #[error("Block {0} is already saved and cannot be changed.")]
    SavedBlockChanged(usize),
    #[error("Name is required.")]
    EmptyName,
    #[error("Color must look like #RRGGBB.")]
    InvalidColor,
    #[error("Still saving, please wait.")]
    Busy,
    #[error("{0}")]
    Rejected(String),
}

impl FormError {
    /// Validation failures are caught before any request is sent.
    pub fn is_validation(&self) -> bool {
        !matches!(self, FormError::Busy | FormError::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
}

pub(crate) fn rejected(err: ApiError, fallback: &str) -> FormError {
    tracing::error!("{}: {}", fallback, err);
    FormError::Rejected(err.user_message(fallback))
}
