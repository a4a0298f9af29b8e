use crate::forms::{DELETE_BLOCK_FALLBACK, DELETE_CALENDAR_FALLBACK, FormError, FormPhase, rejected};
use crate::sync::api::CalendarApi;

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    TimeBlock { time_id: i64, title: String },
    Calendar { calendar_id: i64, name: String },
}

impl DeleteTarget {
    pub fn prompt(&self) -> String {
        match self {
            DeleteTarget::TimeBlock { title, .. } => {
                format!("Delete this time block of \"{}\"?", title)
            }
            DeleteTarget::Calendar { name, .. } => {
                format!("Delete calendar \"{}\" and all of its events?", name)
            }
        }
    }

    fn fallback(&self) -> &'static str {
        match self {
            DeleteTarget::TimeBlock { .. } => DELETE_BLOCK_FALLBACK,
            DeleteTarget::Calendar { .. } => DELETE_CALENDAR_FALLBACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation {
    pub target: DeleteTarget,
    pub phase: FormPhase,
    pub error: Option<String>,
}

impl DeleteConfirmation {
    pub fn new(target: DeleteTarget) -> Self {
        Self {
            target,
            phase: FormPhase::Editing,
            error: None,
        }
    }

    pub fn removes_calendar(&self) -> bool {
        matches!(self.target, DeleteTarget::Calendar { .. })
    }

    pub async fn confirm(&mut self, api: &dyn CalendarApi) -> Result<(), FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::Busy);
        }

        self.phase = FormPhase::Submitting;
        let result = match &self.target {
            DeleteTarget::TimeBlock { time_id, .. } => api.delete_time(*time_id).await,
            DeleteTarget::Calendar { calendar_id, .. } => api.delete_calendar(*calendar_id).await,
        };
        self.phase = FormPhase::Editing;

        match result {
            Ok(()) => {
                tracing::info!("Deleted {:?}", self.target);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let err = rejected(e, self.target.fallback());
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::api::{ApiError, MockCalendarApi};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn confirming_block_deletes_time() {
        let mut api = MockCalendarApi::new();
        api.expect_delete_time().with(eq(31)).times(1).returning(|_| Ok(()));
        let mut dialog = DeleteConfirmation::new(DeleteTarget::TimeBlock {
            time_id: 31,
            title: "Standup".to_string(),
        });

        dialog.confirm(&api).await.unwrap();

        assert_eq!(dialog.error, None);
        assert!(!dialog.removes_calendar());
    }

    #[tokio::test]
    async fn confirming_calendar_deletes_calendar() {
        let mut api = MockCalendarApi::new();
        api.expect_delete_calendar().with(eq(4)).times(1).returning(|_| Ok(()));
        let mut dialog = DeleteConfirmation::new(DeleteTarget::Calendar {
            calendar_id: 4,
            name: "Gym".to_string(),
        });

        dialog.confirm(&api).await.unwrap();

        assert!(dialog.removes_calendar());
    }

    #[tokio::test]
    async fn failure_keeps_dialog_open_with_fallback() {
        let mut api = MockCalendarApi::new();
        api.expect_delete_time()
            .returning(|_| Err(ApiError::NotFound("/times/delete_time/31".to_string())));
        let mut dialog = DeleteConfirmation::new(DeleteTarget::TimeBlock {
            time_id: 31,
            title: "Standup".to_string(),
        });

        let result = dialog.confirm(&api).await;

        assert_eq!(result, Err(FormError::Rejected(DELETE_BLOCK_FALLBACK.to_string())));
        assert_eq!(dialog.error.as_deref(), Some(DELETE_BLOCK_FALLBACK));
        assert_eq!(dialog.phase, FormPhase::Editing);
    }

    #[test]
    fn prompt_names_the_target() {
        let target = DeleteTarget::Calendar { calendar_id: 1, name: "Work".to_string() };
        assert_eq!(target.prompt(), "Delete calendar \"Work\" and all of its events?");
    }
}
