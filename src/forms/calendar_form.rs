use crate::calendar::{DEFAULT_CALENDAR_COLOR, NewCalendar, UserCalendar, parse_hex_color};
use crate::forms::delete::DeleteTarget;
use crate::forms::{FormError, FormPhase, SAVE_CALENDAR_FALLBACK, rejected};
use crate::sync::api::CalendarApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarField {
    Name,
    Description,
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarForm {
    /// `Some` when editing an existing calendar.
    pub calendar_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub color: String,
    pub active_field: CalendarField,
    pub phase: FormPhase,
    pub error: Option<String>,
}

impl CalendarForm {
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            calendar_id: None,
            name: name.into(),
            description: String::new(),
            color: DEFAULT_CALENDAR_COLOR.to_string(),
            active_field: CalendarField::Name,
            phase: FormPhase::Editing,
            error: None,
        }
    }

    pub fn edit(calendar: &UserCalendar) -> Self {
        Self {
            calendar_id: Some(calendar.id),
            name: calendar.name.clone(),
            description: calendar.description.clone(),
            color: calendar.color.clone(),
            active_field: CalendarField::Name,
            phase: FormPhase::Editing,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.calendar_id.is_some()
    }

    pub fn next_field(&mut self) {
        self.active_field = match self.active_field {
            CalendarField::Name => CalendarField::Description,
            CalendarField::Description => CalendarField::Color,
            CalendarField::Color => CalendarField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.active_field = match self.active_field {
            CalendarField::Name => CalendarField::Color,
            CalendarField::Description => CalendarField::Name,
            CalendarField::Color => CalendarField::Description,
        };
    }

    pub fn active_text_mut(&mut self) -> &mut String {
        match self.active_field {
            CalendarField::Name => &mut self.name,
            CalendarField::Description => &mut self.description,
            CalendarField::Color => &mut self.color,
        }
    }

    pub fn delete_target(&self) -> Option<DeleteTarget> {
        self.calendar_id.map(|calendar_id| DeleteTarget::Calendar {
            calendar_id,
            name: self.name.clone(),
        })
    }

    fn validate(&self) -> Result<NewCalendar, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyName);
        }
        if parse_hex_color(&self.color).is_none() {
            return Err(FormError::InvalidColor);
        }
        Ok(NewCalendar {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            color: self.color.trim().to_lowercase(),
        })
    }

    pub async fn submit(&mut self, api: &dyn CalendarApi) -> Result<(), FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::Busy);
        }

        let payload = match self.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.phase = FormPhase::Submitting;
        let result = match self.calendar_id {
            Some(id) => api.update_calendar(id, &payload).await,
            None => api.create_calendar(&payload).await,
        };
        self.phase = FormPhase::Editing;

        match result {
            Ok(()) => {
                tracing::info!("Saved calendar {}", payload.name);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let err = rejected(e, SAVE_CALENDAR_FALLBACK);
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
    use pretty_assertions::assert_eq;

    fn work() -> UserCalendar {
        UserCalendar {
            id: 6,
            name: "Work".to_string(),
            description: "Office".to_string(),
            color: "#FF8800".to_string(),
        }
    }

    #[test]
    fn create_uses_default_color() {
        let form = CalendarForm::create("Uni");
        assert_eq!(form.color, DEFAULT_CALENDAR_COLOR);
        assert!(!form.is_editing());
        assert_eq!(form.delete_target(), None);
    }

    #[test]
    fn edit_prepopulates_from_calendar() {
        let form = CalendarForm::edit(&work());
        assert_eq!(form.calendar_id, Some(6));
        assert_eq!(form.name, "Work");
        assert_eq!(form.description, "Office");
        assert_eq!(form.color, "#FF8800");
    }

    #[test]
    fn field_cycle_wraps() {
        let mut form = CalendarForm::create("");
        form.prev_field();
        assert_eq!(form.active_field, CalendarField::Color);
        form.active_text_mut().push('0');
        assert_eq!(form.color, "#1e90ff0");
        form.next_field();
        assert_eq!(form.active_field, CalendarField::Name);
    }

    #[tokio::test]
    async fn blank_name_and_bad_color_are_rejected_locally() {
        let api = MockCalendarApi::new();

        let mut form = CalendarForm::create("   ");
        assert_eq!(form.submit(&api).await, Err(FormError::EmptyName));

        let mut form = CalendarForm::create("Uni");
        form.color = "blue".to_string();
        assert_eq!(form.submit(&api).await, Err(FormError::InvalidColor));
        assert_eq!(form.error.as_deref(), Some("Color must look like #RRGGBB."));
    }

    #[tokio::test]
    async fn create_posts_trimmed_payload() {
        let mut api = MockCalendarApi::new();
        api.expect_create_calendar()
            .withf(|c| c.name == "Uni" && c.color == "#1e90ff" && c.description.is_empty())
            .times(1)
            .returning(|_| Ok(()));
        let mut form = CalendarForm::create(" Uni ");

        form.submit(&api).await.unwrap();
    }

    #[tokio::test]
    async fn edit_puts_to_calendar_id() {
        let mut api = MockCalendarApi::new();
        api.expect_update_calendar()
            .withf(|id, c| *id == 6 && c.color == "#ff8800")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut form = CalendarForm::edit(&work());

        form.submit(&api).await.unwrap();
    }

    #[tokio::test]
    async fn failure_shows_fallback() {
        let mut api = MockCalendarApi::new();
        api.expect_create_calendar()
            .returning(|_| Err(ApiError::Backend { status: 500, detail: None }));
        let mut form = CalendarForm::create("Uni");

        let result = form.submit(&api).await;

        assert_eq!(result, Err(FormError::Rejected(SAVE_CALENDAR_FALLBACK.to_string())));
        assert_eq!(form.error.as_deref(), Some(SAVE_CALENDAR_FALLBACK));
    }
}
