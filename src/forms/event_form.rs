use chrono::{Days, NaiveDate, NaiveTime};

use crate::calendar::{EditableEvent, NewEvent, NewTime, UserCalendar};
use crate::forms::delete::DeleteTarget;
use crate::forms::{FormError, FormPhase, SAVE_EVENT_FALLBACK, rejected};
use crate::sync::api::{ApiError, CalendarApi};

const DEFAULT_START: &str = "09:00";
const DEFAULT_END: &str = "10:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormMode {
    Create,
    Edit { event_id: i64, time_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Calendar,
    Title,
    Description,
    Location,
    BlockDate(usize),
    BlockStart(usize),
    BlockEnd(usize),
}

/// One time block as typed: a date and two clock times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBlockInput {
    pub date: String,
    pub start: String,
    pub end: String,
}

impl TimeBlockInput {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            start: start.format("%H:%M").to_string(),
            end: end.format("%H:%M").to_string(),
        }
    }

    pub fn default_on(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
        }
    }

    /// `number` is the 1-based block number used in error messages.
    fn parse(&self, number: usize) -> Result<(NaiveDate, NaiveTime, NaiveTime), FormError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(number))?;
        let start = parse_clock(&self.start).ok_or(FormError::InvalidTime(number))?;
        let end = parse_clock(&self.end).ok_or(FormError::InvalidTime(number))?;
        if start >= end {
            return Err(FormError::EndBeforeStart(number));
        }
        Ok((date, start, end))
    }
}

/// Accepts `HH:MM`, `HHMM` and `HMM`.
pub fn parse_clock(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    let digits = input.replace(':', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if input.contains(':') {
        return NaiveTime::parse_from_str(input, "%H:%M").ok();
    }
    if digits.len() != 3 && digits.len() != 4 {
        return None;
    }
    let num: u32 = digits.parse().ok()?;
    NaiveTime::from_hms_opt(num / 100, num % 100, 0)
}

type ParsedBlock = (NaiveDate, NaiveTime, NaiveTime);

#[derive(Debug, Clone, PartialEq)]
struct ValidEvent {
    calendar_id: i64,
    blocks: Vec<ParsedBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub mode: EventFormMode,
    pub calendar_id: Option<i64>,
    calendar_choices: Vec<i64>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub blocks: Vec<TimeBlockInput>,
    pub active_field: FormField,
    pub phase: FormPhase,
    pub error: Option<String>,
    created_event_id: Option<i64>,
    /// Blocks already written for `created_event_id`, in form order. They are
    /// read-only until the form closes.
    saved_blocks: Vec<ParsedBlock>,
}

impl EventForm {
    pub fn create(calendars: &[UserCalendar], date: NaiveDate) -> Self {
        Self::create_for_range(calendars, date, date)
    }

    /// One block per day from `start` through `end`.
    pub fn create_for_range(calendars: &[UserCalendar], start: NaiveDate, end: NaiveDate) -> Self {
        let blocks = days_between(start, end)
            .into_iter()
            .map(TimeBlockInput::default_on)
            .collect();

        Self {
            mode: EventFormMode::Create,
            calendar_id: calendars.first().map(|c| c.id),
            calendar_choices: calendars.iter().map(|c| c.id).collect(),
            title: String::new(),
            description: String::new(),
            location: String::new(),
            blocks,
            active_field: FormField::Title,
            phase: FormPhase::Editing,
            error: None,
            created_event_id: None,
            saved_blocks: Vec::new(),
        }
    }

    pub fn edit(event: &EditableEvent) -> Self {
        Self {
            mode: EventFormMode::Edit {
                event_id: event.event_id,
                time_id: event.time_id,
            },
            calendar_id: Some(event.calendar_id),
            calendar_choices: vec![event.calendar_id],
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            blocks: vec![TimeBlockInput::new(event.date, event.start_time, event.end_time)],
            active_field: FormField::Title,
            phase: FormPhase::Editing,
            error: None,
            created_event_id: None,
            saved_blocks: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EventFormMode::Edit { .. })
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn calendar_locked(&self) -> bool {
        self.is_editing()
    }

    pub fn cycle_calendar(&mut self, forward: bool) {
        if self.calendar_locked() || self.calendar_choices.is_empty() {
            return;
        }
        let len = self.calendar_choices.len();
        let current = self
            .calendar_id
            .and_then(|id| self.calendar_choices.iter().position(|c| *c == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.calendar_id = Some(self.calendar_choices[next]);
    }

    fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Calendar,
            FormField::Title,
            FormField::Description,
            FormField::Location,
        ];
        for i in 0..self.blocks.len() {
            fields.extend([FormField::BlockDate(i), FormField::BlockStart(i), FormField::BlockEnd(i)]);
        }
        fields
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(at + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(at + fields.len() - 1) % fields.len()];
    }

    pub fn is_block_saved(&self, index: usize) -> bool {
        index < self.saved_blocks.len()
    }

    /// Text buffer behind the active field; `None` for the calendar picker
    /// and for blocks that are already saved.
    pub fn active_text_mut(&mut self) -> Option<&mut String> {
        if let Some(i) = self.active_block()
            && self.is_block_saved(i)
        {
            return None;
        }
        match self.active_field {
            FormField::Calendar => None,
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Location => Some(&mut self.location),
            FormField::BlockDate(i) => self.blocks.get_mut(i).map(|b| &mut b.date),
            FormField::BlockStart(i) => self.blocks.get_mut(i).map(|b| &mut b.start),
            FormField::BlockEnd(i) => self.blocks.get_mut(i).map(|b| &mut b.end),
        }
    }

    pub fn active_block(&self) -> Option<usize> {
        match self.active_field {
            FormField::BlockDate(i) | FormField::BlockStart(i) | FormField::BlockEnd(i) => Some(i),
            _ => None,
        }
    }

    /// Appends a 09:00-10:00 block on `today`. Edit mode keeps its single block.
    pub fn add_block(&mut self, today: NaiveDate) -> bool {
        if self.is_editing() {
            return false;
        }
        self.blocks.push(TimeBlockInput::default_on(today));
        self.active_field = FormField::BlockDate(self.blocks.len() - 1);
        true
    }

    /// Removes block `index` while more than one block remains. Saved blocks
    /// stay.
    pub fn remove_block(&mut self, index: usize) -> bool {
        if self.is_editing() || self.blocks.len() <= 1 || index >= self.blocks.len() || self.is_block_saved(index)
        {
            return false;
        }
        self.blocks.remove(index);
        let last = self.blocks.len() - 1;
        if let Some(active) = self.active_block()
            && active > last
        {
            self.active_field = FormField::BlockDate(last);
        }
        true
    }

    /// The block being edited, for the "delete this block" action.
    pub fn delete_target(&self) -> Option<DeleteTarget> {
        match self.mode {
            EventFormMode::Edit { time_id, .. } => Some(DeleteTarget::TimeBlock {
                time_id,
                title: self.title.clone(),
            }),
            EventFormMode::Create => None,
        }
    }

    fn validate(&self) -> Result<ValidEvent, FormError> {
        let calendar_id = self.calendar_id.ok_or(FormError::NoCalendar)?;
        if self.title.trim().is_empty() {
            return Err(FormError::EmptyTitle);
        }
        if self.blocks.is_empty() {
            return Err(FormError::NoBlocks);
        }
        let blocks = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, block)| block.parse(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(i) = self
            .saved_blocks
            .iter()
            .enumerate()
            .position(|(i, saved)| blocks.get(i) != Some(saved))
        {
            return Err(FormError::SavedBlockChanged(i + 1));
        }
        Ok(ValidEvent { calendar_id, blocks })
    }

    fn payload(&self, calendar_id: i64) -> NewEvent {
        NewEvent {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            calendar_id,
        }
    }

    /// Validates, then writes the event and its blocks. On failure the
    /// message is kept in `error` and the form stays open.
    pub async fn submit(&mut self, api: &dyn CalendarApi) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }

        let valid = match self.validate() {
            Ok(valid) => valid,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.phase = FormPhase::Submitting;
        self.error = None;
        let result = self.write(api, &valid).await;
        self.phase = FormPhase::Editing;

        result.map_err(|e| {
            let err = rejected(e, SAVE_EVENT_FALLBACK);
            self.error = Some(err.to_string());
            err
        })
    }

    async fn write(&mut self, api: &dyn CalendarApi, valid: &ValidEvent) -> Result<(), ApiError> {
        let payload = self.payload(valid.calendar_id);

        match self.mode {
            EventFormMode::Edit { event_id, time_id } => {
                api.update_event(event_id, &payload).await?;
                if let Some(&(date, start, end)) = valid.blocks.first() {
                    api.update_time(time_id, &NewTime::on_date(date, start, end, event_id))
                        .await?;
                }
                tracing::info!("Updated event {} block {}", event_id, time_id);
            }
            EventFormMode::Create => {
                let event_id = match self.created_event_id {
                    Some(id) => {
                        api.update_event(id, &payload).await?;
                        id
                    }
                    None => {
                        let id = api.create_event(&payload).await?;
                        self.created_event_id = Some(id);
                        id
                    }
                };
                for &(date, start, end) in valid.blocks.iter().skip(self.saved_blocks.len()) {
                    api.create_time(&NewTime::on_date(date, start, end, event_id))
                        .await?;
                    self.saved_blocks.push((date, start, end));
                }
                tracing::info!("Created event {} with {} blocks", event_id, valid.blocks.len());
            }
        }
        Ok(())
    }
}

/// Dates from `start` through `end` inclusive, in order.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start.min(end);
    let last = start.max(end);
    while day <= last {
        days.push(day);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}
