use chrono::{Datelike, Local, NaiveDate};

use crate::calendar::{DayEvent, DayEventIndex, EditableEvent, UserCalendar, VisibleCalendars};
use crate::forms::{CalendarForm, DeleteConfirmation, DeleteTarget, EventForm};
use crate::storage::config::WeekConfig;
use crate::sync::aggregator::{CalendarFailure, MonthAggregate};
use crate::ui::theme::Theme;
use crate::ui::week_view::week_days;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    Command,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewType {
    Month,
    Week,
}

impl ViewType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "month" => Some(Self::Month),
            "week" => Some(Self::Week),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced,
    Syncing,
    /// Some calendars failed; the text names them.
    Partial(String),
    Error(String),
}

pub struct AppState {
    pub mode: Mode,
    pub view: ViewType,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub calendars: Vec<UserCalendar>,
    pub visible: VisibleCalendars,
    pub events: DayEventIndex,
    /// Months currently held in `events`, 1-based. Empty forces a reload.
    pub loaded_months: Vec<(i32, u32)>,
    pub calendars_stale: bool,
    pub failed_calendars: Vec<CalendarFailure>,
    pub focused_calendar: usize,
    pub sync_status: SyncStatus,
    pub status_message: Option<String>,
    pub command_buffer: String,
    pub show_help: bool,
    pub help_scroll: usize,
    pub theme: Theme,
    pub week: WeekConfig,
    pub event_form: Option<EventForm>,
    pub calendar_form: Option<CalendarForm>,
    pub pending_deletion: Option<DeleteConfirmation>,
    pub selected_event_index: usize,
    pub visual_selection_start: Option<NaiveDate>,
}

impl AppState {
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        Self {
            mode: Mode::Normal,
            view: ViewType::Month,
            selected_date: today,
            today,
            calendars: Vec::new(),
            visible: VisibleCalendars::default(),
            events: DayEventIndex::new(),
            loaded_months: Vec::new(),
            calendars_stale: true,
            failed_calendars: Vec::new(),
            focused_calendar: 0,
            sync_status: SyncStatus::Synced,
            status_message: None,
            command_buffer: String::new(),
            show_help: false,
            help_scroll: 0,
            theme: Theme::default(),
            week: WeekConfig::default(),
            event_form: None,
            calendar_form: None,
            pending_deletion: None,
            selected_event_index: 0,
            visual_selection_start: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_week_config(mut self, week: WeekConfig) -> Self {
        self.week = week;
        self
    }

    pub fn with_view(mut self, view: ViewType) -> Self {
        self.view = view;
        self
    }

    /// Installs a freshly fetched calendar list. The first load shows every
    /// calendar; later loads keep the user's hidden set.
    pub fn set_calendars(&mut self, calendars: Vec<UserCalendar>) {
        if self.calendars.is_empty() {
            self.visible = VisibleCalendars::all(&calendars);
        } else {
            self.visible.sync_with(&self.calendars, &calendars);
        }
        self.calendars = calendars;
        self.calendars_stale = false;
        if self.focused_calendar >= self.calendars.len() {
            self.focused_calendar = self.calendars.len().saturating_sub(1);
        }
    }

    pub fn apply_month(&mut self, aggregate: MonthAggregate) {
        self.sync_status = match aggregate.failure_summary() {
            Some(summary) => SyncStatus::Partial(summary),
            None => SyncStatus::Synced,
        };
        self.loaded_months = aggregate.months;
        self.failed_calendars = aggregate.failed;
        self.events = aggregate.events;
        self.clamp_event_selection();
    }

    /// Months the current view draws, in order. A week that crosses a month
    /// boundary needs both.
    pub fn displayed_months(&self) -> Vec<(i32, u32)> {
        let days = match self.view {
            ViewType::Month => vec![self.selected_date],
            ViewType::Week => week_days(self.selected_date),
        };
        let mut months: Vec<(i32, u32)> = Vec::new();
        for day in days {
            let month = (day.year(), day.month());
            if months.last() != Some(&month) {
                months.push(month);
            }
        }
        months
    }

    pub fn needs_month_load(&self) -> bool {
        self.loaded_months != self.displayed_months()
    }

    pub fn request_reload(&mut self) {
        self.loaded_months.clear();
    }

    pub fn request_full_reload(&mut self) {
        self.calendars_stale = true;
        self.loaded_months.clear();
    }

    pub fn visible_events_on(&self, date: NaiveDate) -> Vec<&DayEvent> {
        self.events.visible_on(date, &self.visible)
    }

    pub fn get_selected_event(&self) -> Option<&DayEvent> {
        self.visible_events_on(self.selected_date)
            .get(self.selected_event_index)
            .copied()
    }

    pub fn move_event_selection_down(&mut self) -> bool {
        let count = self.visible_events_on(self.selected_date).len();
        if count > 0 && self.selected_event_index < count - 1 {
            self.selected_event_index += 1;
            true
        } else {
            false
        }
    }

    pub fn move_event_selection_up(&mut self) -> bool {
        if self.selected_event_index > 0 {
            self.selected_event_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset_event_selection(&mut self) {
        self.selected_event_index = 0;
    }

    fn clamp_event_selection(&mut self) {
        let count = self.visible_events_on(self.selected_date).len();
        self.selected_event_index = self.selected_event_index.min(count.saturating_sub(1));
    }

    pub fn calendar(&self, calendar_id: i64) -> Option<&UserCalendar> {
        self.calendars.iter().find(|c| c.id == calendar_id)
    }

    pub fn focused_calendar(&self) -> Option<&UserCalendar> {
        self.calendars.get(self.focused_calendar)
    }

    pub fn focus_next_calendar(&mut self) {
        if !self.calendars.is_empty() {
            self.focused_calendar = (self.focused_calendar + 1) % self.calendars.len();
        }
    }

    /// Flips visibility of `calendar_id`. A calendar turned back on has no
    /// events loaded yet, so the month is reloaded.
    pub fn toggle_calendar(&mut self, calendar_id: i64) -> bool {
        let now_visible = self.visible.toggle(calendar_id);
        if now_visible {
            self.request_reload();
        }
        self.clamp_event_selection();
        now_visible
    }

    pub fn toggle_focused_calendar(&mut self) -> Option<bool> {
        let id = self.focused_calendar()?.id;
        Some(self.toggle_calendar(id))
    }

    pub fn find_calendar_by_name(&self, name: &str) -> Option<&UserCalendar> {
        let name = name.trim();
        self.calendars
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_open_dialog(&self) -> bool {
        self.event_form.is_some() || self.calendar_form.is_some() || self.pending_deletion.is_some()
    }

    pub fn open_create_form(&mut self, date: NaiveDate, title: &str) {
        self.event_form = Some(EventForm::create(&self.calendars, date).with_title(title));
        self.mode = Mode::Insert;
    }

    pub fn open_range_form(&mut self, start: NaiveDate, end: NaiveDate) {
        self.event_form = Some(EventForm::create_for_range(&self.calendars, start, end));
        self.mode = Mode::Insert;
    }

    pub fn open_edit_form(&mut self) -> bool {
        let Some(event) = self.get_selected_event() else {
            return false;
        };
        self.event_form = Some(EventForm::edit(&EditableEvent::from(event)));
        self.mode = Mode::Insert;
        true
    }

    pub fn open_calendar_create(&mut self, name: &str) {
        self.calendar_form = Some(CalendarForm::create(name));
        self.mode = Mode::Insert;
    }

    pub fn open_calendar_edit(&mut self) -> bool {
        let Some(calendar) = self.focused_calendar() else {
            return false;
        };
        self.calendar_form = Some(CalendarForm::edit(calendar));
        self.mode = Mode::Insert;
        true
    }

    pub fn open_delete(&mut self, target: DeleteTarget) {
        self.pending_deletion = Some(DeleteConfirmation::new(target));
        self.mode = Mode::Confirm;
    }

    pub fn open_delete_selected_block(&mut self) -> bool {
        let Some(event) = self.get_selected_event() else {
            return false;
        };
        let target = DeleteTarget::TimeBlock {
            time_id: event.id,
            title: event.title.clone(),
        };
        self.open_delete(target);
        true
    }

    pub fn open_delete_focused_calendar(&mut self) -> bool {
        let Some(calendar) = self.focused_calendar() else {
            return false;
        };
        let target = DeleteTarget::Calendar {
            calendar_id: calendar.id,
            name: calendar.name.clone(),
        };
        self.open_delete(target);
        true
    }

    pub fn close_dialogs(&mut self) {
        self.event_form = None;
        self.calendar_form = None;
        self.pending_deletion = None;
        self.mode = Mode::Normal;
    }

    pub fn get_visual_selection_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.visual_selection_start.map(|start| {
            let end = self.selected_date;
            if start <= end { (start, end) } else { (end, start) }
        })
    }

    pub fn is_date_in_visual_selection(&self, date: NaiveDate) -> bool {
        self.get_visual_selection_range()
            .is_some_and(|(start, end)| date >= start && date <= end)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn new_app_starts_in_normal_month_view() {
        let app = AppState::new();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.view, ViewType::Month);
        assert_eq!(app.selected_date, Local::now().date_naive());
        assert!(app.events.is_empty());
        assert!(app.needs_month_load());
    }

    #[test]
    fn first_calendar_load_makes_all_visible() {
        let mut app = AppState::new();
        app.set_calendars(vec![calendar(1, "Work"), calendar(2, "Home")]);

        assert!(app.visible.is_visible(1));
        assert!(app.visible.is_visible(2));
        assert!(!app.calendars_stale);
    }

    #[test]
    fn partial_aggregate_sets_partial_status() {
        let mut app = AppState::new();
        app.selected_date = date(2025, 3, 4);
        let mut aggregate = MonthAggregate::empty(2025, 3);
        aggregate.failed.push(CalendarFailure {
            calendar_id: 2,
            name: "Home".to_string(),
            reason: "boom".to_string(),
        });

        app.apply_month(aggregate);

        assert_eq!(app.sync_status, SyncStatus::Partial("Could not load: Home".to_string()));
        assert!(!app.needs_month_load());
        assert_eq!(app.failed_calendars.len(), 1);
    }

    #[test]
    fn changing_month_requires_load() {
        let mut app = state_with(date(2025, 3, 31), vec![]);
        assert!(!app.needs_month_load());

        app.selected_date = date(2025, 4, 1);

        assert!(app.needs_month_load());
    }

    #[test]
    fn week_across_month_boundary_loads_both_months() {
        let mut app = state_with(date(2025, 3, 1), vec![]);
        assert!(!app.needs_month_load());

        app.view = ViewType::Week;

        assert_eq!(app.displayed_months(), vec![(2025, 2), (2025, 3)]);
        assert!(app.needs_month_load());

        let mut aggregate = MonthAggregate::covering(&app.displayed_months());
        aggregate.events.extend([block(1, 1, date(2025, 2, 26), (9, 0), (10, 0))]);
        app.apply_month(aggregate);

        assert!(!app.needs_month_load());
        assert_eq!(app.visible_events_on(date(2025, 2, 26)).len(), 1);
    }

    #[test]
    fn week_inside_one_month_loads_only_that_month() {
        let mut app = state_with(date(2025, 3, 12), vec![]);
        app.view = ViewType::Week;

        assert_eq!(app.displayed_months(), vec![(2025, 3)]);
        assert!(!app.needs_month_load());
    }

    #[test]
    fn toggling_calendar_hides_its_events_only() {
        let day = date(2025, 3, 4);
        let mut app = state_with(day, vec![
            block(1, 1, day, (9, 0), (10, 0)),
            block(2, 2, day, (11, 0), (12, 0)),
        ]);

        assert!(!app.toggle_calendar(1));

        let ids: Vec<_> = app.visible_events_on(day).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!app.needs_month_load());
    }

    #[test]
    fn toggling_calendar_back_on_requests_reload() {
        let mut app = state_with(date(2025, 3, 4), vec![]);
        app.toggle_calendar(1);

        assert!(app.toggle_calendar(1));
        assert!(app.needs_month_load());
    }

    #[test]
    fn event_selection_moves_within_visible_events() {
        let day = date(2025, 3, 4);
        let mut app = state_with(day, vec![
            block(1, 1, day, (9, 0), (10, 0)),
            block(2, 1, day, (11, 0), (12, 0)),
        ]);

        assert!(app.move_event_selection_down());
        assert!(!app.move_event_selection_down());
        assert_eq!(app.get_selected_event().map(|e| e.id), Some(2));
        assert!(app.move_event_selection_up());
        assert_eq!(app.get_selected_event().map(|e| e.id), Some(1));
    }

    #[test]
    fn edit_form_is_prepopulated_from_selected_block() {
        let day = date(2025, 3, 4);
        let mut app = state_with(day, vec![block(5, 2, day, (14, 0), (15, 30))]);

        assert!(app.open_edit_form());

        let form = app.event_form.as_ref().unwrap();
        assert_eq!(form.title, "Block 5");
        assert_eq!(form.calendar_id, Some(2));
        assert_eq!(form.blocks[0].date, "2025-03-04");
        assert_eq!(form.blocks[0].start, "14:00");
        assert_eq!(form.blocks[0].end, "15:30");
        assert_eq!(app.mode, Mode::Insert);
    }

    #[test]
    fn delete_targets_follow_selection_and_focus() {
        let day = date(2025, 3, 4);
        let mut app = state_with(day, vec![block(5, 2, day, (14, 0), (15, 30))]);

        assert!(app.open_delete_selected_block());
        assert_eq!(
            app.pending_deletion.as_ref().map(|d| d.target.clone()),
            Some(DeleteTarget::TimeBlock { time_id: 5, title: "Block 5".to_string() })
        );
        app.close_dialogs();

        app.focus_next_calendar();
        assert!(app.open_delete_focused_calendar());
        assert_eq!(
            app.pending_deletion.as_ref().map(|d| d.target.clone()),
            Some(DeleteTarget::Calendar { calendar_id: 2, name: "Home".to_string() })
        );
        assert_eq!(app.mode, Mode::Confirm);
    }

    #[test]
    fn nothing_to_edit_on_empty_day() {
        let mut app = state_with(date(2025, 3, 4), vec![]);
        assert!(!app.open_edit_form());
        assert!(!app.open_delete_selected_block());
        assert!(app.event_form.is_none());
    }

    #[test]
    fn visual_range_is_ordered() {
        let mut app = AppState::new();
        app.selected_date = date(2025, 3, 2);
        app.visual_selection_start = Some(date(2025, 3, 5));

        assert_eq!(app.get_visual_selection_range(), Some((date(2025, 3, 2), date(2025, 3, 5))));
        assert!(app.is_date_in_visual_selection(date(2025, 3, 4)));
        assert!(!app.is_date_in_visual_selection(date(2025, 3, 6)));
    }

    #[test]
    fn find_calendar_by_name_ignores_case() {
        let app = state_with(date(2025, 3, 4), vec![]);
        assert_eq!(app.find_calendar_by_name("work").map(|c| c.id), Some(1));
        assert!(app.find_calendar_by_name("gym").is_none());
    }
}
