use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use planify::calendar::{
    CalendarOwner, EventEntity, EventTimes, EventsTimesResponse, NewCalendar, NewEvent, NewTime,
    TimeEntity, UserCalendar, VisibleCalendars,
};
use planify::forms::{CalendarForm, DeleteConfirmation, DeleteTarget, EventForm, TimeBlockInput};
use planify::storage::config::Config;
use planify::sync::aggregator::aggregate_month;
use planify::sync::{ApiError, CalendarApi, SyncEngine};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Backend {
    next_id: i64,
    calendars: Vec<UserCalendar>,
    events: Vec<EventEntity>,
    times: Vec<TimeEntity>,
    broken: HashSet<i64>,
    fetched: Vec<i64>,
}

impl Backend {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for the Planify REST backend.
#[derive(Clone, Default)]
struct FakeApi {
    state: Arc<Mutex<Backend>>,
}

impl FakeApi {
    fn break_calendar(&self, calendar_id: i64) {
        self.state.lock().unwrap().broken.insert(calendar_id);
    }

    fn fetched(&self) -> Vec<i64> {
        self.state.lock().unwrap().fetched.clone()
    }
}

#[async_trait]
impl CalendarApi for FakeApi {
    async fn list_calendars(&self, _owner: CalendarOwner) -> Result<Vec<UserCalendar>, ApiError> {
        Ok(self.state.lock().unwrap().calendars.clone())
    }

    async fn calendar_events_times(&self, calendar_id: i64) -> Result<EventsTimesResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(calendar_id);
        if state.broken.contains(&calendar_id) {
            return Err(ApiError::Backend { status: 500, detail: None });
        }
        let events_times = state
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .map(|event| EventTimes {
                event: event.clone(),
                times: state.times.iter().filter(|t| t.event_id == event.id).cloned().collect(),
            })
            .collect();
        Ok(EventsTimesResponse { events_times })
    }

    async fn create_calendar(&self, calendar: &NewCalendar) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = state.id();
        state.calendars.push(UserCalendar {
            id,
            name: calendar.name.clone(),
            description: calendar.description.clone(),
            color: calendar.color.clone(),
        });
        Ok(())
    }

    async fn update_calendar(&self, calendar_id: i64, calendar: &NewCalendar) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .calendars
            .iter_mut()
            .find(|c| c.id == calendar_id)
            .ok_or_else(|| ApiError::NotFound(format!("calendar {}", calendar_id)))?;
        existing.name = calendar.name.clone();
        existing.description = calendar.description.clone();
        existing.color = calendar.color.clone();
        Ok(())
    }

    async fn delete_calendar(&self, calendar_id: i64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calendars.retain(|c| c.id != calendar_id);
        state.events.retain(|e| e.calendar_id != calendar_id);
        Ok(())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<i64, ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = state.id();
        state.events.push(EventEntity {
            id,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            calendar_id: event.calendar_id,
        });
        Ok(id)
    }

    async fn update_event(&self, event_id: i64, event: &NewEvent) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| ApiError::NotFound(format!("event {}", event_id)))?;
        existing.title = event.title.clone();
        existing.description = event.description.clone();
        existing.location = event.location.clone();
        Ok(())
    }

    async fn create_time(&self, time: &NewTime) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = state.id();
        state.times.push(TimeEntity {
            id,
            start_time: time.start_time,
            end_time: time.end_time,
            event_id: time.event_id,
        });
        Ok(())
    }

    async fn update_time(&self, time_id: i64, time: &NewTime) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .times
            .iter_mut()
            .find(|t| t.id == time_id)
            .ok_or_else(|| ApiError::NotFound(format!("time {}", time_id)))?;
        existing.start_time = time.start_time;
        existing.end_time = time.end_time;
        Ok(())
    }

    async fn delete_time(&self, time_id: i64) -> Result<(), ApiError> {
        self.state.lock().unwrap().times.retain(|t| t.id != time_id);
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn create_calendar(api: &FakeApi, name: &str) -> UserCalendar {
    let mut form = CalendarForm::create(name);
    form.submit(api).await.unwrap();
    api.list_calendars(CalendarOwner::Me)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap()
}

async fn schedule(api: &FakeApi, calendars: &[UserCalendar], calendar_id: i64, title: &str, blocks: Vec<TimeBlockInput>) {
    let mut form = EventForm::create(calendars, blocks[0].date.parse().unwrap()).with_title(title);
    form.calendar_id = Some(calendar_id);
    form.blocks = blocks;
    form.submit(api).await.unwrap();
}

#[tokio::test]
async fn created_event_comes_back_in_month_aggregate() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    let calendars = vec![work.clone()];

    schedule(&api, &calendars, work.id, "Planning", vec![
        TimeBlockInput::new(date(2025, 3, 12), time(14, 0), time(15, 30)),
    ])
    .await;

    let aggregate = aggregate_month(&api, &calendars, &VisibleCalendars::all(&calendars), 2025, 3)
        .await
        .unwrap();

    let day = aggregate.events.events_on(date(2025, 3, 12));
    assert_eq!(aggregate.events.len(), 1);
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].title, "Planning");
    assert_eq!(day[0].calendar_id, work.id);
    assert_eq!((day[0].start_time, day[0].end_time), (time(14, 0), time(15, 30)));
    assert_eq!(aggregate.succeeded, vec![work.id]);
    assert!(!aggregate.is_partial());
}

#[tokio::test]
async fn multi_block_event_lands_on_each_day_of_its_month() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    let calendars = vec![work.clone()];

    schedule(&api, &calendars, work.id, "Workshop", vec![
        TimeBlockInput::new(date(2025, 3, 31), time(9, 0), time(12, 0)),
        TimeBlockInput::new(date(2025, 4, 1), time(9, 0), time(12, 0)),
    ])
    .await;

    let visible = VisibleCalendars::all(&calendars);
    let march = aggregate_month(&api, &calendars, &visible, 2025, 3).await.unwrap();
    let april = aggregate_month(&api, &calendars, &visible, 2025, 4).await.unwrap();

    assert_eq!(march.events.dates().collect::<Vec<_>>(), vec![date(2025, 3, 31)]);
    assert_eq!(april.events.dates().collect::<Vec<_>>(), vec![date(2025, 4, 1)]);
}

#[tokio::test]
async fn hidden_calendar_is_neither_fetched_nor_shown() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    let home = create_calendar(&api, "Home").await;
    let calendars = vec![work.clone(), home.clone()];
    let day = date(2025, 3, 12);

    schedule(&api, &calendars, work.id, "Review", vec![TimeBlockInput::new(day, time(9, 0), time(10, 0))]).await;
    schedule(&api, &calendars, home.id, "Groceries", vec![TimeBlockInput::new(day, time(18, 0), time(19, 0))]).await;

    let mut visible = VisibleCalendars::all(&calendars);
    let both = aggregate_month(&api, &calendars, &visible, 2025, 3).await.unwrap();
    assert_eq!(both.events.visible_on(day, &visible).len(), 2);

    visible.toggle(home.id);
    assert!(both.events.visible_on(day, &visible).iter().all(|e| e.calendar_id == work.id));

    let only_work = aggregate_month(&api, &calendars, &visible, 2025, 3).await.unwrap();
    let titles: Vec<_> = only_work.events.events_on(day).iter().map(|e| e.title.clone()).collect();
    assert_eq!(titles, vec!["Review"]);
    assert_eq!(api.fetched(), vec![work.id, home.id, work.id]);
}

#[tokio::test]
async fn failing_calendar_yields_partial_result() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    let home = create_calendar(&api, "Home").await;
    let calendars = vec![work.clone(), home.clone()];
    schedule(&api, &calendars, work.id, "Review", vec![
        TimeBlockInput::new(date(2025, 3, 12), time(9, 0), time(10, 0)),
    ])
    .await;
    api.break_calendar(home.id);

    let aggregate = aggregate_month(&api, &calendars, &VisibleCalendars::all(&calendars), 2025, 3)
        .await
        .unwrap();

    assert_eq!(aggregate.events.len(), 1);
    assert_eq!(aggregate.succeeded, vec![work.id]);
    assert_eq!(aggregate.failure_summary().as_deref(), Some("Could not load: Home"));
}

#[tokio::test]
async fn deleting_a_block_removes_it_from_the_month() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    let calendars = vec![work.clone()];
    let visible = VisibleCalendars::all(&calendars);
    schedule(&api, &calendars, work.id, "Dentist", vec![
        TimeBlockInput::new(date(2025, 3, 5), time(8, 0), time(9, 0)),
    ])
    .await;

    let before = aggregate_month(&api, &calendars, &visible, 2025, 3).await.unwrap();
    let block = before.events.events_on(date(2025, 3, 5))[0].clone();

    let mut confirmation = DeleteConfirmation::new(DeleteTarget::TimeBlock {
        time_id: block.id,
        title: block.title.clone(),
    });
    confirmation.confirm(&api).await.unwrap();

    let after = aggregate_month(&api, &calendars, &visible, 2025, 3).await.unwrap();
    assert!(after.events.is_empty());
}

#[tokio::test]
async fn sync_engine_agenda_lists_the_day() {
    let api = FakeApi::default();
    let work = create_calendar(&api, "Work").await;
    schedule(&api, &[work.clone()], work.id, "Standup", vec![
        TimeBlockInput::new(date(2025, 3, 12), time(9, 0), time(9, 15)),
        TimeBlockInput::new(date(2025, 3, 13), time(9, 0), time(9, 15)),
    ])
    .await;

    let engine = SyncEngine::with_api(Config::default(), Box::new(api.clone()));
    let agenda = engine.load_agenda(date(2025, 3, 13)).await.unwrap();

    assert_eq!(agenda.calendars, vec![work]);
    assert_eq!(agenda.events.len(), 1);
    assert_eq!(agenda.events[0].date, date(2025, 3, 13));
    assert!(agenda.failed.is_empty());
}
