use futures::future::join_all;

use crate::calendar::{DayEvent, DayEventIndex, EventsTimesResponse, UserCalendar, VisibleCalendars};
use crate::sync::api::{ApiError, CalendarApi};

/// A calendar whose events could not be fetched for the displayed month.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarFailure {
    pub calendar_id: i64,
    pub name: String,
    pub reason: String,
}

/// Events of one or more months across every visible calendar, plus a record
/// of which calendars contributed and which did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthAggregate {
    /// `(year, month)` pairs covered, 1-based months, in order.
    pub months: Vec<(i32, u32)>,
    pub events: DayEventIndex,
    pub succeeded: Vec<i64>,
    pub failed: Vec<CalendarFailure>,
}

impl MonthAggregate {
    pub fn empty(year: i32, month: u32) -> Self {
        Self::covering(&[(year, month)])
    }

    pub fn covering(months: &[(i32, u32)]) -> Self {
        Self {
            months: months.to_vec(),
            ..Self::default()
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Status line text naming the calendars that could not be loaded.
    pub fn failure_summary(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failed.iter().map(|f| f.name.as_str()).collect();
        Some(format!("Could not load: {}", names.join(", ")))
    }
}

/// Flattens one calendar's events into day events for `year`/`month`. Blocks
/// are kept when their start falls in that month; blocks whose timestamps do
/// not form a real date or time are dropped.
pub fn project_month(response: &EventsTimesResponse, year: i32, month: u32) -> Vec<DayEvent> {
    let mut events = Vec::new();

    for entry in &response.events_times {
        let event = &entry.event;
        for time in &entry.times {
            if !time.start_time.is_in_month(year, month) {
                continue;
            }
            let (Some(date), Some(start_time), Some(end_time)) = (
                time.start_time.date(),
                time.start_time.time(),
                time.end_time.time(),
            ) else {
                tracing::warn!(
                    "Skipping time block {} of event {}: invalid timestamp {:?} - {:?}",
                    time.id,
                    event.id,
                    time.start_time,
                    time.end_time
                );
                continue;
            };

            events.push(DayEvent {
                id: time.id,
                event_id: event.id,
                calendar_id: event.calendar_id,
                title: event.title.clone(),
                description: event.description.clone(),
                location: event.location.clone(),
                date,
                start_time,
                end_time,
            });
        }
    }

    events
}

/// Fetches every visible calendar concurrently and merges the results.
///
/// A calendar that fails is logged and listed in `failed`; the others still
/// contribute. A session error is returned as-is since no call can succeed
/// until the user logs in again.
pub async fn aggregate_month(
    api: &dyn CalendarApi,
    calendars: &[UserCalendar],
    visible: &VisibleCalendars,
    year: i32,
    month: u32,
) -> Result<MonthAggregate, ApiError> {
    aggregate_months(api, calendars, visible, &[(year, month)]).await
}

/// Like [`aggregate_month`] for several months at once, such as a week that
/// straddles two. Each calendar is fetched once.
pub async fn aggregate_months(
    api: &dyn CalendarApi,
    calendars: &[UserCalendar],
    visible: &VisibleCalendars,
    months: &[(i32, u32)],
) -> Result<MonthAggregate, ApiError> {
    let targets: Vec<&UserCalendar> = calendars
        .iter()
        .filter(|c| visible.is_visible(c.id))
        .collect();
    tracing::info!(
        "Fetching {:?} for {} visible calendars",
        months,
        targets.len()
    );

    let results = join_all(targets.iter().map(|calendar| async move {
        (*calendar, api.calendar_events_times(calendar.id).await)
    }))
    .await;

    let mut aggregate = MonthAggregate::covering(months);
    for (calendar, result) in results {
        match result {
            Ok(response) => {
                for &(year, month) in months {
                    aggregate
                        .events
                        .extend(project_month(&response, year, month));
                }
                aggregate.succeeded.push(calendar.id);
            }
            Err(e) if e.is_session_error() => return Err(e),
            Err(e) => {
                tracing::warn!("Failed to load calendar {} ({}): {}", calendar.id, calendar.name, e);
                aggregate.failed.push(CalendarFailure {
                    calendar_id: calendar.id,
                    name: calendar.name.clone(),
                    reason: e.user_message("Could not load events."),
                });
            }
        }
    }

    tracing::info!(
        "Loaded {} events ({} calendars ok, {} failed)",
        aggregate.events.len(),
        aggregate.succeeded.len(),
        aggregate.failed.len()
    );
    Ok(aggregate)
}
