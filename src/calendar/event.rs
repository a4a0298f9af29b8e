use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::VisibleCalendars;

/// One time block of an event, projected onto the day it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEvent {
    /// Id of the time block, not of the event.
    pub id: i64,
    pub event_id: i64,
    pub calendar_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl DayEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn time_range_label(&self) -> String {
        format!(
            "{}–{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// What the edit modal needs to re-open a block for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableEvent {
    pub time_id: i64,
    pub event_id: i64,
    pub calendar_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<&DayEvent> for EditableEvent {
    fn from(event: &DayEvent) -> Self {
        Self {
            time_id: event.id,
            event_id: event.event_id,
            calendar_id: event.calendar_id,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
        }
    }
}

/// Per-day lists of events, each list ordered by start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayEventIndex {
    days: BTreeMap<NaiveDate, Vec<DayEvent>>,
}

impl DayEventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: DayEvent) {
        let day = self.days.entry(event.date).or_default();
        let at = day.partition_point(|e| e.start_time <= event.start_time);
        day.insert(at, event);
    }

    pub fn extend<I: IntoIterator<Item = DayEvent>>(&mut self, events: I) {
        for event in events {
            self.insert(event);
        }
    }

    pub fn events_on(&self, date: NaiveDate) -> &[DayEvent] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible_on(&self, date: NaiveDate, visible: &VisibleCalendars) -> Vec<&DayEvent> {
        self.events_on(date)
            .iter()
            .filter(|e| visible.is_visible(e.calendar_id))
            .collect()
    }

    pub fn find(&self, time_id: i64) -> Option<&DayEvent> {
        self.days.values().flatten().find(|e| e.id == time_id)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::UserCalendar;
    use pretty_assertions::assert_eq;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn day_event(id: i64, calendar_id: i64, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> DayEvent {
        DayEvent {
            id,
            event_id: id * 10,
            calendar_id,
            title: format!("Block {}", id),
            description: "Notes".to_string(),
            location: "Room 4".to_string(),
            date,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn duration_and_label_use_clock_times() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let event = day_event(1, 1, date, time(9, 5), time(10, 35));

        assert_eq!(event.duration_minutes(), 90);
        assert_eq!(event.time_range_label(), "09:05–10:35");
        assert_eq!(event.date_key(), "2025-05-02");
    }

    #[test]
    fn editable_event_copies_every_field() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let event = day_event(3, 8, date, time(13, 0), time(14, 15));

        let editable = EditableEvent::from(&event);

        assert_eq!(editable.time_id, 3);
        assert_eq!(editable.event_id, 30);
        assert_eq!(editable.calendar_id, 8);
        assert_eq!(editable.title, event.title);
        assert_eq!(editable.description, event.description);
        assert_eq!(editable.location, event.location);
        assert_eq!(editable.date, date);
        assert_eq!(editable.start_time, event.start_time);
        assert_eq!(editable.end_time, event.end_time);
    }

    #[test]
    fn index_keeps_each_day_sorted_by_start() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let mut index = DayEventIndex::new();

        index.insert(day_event(1, 1, date, time(15, 0), time(16, 0)));
        index.insert(day_event(2, 1, date, time(8, 30), time(9, 0)));
        index.insert(day_event(3, 1, date, time(11, 0), time(12, 0)));

        let starts: Vec<_> = index.events_on(date).iter().map(|e| e.start_time).collect();
        assert_eq!(starts, vec![time(8, 30), time(11, 0), time(15, 0)]);
    }

    #[test]
    fn equal_starts_keep_insertion_order() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let mut index = DayEventIndex::new();

        index.insert(day_event(1, 1, date, time(9, 0), time(10, 0)));
        index.insert(day_event(2, 1, date, time(9, 0), time(9, 30)));

        let ids: Vec<_> = index.events_on(date).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn visible_on_filters_hidden_calendars() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let calendars = vec![
            UserCalendar { id: 1, name: "Work".into(), description: String::new(), color: "#fff000".into() },
            UserCalendar { id: 2, name: "Home".into(), description: String::new(), color: "#000fff".into() },
        ];
        let mut visible = VisibleCalendars::all(&calendars);
        let mut index = DayEventIndex::new();
        index.insert(day_event(1, 1, date, time(9, 0), time(10, 0)));
        index.insert(day_event(2, 2, date, time(11, 0), time(12, 0)));

        visible.toggle(1);

        let shown: Vec<_> = index.visible_on(date, &visible).iter().map(|e| e.id).collect();
        assert_eq!(shown, vec![2]);
        assert_eq!(index.events_on(date).len(), 2);
    }

    #[test]
    fn find_locates_block_by_time_id() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let mut index = DayEventIndex::new();
        index.insert(day_event(7, 1, date, time(9, 0), time(10, 0)));

        assert_eq!(index.find(7).map(|e| e.event_id), Some(70));
        assert!(index.find(8).is_none());
        assert_eq!(index.len(), 1);
    }
}
