//! Wire shapes exchanged with the Planify backend.
//!
//! Every request and response body the client touches is declared here once,
//! so the forms, the aggregator and the HTTP client all agree on field names.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar-local timestamp as the backend stores it. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeVO {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl DateTimeVO {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.year == year && self.month == month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntity {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    pub calendar_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntity {
    pub id: i64,
    pub start_time: DateTimeVO,
    pub end_time: DateTimeVO,
    pub event_id: i64,
}

/// One event together with all of its time blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTimes {
    pub event: EventEntity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub times: Vec<TimeEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsTimesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events_times: Vec<EventTimes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendar {
    pub name: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub calendar_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTime {
    pub start_time: DateTimeVO,
    pub end_time: DateTimeVO,
    pub event_id: i64,
}

impl NewTime {
    /// Both ends of a block live on the same calendar day.
    pub fn on_date(date: NaiveDate, start: NaiveTime, end: NaiveTime, event_id: i64) -> Self {
        Self {
            start_time: DateTimeVO::new(date, start),
            end_time: DateTimeVO::new(date, end),
            event_id,
        }
    }
}

/// The create-event endpoint answers with `{"id": ..}`, `{"event_id": ..}`
/// or a bare integer depending on the backend version.
pub fn parse_created_id(value: &serde_json::Value) -> Option<i64> {
    value
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .or_else(|| value.get("event_id").and_then(serde_json::Value::as_i64))
        .or_else(|| value.as_i64())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
