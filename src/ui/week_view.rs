use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};

use crate::app::AppState;
use crate::calendar::DayEvent;
use crate::storage::config::WeekConfig;

/// Scale of the week column: visible hours, units per hour and the minimum
/// block length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekGeometry {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub slot_height: f64,
    pub min_block_minutes: u32,
}

impl Default for WeekGeometry {
    fn default() -> Self {
        Self {
            day_start_hour: 7,
            day_end_hour: 23,
            slot_height: 80.0,
            min_block_minutes: 15,
        }
    }
}

impl WeekGeometry {
    /// Terminal geometry: one unit is one row.
    pub fn from_config(config: &WeekConfig) -> Self {
        Self {
            day_start_hour: config.day_start_hour,
            day_end_hour: config.day_end_hour,
            slot_height: f64::from(config.rows_per_hour),
            min_block_minutes: config.min_block_minutes,
        }
    }

    pub fn column_height(&self) -> f64 {
        f64::from(self.day_end_hour.saturating_sub(self.day_start_hour)) * self.slot_height
    }

    pub fn hours(&self) -> std::ops::Range<u32> {
        self.day_start_hour..self.day_end_hour
    }
}

/// Vertical placement of a block, in the geometry's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPosition {
    pub top: f64,
    pub height: f64,
}

fn hours_of(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

/// Places a block in the hour column. The end is clamped to the end of the
/// visible day; an empty or inverted range gets the minimum duration.
pub fn position_block(start: NaiveTime, end: NaiveTime, geometry: &WeekGeometry) -> BlockPosition {
    let start = hours_of(start);
    let end = hours_of(end).min(f64::from(geometry.day_end_hour));

    let mut duration = end - start;
    if duration <= 0.0 {
        duration = f64::from(geometry.min_block_minutes) / 60.0;
    }

    BlockPosition {
        top: (start - f64::from(geometry.day_start_hour)) * geometry.slot_height,
        height: duration * geometry.slot_height,
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(days_from_monday))
        .unwrap_or(date)
}

/// The Monday-to-Sunday dates of the week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = week_start(date);
    (0..7u64)
        .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub geometry: WeekGeometry,
    pub days: Vec<DayColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub blocks: Vec<EventBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock {
    pub event: DayEvent,
    pub position: BlockPosition,
    pub is_selected: bool,
}

pub fn calculate_layout(state: &AppState) -> WeekLayout {
    let geometry = WeekGeometry::from_config(&state.week);
    let selected_id = state.get_selected_event().map(|e| e.id);

    let days = week_days(state.selected_date)
        .into_iter()
        .map(|date| DayColumn {
            date,
            is_selected: date == state.selected_date,
            is_today: date == state.today,
            blocks: state
                .visible_events_on(date)
                .into_iter()
                .map(|event| EventBlock {
                    position: position_block(event.start_time, event.end_time, &geometry),
                    is_selected: date == state.selected_date && Some(event.id) == selected_id,
                    event: event.clone(),
                })
                .collect(),
        })
        .collect();

    WeekLayout {
        week_start: week_start(state.selected_date),
        geometry,
        days,
    }
}
