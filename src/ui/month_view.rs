use chrono::{Datelike, NaiveDate};

use crate::app::AppState;
use crate::calendar::DayEvent;

/// A numbered day in the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub day: u32,
    pub date: NaiveDate,
}

impl GridDay {
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub const MAX_MARKERS: usize = 3;

/// Monday-first weeks; `None` cells pad the first and last week.
pub type MonthGrid = Vec<[Option<GridDay>; 7]>;

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// Builds the grid for `month0` (0 = January). An out-of-range month gives an
/// empty grid.
pub fn build_month_grid(year: i32, month0: u32) -> MonthGrid {
    let Some(month) = month0.checked_add(1) else {
        return Vec::new();
    };
    let (Some(first), Some(len)) = (NaiveDate::from_ymd_opt(year, month, 1), days_in_month(year, month))
    else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut column = first.weekday().num_days_from_monday() as usize;

    for (day, date) in (1..=len).zip(first.iter_days()) {
        week[column] = Some(GridDay { day, date });
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }

    weeks
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub day: Option<GridDay>,
    pub is_selected: bool,
    pub is_today: bool,
    pub in_visual_selection: bool,
    /// Visible events on this day, ordered by start time.
    pub events: Vec<DayEvent>,
}

impl DayCell {
    pub fn new(day: Option<GridDay>) -> Self {
        Self {
            day,
            is_selected: false,
            is_today: false,
            in_visual_selection: false,
            events: Vec::new(),
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    pub fn with_today(mut self, today: bool) -> Self {
        self.is_today = today;
        self
    }

    pub fn with_visual(mut self, in_selection: bool) -> Self {
        self.in_visual_selection = in_selection;
        self
    }

    pub fn with_events(mut self, events: Vec<DayEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.day.map(|d| d.date)
    }

    /// Events drawn in the cell and how many more are hidden behind "+N".
    pub fn markers(&self) -> (&[DayEvent], usize) {
        let shown = self.events.len().min(MAX_MARKERS);
        (&self.events[..shown], self.events.len() - shown)
    }
}

pub fn calculate_layout(state: &AppState) -> MonthLayout {
    let year = state.selected_date.year();
    let month = state.selected_date.month();

    let weeks = build_month_grid(year, month - 1)
        .into_iter()
        .map(|cells| Week {
            days: cells
                .into_iter()
                .map(|cell| match cell {
                    Some(day) => DayCell::new(Some(day))
                        .with_selected(day.date == state.selected_date)
                        .with_today(day.date == state.today)
                        .with_visual(state.is_date_in_visual_selection(day.date))
                        .with_events(state.visible_events_on(day.date).into_iter().cloned().collect()),
                    None => DayCell::new(None),
                })
                .collect(),
        })
        .collect();

    MonthLayout { year, month, weeks }
}
