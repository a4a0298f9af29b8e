use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CALENDAR_COLOR: &str = "#1e90ff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCalendar {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CALENDAR_COLOR.to_string()
}

/// Parses `#RRGGBB` into its channels.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Whose calendars to list: the session user or a specific user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarOwner {
    Me,
    User(i64),
}

impl CalendarOwner {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "me" => Some(Self::Me),
            other => other.parse().ok().map(Self::User),
        }
    }
}

impl fmt::Display for CalendarOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Me => write!(f, "me"),
            Self::User(id) => write!(f, "{}", id),
        }
    }
}

/// Ids of the calendars currently shown in the grids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleCalendars {
    ids: HashSet<i64>,
}

impl VisibleCalendars {
    pub fn all(calendars: &[UserCalendar]) -> Self {
        Self {
            ids: calendars.iter().map(|c| c.id).collect(),
        }
    }

    pub fn is_visible(&self, calendar_id: i64) -> bool {
        self.ids.contains(&calendar_id)
    }

    /// Returns the new visibility of `calendar_id`.
    pub fn toggle(&mut self, calendar_id: i64) -> bool {
        if self.ids.remove(&calendar_id) {
            false
        } else {
            self.ids.insert(calendar_id);
            true
        }
    }

    /// Calendars that appeared since the last load start out visible; ids of
    /// calendars that no longer exist are dropped.
    pub fn sync_with(&mut self, previous: &[UserCalendar], current: &[UserCalendar]) {
        self.ids.retain(|id| current.iter().any(|c| c.id == *id));
        for calendar in current {
            if !previous.iter().any(|p| p.id == calendar.id) {
                self.ids.insert(calendar.id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
