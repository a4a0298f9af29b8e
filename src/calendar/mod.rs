pub mod calendar_type;
pub mod event;
pub mod schema;

pub use calendar_type::{
    CalendarOwner, DEFAULT_CALENDAR_COLOR, UserCalendar, VisibleCalendars, parse_hex_color,
};
pub use event::{DayEvent, DayEventIndex, EditableEvent};
pub use schema::{
    DateTimeVO, EventEntity, EventTimes, EventsTimesResponse, NewCalendar, NewEvent, NewTime,
    TimeEntity,
};
