pub mod aggregator;
pub mod api;
pub mod auth;
pub mod sync_engine;

pub use aggregator::{CalendarFailure, MonthAggregate};
pub use api::{ApiError, CalendarApi, PlanifyClient};
pub use auth::{AuthContext, AuthError, TokenInfo, TokenStorage};
pub use sync_engine::{DayAgenda, SyncEngine, SyncError};
