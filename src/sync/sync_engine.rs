use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::calendar::{DayEvent, UserCalendar, VisibleCalendars};
use crate::storage::config::Config;
use crate::sync::aggregator::{CalendarFailure, MonthAggregate, aggregate_month, aggregate_months};
use crate::sync::api::{ApiError, CalendarApi, PlanifyClient, SESSION_EXPIRED_MESSAGE};
use crate::sync::auth::{AuthContext, AuthError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
}

impl SyncError {
    pub fn is_session_error(&self) -> bool {
        match self {
            SyncError::AuthError(_) => true,
            SyncError::ApiError(e) => e.is_session_error(),
        }
    }

    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SyncError::AuthError(_) => SESSION_EXPIRED_MESSAGE.to_string(),
            SyncError::ApiError(e) => e.user_message(fallback),
        }
    }
}

/// One day's events across all calendars, for the agenda printout.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub calendars: Vec<UserCalendar>,
    pub events: Vec<DayEvent>,
    pub failed: Vec<CalendarFailure>,
}

pub struct SyncEngine {
    config: Config,
    api: Box<dyn CalendarApi>,
}

impl SyncEngine {
    pub fn new(config: Config, auth: AuthContext) -> Self {
        let client = PlanifyClient::new(config.api.base_url.clone(), auth)
            .with_timeout(Duration::from_secs(config.api.request_timeout_secs));
        Self::with_api(config, Box::new(client))
    }

    pub fn with_api(config: Config, api: Box<dyn CalendarApi>) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &dyn CalendarApi {
        self.api.as_ref()
    }

    pub async fn load_calendars(&self) -> Result<Vec<UserCalendar>, SyncError> {
        let calendars = self.api.list_calendars(self.config.calendar_owner()).await?;
        Ok(calendars)
    }

    /// `month` is 1-based.
    pub async fn load_month(
        &self,
        calendars: &[UserCalendar],
        visible: &VisibleCalendars,
        year: i32,
        month: u32,
    ) -> Result<MonthAggregate, SyncError> {
        let aggregate = aggregate_month(self.api(), calendars, visible, year, month).await?;
        Ok(aggregate)
    }

    /// Every month a view touches, merged into one aggregate.
    pub async fn load_months(
        &self,
        calendars: &[UserCalendar],
        visible: &VisibleCalendars,
        months: &[(i32, u32)],
    ) -> Result<MonthAggregate, SyncError> {
        let aggregate = aggregate_months(self.api(), calendars, visible, months).await?;
        Ok(aggregate)
    }

    pub async fn load_agenda(&self, date: NaiveDate) -> Result<DayAgenda, SyncError> {
        let calendars = self.load_calendars().await?;
        let visible = VisibleCalendars::all(&calendars);
        let aggregate = self
            .load_month(&calendars, &visible, date.year(), date.month())
            .await?;

        Ok(DayAgenda {
            date,
            events: aggregate.events.events_on(date).to_vec(),
            failed: aggregate.failed,
            calendars,
        })
    }
}
