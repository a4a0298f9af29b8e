use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::calendar::schema::parse_created_id;
use crate::calendar::{
    CalendarOwner, EventsTimesResponse, NewCalendar, NewEvent, NewTime, UserCalendar,
};
use crate::sync::auth::{AuthContext, AuthError};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, log in again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Session error: {0}")]
    Auth(#[from] AuthError),
    #[error("Session rejected by the server")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Backend error (status {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Backend {
        status: u16,
        detail: Option<String>,
    },
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ApiError {
    pub fn is_session_error(&self) -> bool {
        matches!(self, ApiError::Auth(_) | ApiError::Unauthorized)
    }

    /// Text shown to the user: a re-login prompt for session problems, the
    /// backend's own `detail` when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            _ if self.is_session_error() => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Backend { detail: Some(detail), .. } => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn list_calendars(&self, owner: CalendarOwner) -> Result<Vec<UserCalendar>, ApiError>;

    async fn calendar_events_times(&self, calendar_id: i64) -> Result<EventsTimesResponse, ApiError>;

    async fn create_calendar(&self, calendar: &NewCalendar) -> Result<(), ApiError>;

    async fn update_calendar(&self, calendar_id: i64, calendar: &NewCalendar) -> Result<(), ApiError>;

    async fn delete_calendar(&self, calendar_id: i64) -> Result<(), ApiError>;

    /// Returns the id of the new event.
    async fn create_event(&self, event: &NewEvent) -> Result<i64, ApiError>;

    async fn update_event(&self, event_id: i64, event: &NewEvent) -> Result<(), ApiError>;

    async fn create_time(&self, time: &NewTime) -> Result<(), ApiError>;

    async fn update_time(&self, time_id: i64, time: &NewTime) -> Result<(), ApiError>;

    async fn delete_time(&self, time_id: i64) -> Result<(), ApiError>;
}

pub struct PlanifyClient {
    base_url: String,
    auth: AuthContext,
    client: reqwest::Client,
}

impl PlanifyClient {
    pub fn new(base_url: impl Into<String>, auth: AuthContext) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => tracing::warn!("Keeping default HTTP client, timeout not applied: {}", e),
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.auth.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let response = self.request(method, path)?.json(body).send().await?;
        check_status(response, path).await
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        let response = self.request(method, path)?.send().await?;
        check_status(response, path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::ParseError(format!("{}: {}", path, e)))
    }
}

async fn check_status(response: Response, path: &str) -> Result<Response, ApiError> {
    let status = response.status();
    tracing::info!("{} -> {}", path, status);

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!("Session rejected for {}", path);
        return Err(ApiError::Unauthorized);
    }

    if status == StatusCode::NOT_FOUND {
        tracing::error!("Not found: {}", path);
        return Err(ApiError::NotFound(path.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("Request to {} failed. Status: {}, Body: {}", path, status, body);
    Err(ApiError::Backend {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

/// Pulls the `detail` field out of an error body. Validation errors carry a
/// structured detail, which is kept as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl CalendarApi for PlanifyClient {
    async fn list_calendars(&self, owner: CalendarOwner) -> Result<Vec<UserCalendar>, ApiError> {
        let calendars: Vec<UserCalendar> = self
            .get_json(&format!("/calendars/get_all_calendars/{}", owner))
            .await?;
        tracing::info!("Loaded {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn calendar_events_times(&self, calendar_id: i64) -> Result<EventsTimesResponse, ApiError> {
        self.get_json(&format!("/calendars/get_calendar_events_times/{}", calendar_id))
            .await
    }

    async fn create_calendar(&self, calendar: &NewCalendar) -> Result<(), ApiError> {
        tracing::info!("Creating calendar: {}", calendar.name);
        self.send_json(Method::POST, "/calendars/create_calendar", calendar)
            .await?;
        Ok(())
    }

    async fn update_calendar(&self, calendar_id: i64, calendar: &NewCalendar) -> Result<(), ApiError> {
        tracing::info!("Updating calendar {}: {}", calendar_id, calendar.name);
        self.send_json(
            Method::PUT,
            &format!("/calendars/update_calendar/{}", calendar_id),
            calendar,
        )
        .await?;
        Ok(())
    }

    async fn delete_calendar(&self, calendar_id: i64) -> Result<(), ApiError> {
        tracing::info!("Deleting calendar {}", calendar_id);
        self.send(Method::DELETE, &format!("/calendars/delete_calendar/{}", calendar_id))
            .await?;
        Ok(())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<i64, ApiError> {
        tracing::info!("Creating event: {}", event.title);
        tracing::debug!("create_event payload: {:?}", event);
        let response = self
            .send_json(Method::POST, "/events/create_event", event)
            .await?;
        let body: serde_json::Value = response.json().await?;
        let id = parse_created_id(&body).ok_or_else(|| {
            ApiError::ParseError(format!("create_event returned no event id: {}", body))
        })?;
        tracing::info!("Event created with id {}", id);
        Ok(id)
    }

    async fn update_event(&self, event_id: i64, event: &NewEvent) -> Result<(), ApiError> {
        tracing::info!("Updating event {}: {}", event_id, event.title);
        self.send_json(Method::PUT, &format!("/events/update_event/{}", event_id), event)
            .await?;
        Ok(())
    }

    async fn create_time(&self, time: &NewTime) -> Result<(), ApiError> {
        tracing::debug!("create_time payload: {:?}", time);
        self.send_json(Method::POST, "/times/create_time", time).await?;
        Ok(())
    }

    async fn update_time(&self, time_id: i64, time: &NewTime) -> Result<(), ApiError> {
        tracing::debug!("update_time {} payload: {:?}", time_id, time);
        self.send_json(Method::PUT, &format!("/times/update_time/{}", time_id), time)
            .await?;
        Ok(())
    }

    async fn delete_time(&self, time_id: i64) -> Result<(), ApiError> {
        tracing::info!("Deleting time block {}", time_id);
        self.send(Method::DELETE, &format!("/times/delete_time/{}", time_id))
            .await?;
        Ok(())
    }
}
