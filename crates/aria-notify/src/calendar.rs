//! Advisor-callback calendar events.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use crate::NotifyError;

/// Calendar provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Provider endpoint for event creation. Empty means the calendar is
    /// disabled.
    #[serde(default)]
    pub api_url: String,

    /// Provider API key.
    #[serde(default)]
    pub api_key: String,

    /// Target calendar identifier.
    #[serde(default)]
    pub calendar_id: String,

    /// IANA timezone attached to created events.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            calendar_id: String::new(),
            timezone: default_timezone(),
        }
    }
}

/// A callback slot to create on the advisors' calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One-shot calendar event creation.
#[async_trait]
pub trait CalendarTransport: Send + Sync {
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), NotifyError>;
}

/// HTTP calendar transport posting events to the provider API.
pub struct HttpCalendar {
    config: CalendarConfig,
    client: reqwest::Client,
}

impl HttpCalendar {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CalendarTransport for HttpCalendar {
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), NotifyError> {
        if self.config.api_url.is_empty() || self.config.calendar_id.is_empty() {
            return Err(NotifyError::NotConfigured("calendar"));
        }

        let payload = json!({
            "calendarId": self.config.calendar_id,
            "summary": event.summary,
            "description": event.description,
            "start": {
                "dateTime": event.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.config.timezone,
            },
            "end": {
                "dateTime": event.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.config.timezone,
            },
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "calendar provider rejected the event");
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::info!(summary = %event.summary, "calendar event created");
        Ok(())
    }
}
