use crate::auth::AccessTokenProvider;
use chrono::{DateTime, FixedOffset, Utc};
use pitchbot_core::{PitchbotError, PitchbotResult, Session};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

// ── Calendar API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvent {
    #[serde(default)]
    summary: String,
    start: EventTime,
    end: EventTime,
}

#[derive(Debug, Deserialize)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: Option<DateTime<FixedOffset>>,
}

// ── Implementation ──────────────────────────────────────────────────────────

/// Google Calendar client for one fixed calendar.
///
/// Wraps the `events.list` endpoint; the calendar id is a deployment-time
/// constant, not a per-request parameter.
pub struct CalendarClient {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
    base_url: String,
    calendar_id: String,
}

impl CalendarClient {
    /// Creates a client for the given calendar.
    pub fn new(tokens: Arc<dyn AccessTokenProvider>, calendar_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            calendar_id: calendar_id.into(),
        }
    }

    /// Overrides the API base URL. Intended for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches events starting within `[time_min, time_max)`, expanded to
    /// single events and ordered by start time ascending.
    ///
    /// All-day events (no `dateTime`) are skipped; the bot only schedules
    /// timed sessions.
    pub async fn events_between(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: usize,
    ) -> PitchbotResult<Vec<Session>> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/calendars/{}/events", self.base_url, self.calendar_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("maxResults", max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PitchbotError::Calendar(format!("events.list error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PitchbotError::Calendar(format!(
                "events.list failed with {status}: {body}"
            )));
        }

        let body: EventsListResponse = response
            .json()
            .await
            .map_err(|e| PitchbotError::Calendar(format!("events.list parse error: {e}")))?;

        let sessions: Vec<Session> = body
            .items
            .into_iter()
            .filter_map(|event| {
                let start = event.start.date_time?;
                let end = event.end.date_time?;
                Some(Session::new(start, end, event.summary))
            })
            .collect();

        debug!(count = sessions.len(), "Fetched calendar sessions");
        Ok(sessions)
    }
}
