use async_trait::async_trait;
use chrono::{DateTime, Datelike, Months, Utc};
use pitchbot_core::{PitchbotError, PitchbotResult, Session};
use pitchbot_google::CalendarClient;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Upper bound on sessions fetched into the catalog.
pub const MAX_SESSIONS: usize = 50;

/// Source of session data for the catalog.
///
/// The catalog owns the fetch window and cap; a source only has to answer
/// one bounded query. Implemented for [`CalendarClient`] in production and
/// by fixed fixtures in tests.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Returns sessions starting within `[time_min, time_max)`, ordered by
    /// start time ascending, at most `max_results` of them.
    async fn sessions_between(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: usize,
    ) -> PitchbotResult<Vec<Session>>;
}

#[async_trait]
impl CalendarSource for CalendarClient {
    async fn sessions_between(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: usize,
    ) -> PitchbotResult<Vec<Session>> {
        self.events_between(time_min, time_max, max_results).await
    }
}

/// Process-lifetime cache of upcoming sessions.
///
/// The first call to [`sessions`](SessionCatalog::sessions) fetches the
/// rolling window (today through the first day of the month after next) from
/// the calendar source; every later call returns the identical cached slice.
/// There is no TTL and no invalidation: staleness is bounded only by process
/// restart cadence, which is the deliberate contract. A failed first fetch
/// leaves the cache unpopulated, so the next call tries again.
pub struct SessionCatalog {
    source: Arc<dyn CalendarSource>,
    cached: OnceCell<Vec<Session>>,
}

impl SessionCatalog {
    /// Creates an empty catalog over the given source.
    pub fn new(source: Arc<dyn CalendarSource>) -> Self {
        Self {
            source,
            cached: OnceCell::new(),
        }
    }

    /// Returns the cached sessions, fetching them on first use.
    pub async fn sessions(&self) -> PitchbotResult<&[Session]> {
        let sessions = self
            .cached
            .get_or_try_init(|| async {
                let (time_min, time_max) = fetch_window(Utc::now())?;
                let sessions = self
                    .source
                    .sessions_between(time_min, time_max, MAX_SESSIONS)
                    .await?;
                info!(count = sessions.len(), "Session catalog populated");
                Ok::<_, PitchbotError>(sessions)
            })
            .await?;
        Ok(sessions.as_slice())
    }
}

/// Computes the fetch window: today at midnight UTC through the first day of
/// the month two calendar months from now.
fn fetch_window(now: DateTime<Utc>) -> PitchbotResult<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.date_naive();
    let month_first = today
        .with_day(1)
        .ok_or_else(|| PitchbotError::Calendar("invalid current date".to_string()))?;
    let window_end = month_first
        .checked_add_months(Months::new(2))
        .ok_or_else(|| PitchbotError::Calendar("fetch window out of range".to_string()))?;
    let midnight = |d: chrono::NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .ok_or_else(|| PitchbotError::Calendar("invalid midnight".to_string()))
    };
    Ok((midnight(today)?, midnight(window_end)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fetch_window_mid_month() {
        let now = Utc.with_ymd_and_hms(2020, 4, 26, 8, 22, 0).unwrap();
        let (min, max) = fetch_window(now).unwrap();
        assert_eq!(min, Utc.with_ymd_and_hms(2020, 4, 26, 0, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_fetch_window_year_rollover() {
        let now = Utc.with_ymd_and_hms(2020, 12, 15, 23, 59, 59).unwrap();
        let (min, max) = fetch_window(now).unwrap();
        assert_eq!(min, Utc.with_ymd_and_hms(2020, 12, 15, 0, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_fetch_window_first_of_month() {
        let now = Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap();
        let (min, max) = fetch_window(now).unwrap();
        assert_eq!(min, Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2021, 9, 1, 0, 0, 0).unwrap());
    }
}
