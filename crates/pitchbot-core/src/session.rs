use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The roster store's local timezone (UTC+9).
///
/// Session labels and roster timestamps are rendered in this offset so the
/// strings in the spreadsheet match what members see in the chat UI.
pub fn jst() -> FixedOffset {
    match FixedOffset::east_opt(9 * 3600) {
        Some(offset) => offset,
        None => unreachable!("UTC+9 is a valid fixed offset"),
    }
}

/// One scheduled play event, sourced from the calendar collaborator.
///
/// Sessions are constructed fresh from each calendar fetch, are immutable,
/// and live only inside the session catalog cache for the process lifetime.
/// The display [`label`](Session::label) doubles as the session identifier
/// stored in roster attendance cells; there is no separate opaque ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Start of the session, normalized to JST.
    pub start: DateTime<FixedOffset>,
    /// End of the session, normalized to JST.
    pub end: DateTime<FixedOffset>,
    /// Human-readable title from the calendar event.
    pub summary: String,
}

impl Session {
    /// Creates a session, normalizing both timestamps to JST.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            start: start.with_timezone(&jst()),
            end: end.with_timezone(&jst()),
            summary: summary.into(),
        }
    }

    /// The date/time-range part of the label, e.g. `4/26(Sun) 19～21`.
    ///
    /// Month, day, and hours carry no zero padding; the weekday is the
    /// English three-letter abbreviation.
    pub fn time_label(&self) -> String {
        format!(
            "{}{}",
            self.start.format("%-m/%-d(%a) %-H～"),
            self.end.format("%-H")
        )
    }

    /// The full display label, e.g. `4/26(Sun) 19～21 Futsal @ Chidoricho`.
    ///
    /// This string is the de facto session identifier: it is what the
    /// carousel payload carries and what gets written into attendance cells.
    pub fn label(&self) -> String {
        format!("{} {}", self.time_label(), self.summary)
    }
}
