use crate::event::EventSource;
use pitchbot_core::{PitchbotError, PitchbotResult};
use pitchbot_line::{Action, CarouselColumn, LineClient, OutgoingMessage};
use pitchbot_reserve::{AttendanceReconciler, SessionCatalog};
use std::sync::Arc;
use tracing::info;

/// Trigger phrase for the profile command.
pub const PROFILE_TRIGGER: &str = "profile";
/// Trigger phrase for the schedule listing.
pub const SCHEDULE_TRIGGER: &str = "check schedule";
/// Trigger phrase for the reservation carousel.
pub const APPLY_TRIGGER: &str = "apply to join";
/// Prefix carried by reservation toggle payloads.
pub const RESERVE_PREFIX: &str = "reserve:";

const PROFILE_REFUSAL: &str = "Bot can't use profile API without user ID";
const STATUS_HINT: &str = "Check your reservations from the \"My status\" menu item⚽";

/// A recognized chat command.
///
/// Recognition is exact-string or fixed-prefix matching only; the carousel
/// buttons are the primary input path and free text is a low-volume fallback,
/// so no natural-language parsing is attempted.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Show the caller's profile.
    Profile,
    /// List all upcoming sessions.
    CheckSchedule,
    /// Render the reservation carousel.
    ApplyToJoin,
    /// Toggle attendance for the given session label.
    Reserve(&'a str),
    /// Anything unrecognized.
    Fallback,
}

impl<'a> Command<'a> {
    /// Maps inbound text to a command.
    pub fn parse(text: &'a str) -> Self {
        if text == PROFILE_TRIGGER {
            Self::Profile
        } else if text == SCHEDULE_TRIGGER {
            Self::CheckSchedule
        } else if text == APPLY_TRIGGER {
            Self::ApplyToJoin
        } else if let Some(label) = text.strip_prefix(RESERVE_PREFIX) {
            Self::Reserve(label)
        } else {
            Self::Fallback
        }
    }
}

/// Maps inbound chat text to reply messages.
///
/// Stateless across turns; the only shared state it touches is the session
/// catalog cache and, through the reconciler, the roster store.
pub struct CommandInterpreter {
    catalog: Arc<SessionCatalog>,
    reconciler: Arc<AttendanceReconciler>,
    line: Arc<LineClient>,
    contact_url: String,
}

impl CommandInterpreter {
    /// Creates an interpreter over its collaborators.
    pub fn new(
        catalog: Arc<SessionCatalog>,
        reconciler: Arc<AttendanceReconciler>,
        line: Arc<LineClient>,
        contact_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            reconciler,
            line,
            contact_url: contact_url.into(),
        }
    }

    /// Produces the reply messages for one inbound text.
    pub async fn handle_text(
        &self,
        text: &str,
        source: &EventSource,
    ) -> PitchbotResult<Vec<OutgoingMessage>> {
        match Command::parse(text) {
            Command::Profile => self.profile_reply(source).await,
            Command::CheckSchedule => self.schedule_reply().await,
            Command::ApplyToJoin => self.carousel_reply().await,
            Command::Reserve(label) => self.reserve_reply(source, label).await,
            Command::Fallback => Ok(vec![OutgoingMessage::text(format!(
                "Sorry, I only understand the menu commands.\nTo reach the organizer directly:\n→{}",
                self.contact_url
            ))]),
        }
    }

    async fn profile_reply(&self, source: &EventSource) -> PitchbotResult<Vec<OutgoingMessage>> {
        let Some(user_id) = source.individual_user_id() else {
            return Ok(vec![OutgoingMessage::text(PROFILE_REFUSAL)]);
        };
        let profile = self.line.profile(user_id).await?;
        Ok(vec![
            OutgoingMessage::text(format!("Display name: {}", profile.display_name)),
            OutgoingMessage::text(format!(
                "Status message: {}",
                profile.status_message.as_deref().unwrap_or("None")
            )),
        ])
    }

    async fn schedule_reply(&self) -> PitchbotResult<Vec<OutgoingMessage>> {
        let sessions = self.catalog.sessions().await?;
        let mut body = String::new();
        for session in sessions {
            body.push_str(&session.label());
            body.push('\n');
        }
        // An empty catalog yields an empty-body reply, not an error.
        Ok(vec![OutgoingMessage::text(body)])
    }

    async fn carousel_reply(&self) -> PitchbotResult<Vec<OutgoingMessage>> {
        let sessions = self.catalog.sessions().await?;
        let columns: Vec<CarouselColumn> = sessions
            .iter()
            .map(|session| CarouselColumn {
                title: session.time_label(),
                text: session.summary.clone(),
                actions: vec![Action::Message {
                    label: "Book/Cancel".to_string(),
                    text: format!("{RESERVE_PREFIX}{}", session.label()),
                }],
            })
            .collect();
        Ok(vec![OutgoingMessage::carousel("Book your session here", columns)])
    }

    async fn reserve_reply(
        &self,
        source: &EventSource,
        label: &str,
    ) -> PitchbotResult<Vec<OutgoingMessage>> {
        let user_id = source.individual_user_id().ok_or_else(|| {
            PitchbotError::Gateway("reservation toggle needs a resolvable user id".to_string())
        })?;
        let profile = self.line.profile(user_id).await?;
        let name = profile.display_name;

        let joined = self.reconciler.toggle(&name, label).await?;
        info!(name = %name, label = %label, joined, "Reservation toggled");

        let mut body = if joined {
            format!(
                "{name}\n\n[{label}] is booked❗\nTap the same session again if you need to cancel.\n\n"
            )
        } else {
            format!("{name}\n[{label}] has been cancelled❗\n\n")
        };
        body.push_str(STATUS_HINT);
        Ok(vec![OutgoingMessage::text(body)])
    }
}
