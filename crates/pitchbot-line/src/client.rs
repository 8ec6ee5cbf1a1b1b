use crate::message::OutgoingMessage;
use pitchbot_core::{PitchbotError, PitchbotResult};
use serde::{Deserialize, Serialize};
use tracing::error;

const DEFAULT_API_BASE: &str = "https://api.line.me";
const DEFAULT_DATA_BASE: &str = "https://api-data.line.me";

// ── LINE API types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutgoingMessage],
}

/// A user profile as returned by the Messaging API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The user's display name, which doubles as the roster key.
    pub display_name: String,
    /// The user's status message, if set.
    #[serde(default)]
    pub status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    property: String,
    #[serde(default)]
    message: String,
}

// ── Implementation ──────────────────────────────────────────────────────────

/// LINE Messaging API client.
///
/// Uses the channel access token as bearer auth. Errors carry the platform's
/// error message; per-property details are logged before the error is
/// returned, since callers swallow messaging failures.
pub struct LineClient {
    access_token: String,
    client: reqwest::Client,
    api_base: String,
    data_base: String,
}

impl LineClient {
    /// Creates a client with the given channel access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            data_base: DEFAULT_DATA_BASE.to_string(),
        }
    }

    /// Overrides both API base URLs. Intended for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        self.api_base = base.clone();
        self.data_base = base;
        self
    }

    async fn check_status(response: reqwest::Response, what: &str) -> PitchbotResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(err) = serde_json::from_str::<ApiErrorBody>(&body) {
            for detail in &err.details {
                error!(property = %detail.property, message = %detail.message, "LINE API error detail");
            }
            Err(PitchbotError::Messaging(format!(
                "{what} failed with {status}: {}",
                err.message
            )))
        } else {
            Err(PitchbotError::Messaging(format!(
                "{what} failed with {status}: {body}"
            )))
        }
    }

    /// Sends reply messages for the given reply token.
    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutgoingMessage],
    ) -> PitchbotResult<()> {
        let payload = ReplyRequest {
            reply_token,
            messages,
        };
        let response = self
            .client
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PitchbotError::Messaging(format!("reply error: {e}")))?;
        Self::check_status(response, "reply").await?;
        Ok(())
    }

    /// Fetches the profile of an individual user.
    pub async fn profile(&self, user_id: &str) -> PitchbotResult<Profile> {
        let response = self
            .client
            .get(format!("{}/v2/bot/profile/{user_id}", self.api_base))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PitchbotError::Messaging(format!("profile error: {e}")))?;
        let response = Self::check_status(response, "profile").await?;
        response
            .json()
            .await
            .map_err(|e| PitchbotError::Messaging(format!("profile parse error: {e}")))
    }

    /// Downloads the binary content of a received message (image, video,
    /// audio, or file).
    pub async fn message_content(&self, message_id: &str) -> PitchbotResult<Vec<u8>> {
        let response = self
            .client
            .get(format!(
                "{}/v2/bot/message/{message_id}/content",
                self.data_base
            ))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PitchbotError::Messaging(format!("content error: {e}")))?;
        let response = Self::check_status(response, "content").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PitchbotError::Messaging(format!("content read error: {e}")))?;
        Ok(bytes.to_vec())
    }
}
