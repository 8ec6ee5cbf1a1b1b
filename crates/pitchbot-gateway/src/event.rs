use serde::Deserialize;

/// The webhook request body: a batch of events.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    /// Events in arrival order.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One inbound platform event.
///
/// Variants the bot does not handle deserialize into [`Unknown`]
/// (`WebhookEvent::Unknown`) and are ignored rather than rejected, so new
/// platform event types never break the webhook.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    /// A message from a user, group, or room.
    #[serde(rename_all = "camelCase")]
    Message {
        /// Token for the one allowed reply to this event.
        reply_token: String,
        /// Where the event came from.
        source: EventSource,
        /// The message payload.
        message: IncomingMessage,
    },
    /// A user added the bot as a friend.
    #[serde(rename_all = "camelCase")]
    Follow {
        /// Token for the one allowed reply to this event.
        reply_token: String,
        /// Where the event came from.
        source: EventSource,
    },
    /// A user blocked the bot. Carries no reply token.
    Unfollow {
        /// Where the event came from.
        source: EventSource,
    },
    /// The bot was invited into a group or room.
    #[serde(rename_all = "camelCase")]
    Join {
        /// Token for the one allowed reply to this event.
        reply_token: String,
        /// Where the event came from.
        source: EventSource,
    },
    /// The bot was removed from a group or room. Carries no reply token.
    Leave {
        /// Where the event came from.
        source: EventSource,
    },
    /// A postback action fired from a template button.
    #[serde(rename_all = "camelCase")]
    Postback {
        /// Token for the one allowed reply to this event.
        reply_token: String,
        /// Where the event came from.
        source: EventSource,
        /// The postback payload.
        postback: Postback,
    },
    /// Any event type this bot does not handle.
    #[serde(other)]
    Unknown,
}

/// The origin of an event.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    /// A one-on-one chat with an identified user.
    #[serde(rename_all = "camelCase")]
    User {
        /// The platform user id.
        user_id: String,
    },
    /// A group chat; the sender may or may not be resolvable.
    #[serde(rename_all = "camelCase")]
    Group {
        /// The group id.
        group_id: String,
        /// The sender's user id, when the platform provides it.
        #[serde(default)]
        user_id: Option<String>,
    },
    /// A multi-person room; the sender may or may not be resolvable.
    #[serde(rename_all = "camelCase")]
    Room {
        /// The room id.
        room_id: String,
        /// The sender's user id, when the platform provides it.
        #[serde(default)]
        user_id: Option<String>,
    },
}

impl EventSource {
    /// The user id of an individually-identifiable sender.
    ///
    /// Only a one-on-one source qualifies; group and room senders are not
    /// treated as individually identifiable even when a user id is present,
    /// matching the profile command's refusal behavior.
    pub fn individual_user_id(&self) -> Option<&str> {
        match self {
            Self::User { user_id } => Some(user_id),
            Self::Group { .. } | Self::Room { .. } => None,
        }
    }

    /// The source kind as a display word.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Group { .. } => "group",
            Self::Room { .. } => "room",
        }
    }
}

/// The payload of a message event.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingMessage {
    /// Plain text.
    Text {
        /// Message id.
        id: String,
        /// The text body.
        text: String,
    },
    /// An image; content is fetched separately by id.
    Image {
        /// Message id.
        id: String,
    },
    /// A video; content is fetched separately by id.
    Video {
        /// Message id.
        id: String,
    },
    /// An audio clip; content is fetched separately by id.
    Audio {
        /// Message id.
        id: String,
    },
    /// An arbitrary file; content is fetched separately by id.
    #[serde(rename_all = "camelCase")]
    File {
        /// Message id.
        id: String,
        /// Original file name.
        file_name: String,
    },
    /// A sticker.
    #[serde(rename_all = "camelCase")]
    Sticker {
        /// Sticker package id.
        package_id: String,
        /// Sticker id within the package.
        sticker_id: String,
    },
    /// A shared location.
    Location {
        /// Optional place title.
        #[serde(default)]
        title: Option<String>,
        /// Postal address.
        #[serde(default)]
        address: Option<String>,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// Any message type this bot does not handle.
    #[serde(other)]
    Unknown,
}

/// A postback action payload.
#[derive(Debug, Deserialize)]
pub struct Postback {
    /// The data string attached to the tapped action.
    pub data: String,
}
