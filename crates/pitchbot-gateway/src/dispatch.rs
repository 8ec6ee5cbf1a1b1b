use crate::event::{IncomingMessage, WebhookEvent};
use crate::interpreter::CommandInterpreter;
use pitchbot_core::PitchbotResult;
use pitchbot_line::{LineClient, OutgoingMessage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Routes one webhook event to its handler.
///
/// Text messages go through the [`CommandInterpreter`]; media messages are
/// downloaded into the static temp dir and answered with their public URL;
/// everything else is a fixed one-shot reply or a log line. Events the bot
/// does not understand are dropped silently.
pub struct Dispatcher {
    interpreter: CommandInterpreter,
    line: Arc<LineClient>,
    media_dir: PathBuf,
    public_base_url: String,
}

impl Dispatcher {
    /// Creates a dispatcher over its collaborators.
    pub fn new(
        interpreter: CommandInterpreter,
        line: Arc<LineClient>,
        media_dir: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            interpreter,
            line,
            media_dir,
            public_base_url: public_base_url.into(),
        }
    }

    /// Handles one event to completion.
    pub async fn dispatch(&self, event: WebhookEvent) -> PitchbotResult<()> {
        match event {
            WebhookEvent::Message {
                reply_token,
                source,
                message,
            } => match message {
                IncomingMessage::Text { text, .. } => {
                    let messages = self.interpreter.handle_text(&text, &source).await?;
                    self.line.reply(&reply_token, &messages).await
                }
                IncomingMessage::Image { id } => self.save_media(&reply_token, &id, "jpg").await,
                IncomingMessage::Video { id } => self.save_media(&reply_token, &id, "mp4").await,
                IncomingMessage::Audio { id } => self.save_media(&reply_token, &id, "m4a").await,
                IncomingMessage::File { id, file_name } => {
                    self.save_file(&reply_token, &id, &file_name).await
                }
                IncomingMessage::Sticker {
                    package_id,
                    sticker_id,
                } => {
                    self.line
                        .reply(
                            &reply_token,
                            &[OutgoingMessage::Sticker {
                                package_id,
                                sticker_id,
                            }],
                        )
                        .await
                }
                IncomingMessage::Location {
                    address,
                    latitude,
                    longitude,
                    ..
                } => {
                    self.line
                        .reply(
                            &reply_token,
                            &[OutgoingMessage::Location {
                                title: "Location".to_string(),
                                address: address.unwrap_or_default(),
                                latitude,
                                longitude,
                            }],
                        )
                        .await
                }
                IncomingMessage::Unknown => Ok(()),
            },
            WebhookEvent::Follow {
                reply_token,
                source,
            } => {
                info!(user = ?source.individual_user_id(), "Follow event");
                self.line
                    .reply(&reply_token, &[OutgoingMessage::text("Thanks for adding me! Tap the menu to check the schedule.")])
                    .await
            }
            WebhookEvent::Unfollow { source } => {
                info!(user = ?source.individual_user_id(), "Unfollow event");
                Ok(())
            }
            WebhookEvent::Join {
                reply_token,
                source,
            } => {
                self.line
                    .reply(
                        &reply_token,
                        &[OutgoingMessage::text(format!(
                            "Joined this {}",
                            source.kind()
                        ))],
                    )
                    .await
            }
            WebhookEvent::Leave { source } => {
                info!(kind = source.kind(), "Leave event");
                Ok(())
            }
            WebhookEvent::Postback {
                reply_token,
                postback,
                ..
            } => {
                if postback.data == "ping" {
                    self.line
                        .reply(&reply_token, &[OutgoingMessage::text("pong")])
                        .await
                } else {
                    info!(data = %postback.data, "Unhandled postback");
                    Ok(())
                }
            }
            WebhookEvent::Unknown => Ok(()),
        }
    }

    async fn save_media(&self, reply_token: &str, message_id: &str, ext: &str) -> PitchbotResult<()> {
        let name = format!("{ext}-{}.{ext}", Uuid::new_v4().simple());
        self.save_content(reply_token, message_id, &name, "Save content.")
            .await
    }

    async fn save_file(
        &self,
        reply_token: &str,
        message_id: &str,
        file_name: &str,
    ) -> PitchbotResult<()> {
        let name = format!("file-{}-{file_name}", Uuid::new_v4().simple());
        self.save_content(reply_token, message_id, &name, "Save file.")
            .await
    }

    async fn save_content(
        &self,
        reply_token: &str,
        message_id: &str,
        name: &str,
        note: &str,
    ) -> PitchbotResult<()> {
        let bytes = self.line.message_content(message_id).await?;
        tokio::fs::write(self.media_dir.join(name), bytes).await?;
        let url = format!("{}/static/{name}", self.public_base_url);
        info!(name, "Saved message content");
        self.line
            .reply(
                reply_token,
                &[OutgoingMessage::text(note), OutgoingMessage::text(url)],
            )
            .await
    }
}
