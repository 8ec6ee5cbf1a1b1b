use serde::Serialize;

/// A message the bot can send in a reply.
///
/// Serializes to the Messaging API's message objects; the `type` tag and
/// camelCase field names are part of the wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    /// Plain text message.
    Text {
        /// The message body.
        text: String,
    },
    /// Sticker message, echoing package and sticker ids.
    #[serde(rename_all = "camelCase")]
    Sticker {
        /// Sticker package id.
        package_id: String,
        /// Sticker id within the package.
        sticker_id: String,
    },
    /// Location message.
    Location {
        /// Display title.
        title: String,
        /// Postal address.
        address: String,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// Template message (carousels and friends).
    #[serde(rename_all = "camelCase")]
    Template {
        /// Fallback text for clients that cannot render templates.
        alt_text: String,
        /// The template body.
        template: TemplateContent,
    },
}

impl OutgoingMessage {
    /// Convenience constructor for a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Convenience constructor for a carousel template.
    pub fn carousel(alt_text: impl Into<String>, columns: Vec<CarouselColumn>) -> Self {
        Self::Template {
            alt_text: alt_text.into(),
            template: TemplateContent::Carousel {
                columns,
                image_aspect_ratio: "square".to_string(),
            },
        }
    }
}

/// Template bodies supported by the bot.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateContent {
    /// A horizontally scrollable list of columns.
    #[serde(rename_all = "camelCase")]
    Carousel {
        /// One column per selectable option.
        columns: Vec<CarouselColumn>,
        /// Aspect ratio of column images.
        image_aspect_ratio: String,
    },
}

/// One column of a carousel template.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselColumn {
    /// Column title line.
    pub title: String,
    /// Column body text.
    pub text: String,
    /// Buttons shown under the column.
    pub actions: Vec<Action>,
}

/// Actions attachable to template columns.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Sends `text` into the chat when tapped.
    Message {
        /// Button label.
        label: String,
        /// Text posted back into the conversation.
        text: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_wire_format() {
        let msg = OutgoingMessage::text("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn test_sticker_uses_camel_case() {
        let msg = OutgoingMessage::Sticker {
            package_id: "1".to_string(),
            sticker_id: "2".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "sticker", "packageId": "1", "stickerId": "2"})
        );
    }

    #[test]
    fn test_carousel_wire_format() {
        let msg = OutgoingMessage::carousel(
            "Book here",
            vec![CarouselColumn {
                title: "4/26(Sun) 19～21".to_string(),
                text: "Futsal".to_string(),
                actions: vec![Action::Message {
                    label: "Book/Cancel".to_string(),
                    text: "reserve:4/26(Sun) 19～21 Futsal".to_string(),
                }],
            }],
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "template");
        assert_eq!(json["altText"], "Book here");
        assert_eq!(json["template"]["type"], "carousel");
        assert_eq!(json["template"]["imageAspectRatio"], "square");
        let column = &json["template"]["columns"][0];
        assert_eq!(column["title"], "4/26(Sun) 19～21");
        assert_eq!(column["actions"][0]["type"], "message");
        assert_eq!(column["actions"][0]["text"], "reserve:4/26(Sun) 19～21 Futsal");
    }
}
