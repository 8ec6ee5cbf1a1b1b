//! LINE Messaging API channel adapter.
//!
//! Outbound half of the bot's chat transport: replying to events, looking up
//! user profiles, and downloading message content. Inbound events arrive via
//! the webhook in `pitchbot-gateway`; this crate only speaks to the platform
//! REST API.
//!
//! # Main types
//!
//! - [`LineClient`] — The HTTP client for reply/profile/content calls.
//! - [`OutgoingMessage`] — Typed reply payloads (text, sticker, templates).
//! - [`Profile`] — A user's display name and status message.

/// The LINE REST client.
pub mod client;
/// Outbound message wire types.
pub mod message;

pub use client::{LineClient, Profile};
pub use message::{Action, CarouselColumn, OutgoingMessage, TemplateContent};
