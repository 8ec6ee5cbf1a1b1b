//! Webhook transport and command interpreter for Pitchbot.
//!
//! The inbound half of the chat transport: an axum server that verifies the
//! platform signature on `POST /callback`, deserializes the event envelope
//! into a discriminated union, and dispatches each event with an explicit
//! `match`. The transport is the single place where error values become
//! wire-level responses.
//!
//! # Main types
//!
//! - [`GatewayServer`] — Builds the axum router from its collaborators.
//! - [`Dispatcher`] — Routes one webhook event to its handler.
//! - [`CommandInterpreter`] — Maps inbound text to replies.
//! - [`WebhookEvent`] — The inbound event union.

/// Per-event dispatch over the webhook event union.
pub mod dispatch;
/// Webhook envelope wire types.
pub mod event;
/// Text command recognition and reply rendering.
pub mod interpreter;
/// The axum router and callback handler.
pub mod server;
/// Webhook signature verification.
pub mod signature;

pub use dispatch::Dispatcher;
pub use event::{EventSource, IncomingMessage, Postback, WebhookEnvelope, WebhookEvent};
pub use interpreter::{Command, CommandInterpreter};
pub use server::{GatewayConfig, GatewayServer};
pub use signature::{compute_signature, verify_signature};
