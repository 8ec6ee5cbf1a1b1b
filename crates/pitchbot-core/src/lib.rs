//! Core types and error definitions for Pitchbot.
//!
//! This crate provides the foundational types shared across all Pitchbot
//! crates: the unified error enum, the [`Session`] type sourced from the
//! calendar collaborator, and the [`AttendanceCell`] value type that backs
//! the roster's serialized reservation set.
//!
//! # Main types
//!
//! - [`PitchbotError`] — Unified error enum for all Pitchbot subsystems.
//! - [`PitchbotResult`] — Convenience alias for `Result<T, PitchbotError>`.
//! - [`Session`] — One scheduled play event with its display label.
//! - [`AttendanceCell`] — A participant's comma-delimited reservation set.

/// The attendance-cell value type and its toggle-friendly operations.
pub mod attendance;
/// The `Session` type and label formatting.
pub mod session;

pub use attendance::AttendanceCell;
pub use session::{jst, Session};

// --- Error types ---

/// Top-level error type for Pitchbot.
///
/// Each variant corresponds to a collaborator or subsystem that can produce
/// errors. The gateway is the single place that turns these into wire-level
/// responses: [`PitchbotError::Messaging`] is logged and swallowed there,
/// everything else aborts the current event.
#[derive(Debug, thiserror::Error)]
pub enum PitchbotError {
    /// An error from the outbound messaging collaborator (reply, profile,
    /// content download).
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// An error from the calendar collaborator.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// An error from the spreadsheet-backed roster store.
    #[error("Roster error: {0}")]
    Roster(String),

    /// A failure obtaining or refreshing collaborator credentials.
    #[error("Auth error: {0}")]
    Auth(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the webhook transport layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`PitchbotError`].
pub type PitchbotResult<T> = Result<T, PitchbotError>;
