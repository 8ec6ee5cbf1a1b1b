//! Google collaborator clients for Pitchbot.
//!
//! Thin adapters over the two external Google services the bot depends on:
//! the Calendar `events.list` endpoint (session schedule) and the Sheets
//! `values` endpoints (the roster spreadsheet). Authentication is a
//! service-account JWT exchange, shared between both clients through the
//! [`AccessTokenProvider`] trait so the HTTP clients stay testable.
//!
//! # Main types
//!
//! - [`ServiceAccountTokenSource`] — Signs and exchanges RS256 assertions.
//! - [`CalendarClient`] — Fetches upcoming calendar events as [`Session`]s.
//! - [`SheetsClient`] — Column/cell/append operations on one worksheet.
//!
//! [`Session`]: pitchbot_core::Session

/// Service-account authentication and the token provider trait.
pub mod auth;
/// Google Calendar `events.list` client.
pub mod calendar;
/// Google Sheets `values` client.
pub mod sheets;

pub use auth::{
    AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenSource, CALENDAR_SCOPE,
    SHEETS_SCOPE,
};
pub use calendar::CalendarClient;
pub use sheets::SheetsClient;
