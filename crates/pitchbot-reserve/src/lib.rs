//! The reservation core of Pitchbot.
//!
//! This crate holds the only stateful logic in the system: the process-
//! lifetime session catalog cache and the attendance toggle state machine
//! that reconciles chat commands against the spreadsheet-backed roster.
//!
//! # Main types
//!
//! - [`SessionCatalog`] — Populate-once cache of upcoming sessions.
//! - [`CalendarSource`] — Seam between the catalog and the calendar client.
//! - [`RosterStore`] — Seam between the reconciler and the tabular store.
//! - [`AttendanceReconciler`] — The add-if-absent/remove-if-present toggle.

/// The session catalog cache and its calendar seam.
pub mod catalog;
/// The attendance toggle state machine.
pub mod reconciler;
/// Roster store trait plus Sheets-backed and in-memory implementations.
pub mod store;

pub use catalog::{CalendarSource, SessionCatalog, MAX_SESSIONS};
pub use reconciler::AttendanceReconciler;
pub use store::{MemoryRosterStore, RosterStore, SheetsRosterStore};
