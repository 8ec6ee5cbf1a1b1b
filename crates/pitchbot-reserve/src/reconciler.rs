use crate::store::RosterStore;
use chrono::Utc;
use pitchbot_core::{jst, PitchbotResult};
use std::sync::Arc;
use tracing::info;

// Matches the format the sheet's form-driven rows already use.
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The attendance toggle state machine.
///
/// Reconciles a chat command against one roster row: adds the session label
/// to the participant's attendance cell if absent, removes it if present,
/// and appends a fresh row for a previously-unseen display name. Exactly one
/// row lookup plus either one append or one cell write per call; store
/// failures propagate to the caller with no retry and no rollback.
pub struct AttendanceReconciler {
    store: Arc<dyn RosterStore>,
}

impl AttendanceReconciler {
    /// Creates a reconciler over the given store.
    pub fn new(store: Arc<dyn RosterStore>) -> Self {
        Self { store }
    }

    /// Toggles `label` in the attendance set of the row named `name`.
    ///
    /// Returns `true` when the participant is now joined, `false` when the
    /// reservation was withdrawn. When several rows share a display name the
    /// earliest-added row wins; two chat identities with the same display
    /// name therefore share one row, an accepted platform limitation.
    pub async fn toggle(&self, name: &str, label: &str) -> PitchbotResult<bool> {
        let names = self.store.name_column().await?;
        let hit_row = names.iter().position(|n| n == name).map(|i| i + 1);

        let Some(row) = hit_row else {
            let created_at = Utc::now()
                .with_timezone(&jst())
                .format(CREATED_AT_FORMAT)
                .to_string();
            self.store
                .append_row(vec![
                    String::new(),
                    created_at,
                    name.to_string(),
                    String::new(),
                    label.to_string(),
                ])
                .await?;
            info!(name = %name, label = %label, "Roster row created, reservation added");
            return Ok(true);
        };

        let cell = self.store.attendance_cell(row).await?;
        if cell.contains(label) {
            let updated = cell.remove(label);
            self.store.write_attendance_cell(row, &updated).await?;
            info!(name = %name, label = %label, row, "Reservation withdrawn");
            Ok(false)
        } else {
            let updated = cell.add(label);
            self.store.write_attendance_cell(row, &updated).await?;
            info!(name = %name, label = %label, row, "Reservation added");
            Ok(true)
        }
    }
}
