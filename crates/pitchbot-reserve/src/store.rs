use async_trait::async_trait;
use pitchbot_core::{AttendanceCell, PitchbotError, PitchbotResult};
use pitchbot_google::SheetsClient;
use tokio::sync::RwLock;

/// Sheet column holding the participant display name.
pub const NAME_COLUMN: &str = "C";
/// Sheet column holding the serialized attendance set.
pub const ATTENDANCE_COLUMN: &str = "E";

/// The operations the reconciler needs from the tabular roster store.
///
/// Rows are 1-based, matching spreadsheet addressing. The store gives no
/// transactional guarantees beyond single-cell or single-row operations;
/// concurrent writers can lose updates on the shared cell, which the design
/// accepts.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Reads the display-name column as an ordered sequence, one entry per
    /// sheet row.
    async fn name_column(&self) -> PitchbotResult<Vec<String>>;

    /// Reads the attendance cell of the given row.
    async fn attendance_cell(&self, row: usize) -> PitchbotResult<AttendanceCell>;

    /// Writes the attendance cell of the given row.
    async fn write_attendance_cell(&self, row: usize, cell: &AttendanceCell)
        -> PitchbotResult<()>;

    /// Appends a new row of cell values after the existing table.
    async fn append_row(&self, cells: Vec<String>) -> PitchbotResult<()>;
}

/// Roster store backed by the shared Google Sheets worksheet.
pub struct SheetsRosterStore {
    sheets: SheetsClient,
}

impl SheetsRosterStore {
    /// Wraps a configured [`SheetsClient`].
    pub fn new(sheets: SheetsClient) -> Self {
        Self { sheets }
    }
}

#[async_trait]
impl RosterStore for SheetsRosterStore {
    async fn name_column(&self) -> PitchbotResult<Vec<String>> {
        self.sheets.column_values(NAME_COLUMN).await
    }

    async fn attendance_cell(&self, row: usize) -> PitchbotResult<AttendanceCell> {
        Ok(AttendanceCell::new(
            self.sheets.read_cell(row, ATTENDANCE_COLUMN).await?,
        ))
    }

    async fn write_attendance_cell(
        &self,
        row: usize,
        cell: &AttendanceCell,
    ) -> PitchbotResult<()> {
        self.sheets
            .update_cell(row, ATTENDANCE_COLUMN, cell.as_str())
            .await
    }

    async fn append_row(&self, cells: Vec<String>) -> PitchbotResult<()> {
        self.sheets.append_row(cells).await
    }
}

/// In-memory roster store. Good enough for tests and local runs.
///
/// Rows are plain five-column string vectors in sheet order
/// `(id, created_at, name, location, attendance)`.
#[derive(Default)]
pub struct MemoryRosterStore {
    rows: RwLock<Vec<Vec<String>>>,
}

impl MemoryRosterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given rows.
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Snapshot of all rows, for assertions.
    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn name_column(&self) -> PitchbotResult<Vec<String>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .map(|row| row.get(2).cloned().unwrap_or_default())
            .collect())
    }

    async fn attendance_cell(&self, row: usize) -> PitchbotResult<AttendanceCell> {
        let rows = self.rows.read().await;
        let record = rows
            .get(row.wrapping_sub(1))
            .ok_or_else(|| PitchbotError::Roster(format!("row {row} out of range")))?;
        Ok(AttendanceCell::new(
            record.get(4).cloned().unwrap_or_default(),
        ))
    }

    async fn write_attendance_cell(
        &self,
        row: usize,
        cell: &AttendanceCell,
    ) -> PitchbotResult<()> {
        let mut rows = self.rows.write().await;
        let record = rows
            .get_mut(row.wrapping_sub(1))
            .ok_or_else(|| PitchbotError::Roster(format!("row {row} out of range")))?;
        while record.len() < 5 {
            record.push(String::new());
        }
        record[4] = cell.as_str().to_string();
        Ok(())
    }

    async fn append_row(&self, mut cells: Vec<String>) -> PitchbotResult<()> {
        while cells.len() < 5 {
            cells.push(String::new());
        }
        self.rows.write().await.push(cells);
        Ok(())
    }
}
