use crate::auth::AccessTokenProvider;
use pitchbot_core::{PitchbotError, PitchbotResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

// ── Sheets API types ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

// ── Implementation ──────────────────────────────────────────────────────────

/// Google Sheets client for one fixed worksheet.
///
/// Wraps the `values.get`, `values.update`, and `values.append` endpoints.
/// Rows are 1-based and columns are given as letters (`"C"`, `"E"`), matching
/// how the roster sheet is addressed everywhere else.
pub struct SheetsClient {
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsClient {
    /// Creates a client for the given spreadsheet document and worksheet.
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        }
    }

    /// Overrides the API base URL. Intended for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}!{}",
            self.base_url, self.spreadsheet_id, self.worksheet, range
        )
    }

    async fn get_range(&self, range: &str) -> PitchbotResult<ValueRange> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PitchbotError::Roster(format!("values.get error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PitchbotError::Roster(format!(
                "values.get failed with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PitchbotError::Roster(format!("values.get parse error: {e}")))
    }

    /// Reads an entire column as an ordered sequence of strings.
    ///
    /// Rows where the column is blank come back as empty strings so indexes
    /// stay aligned with sheet row numbers.
    pub async fn column_values(&self, column: &str) -> PitchbotResult<Vec<String>> {
        let range = self.get_range(&format!("{column}:{column}")).await?;
        Ok(range
            .values
            .into_iter()
            .map(|mut row| {
                if row.is_empty() {
                    String::new()
                } else {
                    row.swap_remove(0)
                }
            })
            .collect())
    }

    /// Reads a single cell by 1-based row and column letter.
    pub async fn read_cell(&self, row: usize, column: &str) -> PitchbotResult<String> {
        let range = self.get_range(&format!("{column}{row}")).await?;
        Ok(range
            .values
            .into_iter()
            .next()
            .and_then(|mut r| {
                if r.is_empty() {
                    None
                } else {
                    Some(r.swap_remove(0))
                }
            })
            .unwrap_or_default())
    }

    /// Writes a single cell by 1-based row and column letter.
    pub async fn update_cell(&self, row: usize, column: &str, value: &str) -> PitchbotResult<()> {
        let token = self.tokens.access_token().await?;
        let body = ValueRange {
            values: vec![vec![value.to_string()]],
        };
        let response = self
            .client
            .put(self.values_url(&format!("{column}{row}")))
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await
            .map_err(|e| PitchbotError::Roster(format!("values.update error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PitchbotError::Roster(format!(
                "values.update failed with {status}: {text}"
            )));
        }

        debug!(row, column, "Roster cell updated");
        Ok(())
    }

    /// Appends a new row after the worksheet's existing table.
    pub async fn append_row(&self, cells: Vec<String>) -> PitchbotResult<()> {
        let token = self.tokens.access_token().await?;
        let body = ValueRange {
            values: vec![cells],
        };
        let url = format!("{}:append", self.values_url("A1"));
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| PitchbotError::Roster(format!("values.append error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PitchbotError::Roster(format!(
                "values.append failed with {status}: {text}"
            )));
        }

        debug!("Roster row appended");
        Ok(())
    }
}
