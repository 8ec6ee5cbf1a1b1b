use serde::{Deserialize, Serialize};

/// A participant's reservation set, as stored in one spreadsheet cell.
///
/// The cell is a single comma-delimited string of session labels; the first
/// entry carries no leading comma. Membership is decided by **substring**
/// containment against the raw string, and removal is a plain string replace.
/// Rows written by earlier deployments rely on these exact semantics, so this
/// type deliberately does not parse the cell into a real set:
///
/// - removing a label that is not the first entry leaves its delimiter
///   behind (`"a,b"` minus `"a"` is `",b"`), and
/// - adding always appends `","` plus the label, even to an empty cell that
///   belonged to an existing row.
///
/// The toggle state machine in `pitchbot-reserve` guarantees a label is never
/// added twice, so the substring check never sees duplicates in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceCell(String);

impl AttendanceCell {
    /// Wraps a raw cell value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A cell holding exactly one label, as written when a row is created.
    pub fn single(label: &str) -> Self {
        Self(label.to_string())
    }

    /// Whether `label` occurs anywhere in the raw cell string.
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Returns the cell with a delimiter and `label` appended.
    pub fn add(&self, label: &str) -> Self {
        Self(format!("{},{}", self.0, label))
    }

    /// Returns the cell with every occurrence of `label` removed.
    ///
    /// Delimiters adjacent to the removed text are kept as-is.
    pub fn remove(&self, label: &str) -> Self {
        Self(self.0.replace(label, ""))
    }

    /// The raw cell string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the cell, returning the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the cell holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AttendanceCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AttendanceCell {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
