use std::collections::HashMap;

use crate::error::AppError;

/// Required columns. Loading fails if any of these is absent.
pub(crate) const REQUIRED: &[&str] = &[
    "Date",
    "Department",
    "Tasks_Assigned",
    "Tasks_Completed",
    "Completion_Time",
    "SLA_Target",
];

/// Maps column names to their index in a CSV record.
pub(crate) struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed of surrounding whitespace.
    pub(crate) fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        for (i, field) in headers.iter().enumerate() {
            indices.insert(field.trim().to_string(), i);
        }
        ColumnMap { indices }
    }

    /// Get the value of a named column from a record.
    pub(crate) fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices.get(col).and_then(|&i| record.get(i))
    }

    pub(crate) fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }
}

/// Validate that all required columns are present.
pub(crate) fn validate_columns(col_map: &ColumnMap) -> Result<(), AppError> {
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }
    Ok(())
}
