/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fallback label when a department field is empty after trimming
pub(crate) const UNKNOWN: &str = "unknown";
