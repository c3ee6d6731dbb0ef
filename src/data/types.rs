//! Input-side data types shared by the loader and the aggregation layer.

use chrono::NaiveDate;

/// One validated task record from the input CSV.
#[derive(Debug, Clone)]
pub(crate) struct TaskRecord {
    pub(crate) date: NaiveDate,
    pub(crate) department: String,
    pub(crate) tasks_assigned: i64,
    pub(crate) tasks_completed: i64,
    pub(crate) completion_time: f64,
    pub(crate) sla_target: f64,
}

impl TaskRecord {
    /// A task counts toward SLA compliance when it finished within target.
    pub(crate) fn within_sla(&self) -> bool {
        self.completion_time <= self.sla_target
    }
}

/// A rejected row: line number in the input file plus the reason.
#[derive(Debug, Clone)]
pub(crate) struct RowWarning {
    pub(crate) line: usize,
    pub(crate) message: String,
}

/// Loading result with row accounting.
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) records: Vec<TaskRecord>,
    pub(crate) warnings: Vec<RowWarning>,
    pub(crate) total_rows: usize,
    pub(crate) skipped: usize,
    /// Processing time in milliseconds
    pub(crate) elapsed_ms: f64,
}

/// Inclusive date filter applied while loading.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}
