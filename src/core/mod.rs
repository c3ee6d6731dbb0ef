//! KPI aggregation: pure functions from task records to summary tallies.

pub(crate) mod aggregator;
pub(crate) mod types;

pub(crate) use aggregator::{aggregate_daily, aggregate_departments, summarize};
pub(crate) use types::{DayKpis, DepartmentKpis, OverallKpis, Tally};
