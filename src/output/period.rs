use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::core::DayKpis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Period::Day => "date",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

fn week_start(date_str: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        let weekday = date.weekday().num_days_from_monday();
        let monday = date - chrono::Duration::days(weekday as i64);
        monday.format("%Y-%m-%d").to_string()
    } else {
        date_str.to_string()
    }
}

fn period_key(date: &str, period: Period) -> String {
    match period {
        Period::Day => date.to_string(),
        Period::Week => week_start(date),
        Period::Month => date.get(0..7).unwrap_or(date).to_string(),
    }
}

/// Roll day-level KPIs up to weeks or months, keeping the department
/// breakdown intact.
pub(crate) fn aggregate_daily_by_period(
    daily: &HashMap<String, DayKpis>,
    period: Period,
) -> HashMap<String, DayKpis> {
    debug_assert_ne!(period, Period::Day, "Day period should not be aggregated");

    let mut aggregated: HashMap<String, DayKpis> = HashMap::new();

    for (date, kpis) in daily {
        let key = period_key(date, period);
        let entry = aggregated.entry(key).or_default();

        entry.tally.add(&kpis.tally);
        for (department, tally) in &kpis.departments {
            entry
                .departments
                .entry(department.clone())
                .or_default()
                .add(tally);
        }
    }

    aggregated
}
