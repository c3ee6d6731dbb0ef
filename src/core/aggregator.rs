//! Aggregation from task records to the per-view KPI structures.
//!
//! Every function here is a pure fold over the input slice; callers decide
//! what to render.

use std::collections::{BTreeMap, HashMap};

use crate::consts::DATE_FORMAT;
use crate::core::types::{DayKpis, DepartmentKpis, OverallKpis, Tally};
use crate::data::TaskRecord;

/// Aggregate records by calendar day, keyed "YYYY-MM-DD".
pub(crate) fn aggregate_daily(records: &[TaskRecord]) -> HashMap<String, DayKpis> {
    let mut days: HashMap<String, DayKpis> = HashMap::new();

    for record in records {
        let key = record.date.format(DATE_FORMAT).to_string();
        days.entry(key).or_default().add_record(record);
    }

    days
}

/// Aggregate records per department, alphabetically ordered.
pub(crate) fn aggregate_departments(records: &[TaskRecord]) -> Vec<DepartmentKpis> {
    let mut departments: BTreeMap<&str, Tally> = BTreeMap::new();

    for record in records {
        departments
            .entry(record.department.as_str())
            .or_default()
            .add(&Tally::from_record(record));
    }

    departments
        .into_iter()
        .map(|(department, tally)| DepartmentKpis {
            department: department.to_string(),
            tally,
        })
        .collect()
}

/// Dataset-wide roll-up for the summary view.
pub(crate) fn summarize(records: &[TaskRecord]) -> OverallKpis {
    let mut tally = Tally::default();
    let mut departments: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut first_date = None;
    let mut last_date = None;

    for record in records {
        tally.add(&Tally::from_record(record));
        departments.insert(record.department.as_str());
        if first_date.is_none_or(|d| record.date < d) {
            first_date = Some(record.date);
        }
        if last_date.is_none_or(|d| record.date > d) {
            last_date = Some(record.date);
        }
    }

    OverallKpis {
        tally,
        department_count: departments.len(),
        first_date,
        last_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(
        date: &str,
        dept: &str,
        assigned: i64,
        completed: i64,
        time: f64,
        target: f64,
    ) -> TaskRecord {
        TaskRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            department: dept.to_string(),
            tasks_assigned: assigned,
            tasks_completed: completed,
            completion_time: time,
            sla_target: target,
        }
    }

    /// Worked example: two departments, one SLA breach.
    fn sample() -> Vec<TaskRecord> {
        vec![
            record("2025-03-01", "A", 10, 8, 5.0, 6.0),
            record("2025-03-02", "A", 5, 5, 4.0, 6.0),
            record("2025-03-02", "B", 4, 2, 7.0, 6.0),
        ]
    }

    #[test]
    fn department_rates_match_hand_computation() {
        let depts = aggregate_departments(&sample());
        assert_eq!(depts.len(), 2);

        let a = &depts[0];
        assert_eq!(a.department, "A");
        assert_eq!(a.tally.completion_rate(), Some(13.0 / 15.0));
        assert_eq!(a.tally.sla_compliance_rate(), Some(1.0));

        let b = &depts[1];
        assert_eq!(b.department, "B");
        assert_eq!(b.tally.completion_rate(), Some(0.5));
        assert_eq!(b.tally.sla_compliance_rate(), Some(0.0));
    }

    #[test]
    fn department_partition_equals_manual_filter() {
        let records = sample();
        let depts = aggregate_departments(&records);

        for dept in &depts {
            let mut manual = Tally::default();
            for r in records.iter().filter(|r| r.department == dept.department) {
                manual.add(&Tally::from_record(r));
            }
            assert_eq!(dept.tally.completion_rate(), manual.completion_rate());
            assert_eq!(
                dept.tally.sla_compliance_rate(),
                manual.sla_compliance_rate()
            );
        }
    }

    #[test]
    fn departments_ordered_alphabetically_regardless_of_input_order() {
        let mut records = sample();
        records.reverse();
        let depts = aggregate_departments(&records);
        let names: Vec<&str> = depts.iter().map(|d| d.department.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn overall_summary_matches_worked_example() {
        let overall = summarize(&sample());
        assert_eq!(overall.tally.assigned, 19);
        assert_eq!(overall.tally.completed, 15);
        assert_eq!(overall.tally.completion_rate(), Some(15.0 / 19.0));
        assert_eq!(overall.tally.sla_compliance_rate(), Some(2.0 / 3.0));
        assert_eq!(overall.department_count, 2);
        assert_eq!(
            overall.first_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert_eq!(
            overall.last_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
        );
    }

    #[test]
    fn summarize_empty_input_has_undefined_rates() {
        let overall = summarize(&[]);
        assert_eq!(overall.tally.completion_rate(), None);
        assert_eq!(overall.tally.sla_compliance_rate(), None);
        assert_eq!(overall.department_count, 0);
        assert_eq!(overall.first_date, None);
    }

    #[test]
    fn daily_aggregation_groups_by_date() {
        let days = aggregate_daily(&sample());
        assert_eq!(days.len(), 2);
        assert_eq!(days["2025-03-01"].tally.assigned, 10);
        assert_eq!(days["2025-03-02"].tally.assigned, 9);
        assert_eq!(days["2025-03-02"].departments.len(), 2);
    }

    #[test]
    fn daily_totals_equal_sum_of_department_breakdown() {
        let days = aggregate_daily(&sample());
        for day in days.values() {
            let mut sum = Tally::default();
            for tally in day.departments.values() {
                sum.add(tally);
            }
            assert_eq!(sum.assigned, day.tally.assigned);
            assert_eq!(sum.completed, day.tally.completed);
            assert_eq!(sum.within_sla, day.tally.within_sla);
            assert_eq!(sum.rows, day.tally.rows);
        }
    }
}
