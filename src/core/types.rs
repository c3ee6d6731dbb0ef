//! KPI accumulator types shared across all views.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::data::TaskRecord;

/// Additive KPI accumulator for a group of task records.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Tally {
    pub(crate) assigned: i64,
    pub(crate) completed: i64,
    /// Rows whose completion time was within the SLA target
    pub(crate) within_sla: i64,
    pub(crate) rows: i64,
}

impl Tally {
    pub(crate) fn from_record(record: &TaskRecord) -> Self {
        Tally {
            assigned: record.tasks_assigned,
            completed: record.tasks_completed,
            within_sla: i64::from(record.within_sla()),
            rows: 1,
        }
    }

    pub(crate) fn add(&mut self, other: &Tally) {
        self.assigned += other.assigned;
        self.completed += other.completed;
        self.within_sla += other.within_sla;
        self.rows += other.rows;
    }

    /// Completed over assigned. `None` when nothing was assigned — the
    /// ratio is undefined, not zero.
    pub(crate) fn completion_rate(&self) -> Option<f64> {
        if self.assigned == 0 {
            return None;
        }
        Some(self.completed as f64 / self.assigned as f64)
    }

    /// Fraction of rows that finished within their SLA target.
    pub(crate) fn sla_compliance_rate(&self) -> Option<f64> {
        if self.rows == 0 {
            return None;
        }
        Some(self.within_sla as f64 / self.rows as f64)
    }
}

/// Day-level KPIs with a per-department breakdown.
#[derive(Debug, Default, Clone)]
pub(crate) struct DayKpis {
    pub(crate) tally: Tally,
    pub(crate) departments: HashMap<String, Tally>,
}

impl DayKpis {
    pub(crate) fn add_record(&mut self, record: &TaskRecord) {
        let tally = Tally::from_record(record);
        self.tally.add(&tally);
        self.departments
            .entry(record.department.clone())
            .or_default()
            .add(&tally);
    }
}

/// One department's KPIs.
#[derive(Debug, Clone)]
pub(crate) struct DepartmentKpis {
    pub(crate) department: String,
    pub(crate) tally: Tally,
}

/// Dataset-wide KPIs for the summary view.
#[derive(Debug, Default, Clone)]
pub(crate) struct OverallKpis {
    pub(crate) tally: Tally,
    pub(crate) department_count: usize,
    pub(crate) first_date: Option<NaiveDate>,
    pub(crate) last_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(dept: &str, assigned: i64, completed: i64, time: f64, target: f64) -> TaskRecord {
        TaskRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            department: dept.to_string(),
            tasks_assigned: assigned,
            tasks_completed: completed,
            completion_time: time,
            sla_target: target,
        }
    }

    #[test]
    fn tally_default_all_zero() {
        let t = Tally::default();
        assert_eq!(t.assigned, 0);
        assert_eq!(t.completed, 0);
        assert_eq!(t.within_sla, 0);
        assert_eq!(t.rows, 0);
    }

    #[test]
    fn tally_from_record_within_sla() {
        let t = Tally::from_record(&record("A", 10, 8, 5.0, 6.0));
        assert_eq!(t.assigned, 10);
        assert_eq!(t.completed, 8);
        assert_eq!(t.within_sla, 1);
        assert_eq!(t.rows, 1);
    }

    #[test]
    fn tally_from_record_sla_breach() {
        let t = Tally::from_record(&record("A", 4, 2, 7.0, 6.0));
        assert_eq!(t.within_sla, 0);
    }

    #[test]
    fn tally_add_accumulates_all_fields() {
        let mut a = Tally::from_record(&record("A", 10, 8, 5.0, 6.0));
        let b = Tally::from_record(&record("A", 5, 5, 4.0, 6.0));
        a.add(&b);
        assert_eq!(a.assigned, 15);
        assert_eq!(a.completed, 13);
        assert_eq!(a.within_sla, 2);
        assert_eq!(a.rows, 2);
    }

    #[test]
    fn completion_rate_undefined_when_nothing_assigned() {
        assert_eq!(Tally::default().completion_rate(), None);
        // a row with zero assigned tasks still has no defined rate
        let t = Tally::from_record(&record("A", 0, 0, 1.0, 2.0));
        assert_eq!(t.completion_rate(), None);
    }

    #[test]
    fn sla_rate_undefined_when_no_rows() {
        assert_eq!(Tally::default().sla_compliance_rate(), None);
    }

    #[test]
    fn rates_stay_within_unit_interval() {
        let mut t = Tally::default();
        t.add(&Tally::from_record(&record("A", 10, 8, 5.0, 6.0)));
        t.add(&Tally::from_record(&record("A", 5, 5, 7.0, 6.0)));
        let cr = t.completion_rate().unwrap();
        let sr = t.sla_compliance_rate().unwrap();
        assert!((0.0..=1.0).contains(&cr));
        assert!((0.0..=1.0).contains(&sr));
    }

    #[test]
    fn day_kpis_tracks_departments() {
        let mut day = DayKpis::default();
        day.add_record(&record("A", 10, 8, 5.0, 6.0));
        day.add_record(&record("B", 4, 2, 7.0, 6.0));
        day.add_record(&record("A", 5, 5, 4.0, 6.0));
        assert_eq!(day.tally.assigned, 19);
        assert_eq!(day.departments.len(), 2);
        assert_eq!(day.departments["A"].assigned, 15);
        assert_eq!(day.departments["B"].assigned, 4);
    }
}
