use std::collections::HashMap;
use std::fmt::Write;

use crate::cli::SortOrder;
use crate::consts::DATE_FORMAT;
use crate::core::{DayKpis, DepartmentKpis, OverallKpis, Tally};
use crate::data::TaskRecord;
use crate::output::period::{Period, aggregate_daily_by_period};

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Undefined rates become an empty field, not "NaN".
fn rate_field(rate: Option<f64>) -> String {
    rate.map(|r| format!("{r:.6}")).unwrap_or_default()
}

fn tally_fields(tally: &Tally) -> String {
    format!(
        "{},{},{},{},{}",
        tally.rows,
        tally.assigned,
        tally.completed,
        rate_field(tally.completion_rate()),
        rate_field(tally.sla_compliance_rate()),
    )
}

const TALLY_HEADER: &str =
    "rows,tasks_assigned,tasks_completed,completion_rate,sla_compliance_rate";

pub(crate) fn output_summary_csv(overall: &OverallKpis, loaded: usize, skipped: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{TALLY_HEADER},departments,first_date,last_date,rows_loaded,rows_skipped"
    );
    let _ = writeln!(
        out,
        "{},{},{},{},{},{}",
        tally_fields(&overall.tally),
        overall.department_count,
        overall
            .first_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        overall
            .last_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        loaded,
        skipped,
    );
    out
}

pub(crate) fn output_department_csv(departments: &[DepartmentKpis], order: SortOrder) -> String {
    let mut rows: Vec<&DepartmentKpis> = departments.iter().collect();
    if matches!(order, SortOrder::Desc) {
        rows.reverse();
    }

    let mut out = String::new();
    let _ = writeln!(out, "department,{TALLY_HEADER}");
    for dept in rows {
        let _ = writeln!(
            out,
            "{},{}",
            csv_escape(&dept.department),
            tally_fields(&dept.tally)
        );
    }
    out
}

pub(crate) fn output_period_csv(
    daily: &HashMap<String, DayKpis>,
    period: Period,
    order: SortOrder,
    breakdown: bool,
) -> String {
    let aggregated;
    let stats_ref = if period == Period::Day {
        daily
    } else {
        aggregated = aggregate_daily_by_period(daily, period);
        &aggregated
    };

    let mut rows: Vec<_> = stats_ref.iter().collect();
    match order {
        SortOrder::Asc => rows.sort_by(|a, b| a.0.cmp(b.0)),
        SortOrder::Desc => rows.sort_by(|a, b| b.0.cmp(a.0)),
    }

    let label = period.label();
    let mut out = String::new();

    if breakdown {
        // Breakdown: one row per department per period
        let _ = writeln!(out, "{label},department,{TALLY_HEADER}");
        for (key, kpis) in &rows {
            let mut departments: Vec<_> = kpis.departments.iter().collect();
            departments.sort_by_key(|(name, _)| name.as_str());
            for (department, tally) in departments {
                let _ = writeln!(
                    out,
                    "{},{},{}",
                    csv_escape(key),
                    csv_escape(department),
                    tally_fields(tally)
                );
            }
        }
    } else {
        // Standard: one row per period
        let _ = writeln!(out, "{label},{TALLY_HEADER}");
        for (key, kpis) in &rows {
            let _ = writeln!(out, "{},{}", csv_escape(key), tally_fields(&kpis.tally));
        }
    }

    out
}

pub(crate) fn output_records_csv(records: &[TaskRecord], order: SortOrder) -> String {
    let mut sorted: Vec<&TaskRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);
    if matches!(order, SortOrder::Desc) {
        sorted.reverse();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "date,department,tasks_assigned,tasks_completed,completion_time,sla_target,within_sla"
    );
    for record in sorted {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            record.date.format(DATE_FORMAT),
            csv_escape(&record.department),
            record.tasks_assigned,
            record.tasks_completed,
            record.completion_time,
            record.sla_target,
            record.within_sla(),
        );
    }
    out
}
