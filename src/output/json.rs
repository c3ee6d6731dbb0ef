use std::collections::HashMap;

use serde_json::{Value, json};

use crate::cli::SortOrder;
use crate::consts::DATE_FORMAT;
use crate::core::{DayKpis, DepartmentKpis, OverallKpis, Tally};
use crate::data::TaskRecord;
use crate::output::format::rate_json_value;
use crate::output::period::{Period, aggregate_daily_by_period};

fn tally_fields(tally: &Tally) -> Vec<(&'static str, Value)> {
    vec![
        ("rows", json!(tally.rows)),
        ("tasks_assigned", json!(tally.assigned)),
        ("tasks_completed", json!(tally.completed)),
        ("completion_rate", rate_json_value(tally.completion_rate())),
        (
            "sla_compliance_rate",
            rate_json_value(tally.sla_compliance_rate()),
        ),
    ]
}

fn tally_object(tally: &Tally) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in tally_fields(tally) {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

fn sort_by_key_field(output: &mut [Value], field: &str, order: SortOrder) {
    output.sort_by(|a, b| {
        let a = a.get(field).and_then(|v| v.as_str());
        let b = b.get(field).and_then(|v| v.as_str());
        match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        }
    });
}

pub(crate) fn output_summary_json(overall: &OverallKpis, loaded: usize, skipped: usize) -> String {
    let mut object = serde_json::Map::new();
    for (key, value) in tally_fields(&overall.tally) {
        object.insert(key.to_string(), value);
    }
    object.insert("departments".to_string(), json!(overall.department_count));
    object.insert(
        "first_date".to_string(),
        overall
            .first_date
            .map_or(Value::Null, |d| json!(d.format(DATE_FORMAT).to_string())),
    );
    object.insert(
        "last_date".to_string(),
        overall
            .last_date
            .map_or(Value::Null, |d| json!(d.format(DATE_FORMAT).to_string())),
    );
    object.insert("rows_loaded".to_string(), json!(loaded));
    object.insert("rows_skipped".to_string(), json!(skipped));

    serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default()
}

pub(crate) fn output_department_json(departments: &[DepartmentKpis], order: SortOrder) -> String {
    let mut output: Vec<Value> = departments
        .iter()
        .map(|dept| {
            let mut object = serde_json::Map::new();
            object.insert("department".to_string(), json!(dept.department));
            for (key, value) in tally_fields(&dept.tally) {
                object.insert(key.to_string(), value);
            }
            Value::Object(object)
        })
        .collect();

    sort_by_key_field(&mut output, "department", order);
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub(crate) fn output_period_json(
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

    let label = period.label();
    let mut output: Vec<Value> = Vec::new();
    for (key, kpis) in stats_ref {
        let mut object = serde_json::Map::new();
        object.insert(label.to_string(), json!(key));
        for (field, value) in tally_fields(&kpis.tally) {
            object.insert(field.to_string(), value);
        }
        if breakdown {
            let mut departments: Vec<_> = kpis.departments.iter().collect();
            departments.sort_by_key(|(name, _)| name.as_str());
            let departments: serde_json::Map<String, Value> = departments
                .into_iter()
                .map(|(name, tally)| (name.clone(), tally_object(tally)))
                .collect();
            object.insert("departments".to_string(), Value::Object(departments));
        }
        output.push(Value::Object(object));
    }

    sort_by_key_field(&mut output, label, order);
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub(crate) fn output_records_json(records: &[TaskRecord], order: SortOrder) -> String {
    let mut output: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "date": record.date.format(DATE_FORMAT).to_string(),
                "department": record.department,
                "tasks_assigned": record.tasks_assigned,
                "tasks_completed": record.tasks_completed,
                "completion_time": record.completion_time,
                "sla_target": record.sla_target,
                "within_sla": record.within_sla(),
            })
        })
        .collect();

    sort_by_key_field(&mut output, "date", order);
    serde_json::to_string_pretty(&output).unwrap_or_default()
}
