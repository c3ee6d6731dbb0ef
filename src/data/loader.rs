use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::consts::UNKNOWN;
use crate::data::columns::{ColumnMap, validate_columns};
use crate::data::types::{DateFilter, LoadResult, RowWarning, TaskRecord};
use crate::error::AppError;
use crate::utils::parse_record_date;

/// Load task records from a CSV file at `path`.
pub(crate) fn load_records(path: &Path, filter: &DateFilter) -> Result<LoadResult, AppError> {
    let file = std::fs::File::open(path)?;
    load_records_reader(std::io::BufReader::new(file), filter)
}

/// Core loading logic — accepts any `Read` source, useful for tests.
///
/// Rows that fail to parse or violate a record invariant are skipped and
/// reported as warnings; a missing required column aborts the whole load.
pub(crate) fn load_records_reader<R: Read>(
    reader: R,
    filter: &DateFilter,
) -> Result<LoadResult, AppError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    validate_columns(&col_map)?;

    let mut records: Vec<TaskRecord> = Vec::new();
    let mut warnings: Vec<RowWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        let line = row_idx + 1; // +1 for the header row

        match result {
            Ok(record) => match parse_row(&col_map, &record) {
                Ok(task) => {
                    if filter.contains(task.date) {
                        records.push(task);
                    }
                }
                Err(message) => {
                    warnings.push(RowWarning { line, message });
                    skipped += 1;
                }
            },
            Err(err) => {
                warnings.push(RowWarning {
                    line,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    Ok(LoadResult {
        records,
        warnings,
        total_rows: row_idx,
        skipped,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

fn parse_row(col_map: &ColumnMap, record: &csv::StringRecord) -> Result<TaskRecord, String> {
    let date_str = col_map.get(record, "Date").unwrap_or("");
    let date = parse_record_date(date_str)
        .ok_or_else(|| format!("invalid Date: {:?}", date_str))?;

    let department = {
        let raw = col_map.get(record, "Department").unwrap_or("").trim();
        if raw.is_empty() {
            UNKNOWN.to_string()
        } else {
            raw.to_string()
        }
    };

    let tasks_assigned = parse_count(col_map.get(record, "Tasks_Assigned"), "Tasks_Assigned")?;
    let tasks_completed = parse_count(col_map.get(record, "Tasks_Completed"), "Tasks_Completed")?;
    if tasks_completed > tasks_assigned {
        return Err(format!(
            "Tasks_Completed ({tasks_completed}) exceeds Tasks_Assigned ({tasks_assigned})"
        ));
    }

    let completion_time = parse_duration(col_map.get(record, "Completion_Time"), "Completion_Time")?;
    let sla_target = parse_duration(col_map.get(record, "SLA_Target"), "SLA_Target")?;

    Ok(TaskRecord {
        date,
        department,
        tasks_assigned,
        tasks_completed,
        completion_time,
        sla_target,
    })
}

fn parse_count(value: Option<&str>, column: &str) -> Result<i64, String> {
    let raw = value.unwrap_or("").trim();
    let n: i64 = raw
        .parse()
        .map_err(|_| format!("invalid {column}: {raw:?}"))?;
    if n < 0 {
        return Err(format!("negative {column}: {n}"));
    }
    Ok(n)
}

fn parse_duration(value: Option<&str>, column: &str) -> Result<f64, String> {
    let raw = value.unwrap_or("").trim();
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("invalid {column}: {raw:?}"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("invalid {column}: {raw:?}"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HDR: &str = "Date,Department,Tasks_Assigned,Tasks_Completed,Completion_Time,SLA_Target";

    fn load(csv: &str) -> LoadResult {
        load_records_reader(csv.as_bytes(), &DateFilter::default()).unwrap()
    }

    fn load_err(csv: &str) -> AppError {
        load_records_reader(csv.as_bytes(), &DateFilter::default()).unwrap_err()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn loads_valid_rows() {
        let csv = format!(
            "{HDR}\n\
             2025-03-01,Logistics,10,8,5,6\n\
             2025-03-02,Support,5,5,4.5,6"
        );
        let out = load(&csv);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.total_rows, 2);
        assert_eq!(out.skipped, 0);
        let r = &out.records[0];
        assert_eq!(r.date, d(2025, 3, 1));
        assert_eq!(r.department, "Logistics");
        assert_eq!(r.tasks_assigned, 10);
        assert_eq!(r.tasks_completed, 8);
        assert!(r.within_sla());
    }

    #[test]
    fn accepts_alternate_date_formats() {
        let csv = format!(
            "{HDR}\n\
             2025/03/01,A,1,1,1,2\n\
             03/02/2025,A,1,1,1,2\n\
             2025-03-03 14:00:00,A,1,1,1,2"
        );
        let out = load(&csv);
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.records[1].date, d(2025, 3, 2));
        assert_eq!(out.records[2].date, d(2025, 3, 3));
    }

    #[test]
    fn empty_department_becomes_unknown() {
        let csv = format!("{HDR}\n2025-03-01,  ,4,2,7,6");
        let out = load(&csv);
        assert_eq!(out.records[0].department, "unknown");
    }

    #[test]
    fn non_numeric_row_skipped_with_warning() {
        let csv = format!(
            "{HDR}\n\
             2025-03-01,A,10,8,5,6\n\
             2025-03-02,B,lots,8,5,6\n\
             2025-03-03,C,4,2,7,6"
        );
        let out = load(&csv);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.skipped, 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].line, 3);
        assert!(out.warnings[0].message.contains("Tasks_Assigned"));
    }

    #[test]
    fn bad_date_row_skipped() {
        let csv = format!("{HDR}\nyesterday,A,10,8,5,6");
        let out = load(&csv);
        assert!(out.records.is_empty());
        assert_eq!(out.skipped, 1);
        assert!(out.warnings[0].message.contains("Date"));
    }

    #[test]
    fn completed_exceeding_assigned_is_reported_not_clamped() {
        let csv = format!(
            "{HDR}\n\
             2025-03-01,A,5,9,5,6\n\
             2025-03-01,A,5,5,5,6"
        );
        let out = load(&csv);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 1);
        assert!(out.warnings[0].message.contains("exceeds"));
        // the surviving row is untouched
        assert_eq!(out.records[0].tasks_completed, 5);
    }

    #[test]
    fn negative_counts_rejected() {
        let csv = format!("{HDR}\n2025-03-01,A,-3,0,5,6");
        let out = load(&csv);
        assert_eq!(out.skipped, 1);
        assert!(out.warnings[0].message.contains("negative"));
    }

    #[test]
    fn non_finite_duration_rejected() {
        let csv = format!("{HDR}\n2025-03-01,A,3,2,NaN,6");
        let out = load(&csv);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn date_filter_applied_at_load() {
        let csv = format!(
            "{HDR}\n\
             2025-03-01,A,10,8,5,6\n\
             2025-03-15,A,5,5,4,6\n\
             2025-04-01,A,4,2,7,6"
        );
        let filter = DateFilter::new(Some(d(2025, 3, 10)), Some(d(2025, 3, 31)));
        let out = load_records_reader(csv.as_bytes(), &filter).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].date, d(2025, 3, 15));
        // filtered rows are not "skipped" — they parsed fine
        assert_eq!(out.skipped, 0);
        assert_eq!(out.total_rows, 3);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "Date,Department,Tasks_Assigned\n2025-03-01,A,10";
        match load_err(csv) {
            AppError::MissingColumns(cols) => {
                assert!(cols.contains(&"Tasks_Completed".to_string()));
                assert!(cols.contains(&"SLA_Target".to_string()));
            }
            e => panic!("Expected MissingColumns, got {:?}", e),
        }
    }

    #[test]
    fn empty_input_is_fatal() {
        match load_err("") {
            AppError::EmptyFile | AppError::MissingColumns(_) | AppError::Csv(_) => {}
            e => panic!("Expected EmptyFile or related error, got {:?}", e),
        }
    }

    #[test]
    fn header_only_file_loads_zero_records() {
        let out = load(HDR);
        assert!(out.records.is_empty());
        assert_eq!(out.total_rows, 0);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!("{HDR},Notes\n2025-03-01,A,10,8,5,6,late shipment");
        let out = load(&csv);
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn whitespace_around_values_tolerated() {
        let csv = format!("{HDR}\n2025-03-01, Fulfillment , 10 , 8 , 5.5 , 6 ");
        let out = load(&csv);
        assert_eq!(out.records[0].department, "Fulfillment");
        assert_eq!(out.records[0].tasks_assigned, 10);
        assert_eq!(out.records[0].completion_time, 5.5);
    }
}
