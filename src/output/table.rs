use comfy_table::{Cell, Color};
use std::collections::HashMap;

use crate::cli::SortOrder;
use crate::consts::DATE_FORMAT;
use crate::core::{DayKpis, DepartmentKpis, OverallKpis, Tally};
use crate::data::TaskRecord;
use crate::output::format::{
    NumberFormat, create_styled_table, format_duration, format_number, format_percent,
    header_cell, rate_color, right_cell, styled_cell,
};
use crate::output::period::{Period, aggregate_daily_by_period};

#[derive(Debug, Clone, Copy)]
pub(crate) struct KpiTableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryOptions {
    pub(crate) loaded: usize,
    pub(crate) skipped: usize,
    pub(crate) elapsed_ms: Option<f64>,
}

/// Print the footer line with row accounting and optional timing
pub(crate) fn print_summary_line(options: SummaryOptions, use_color: bool) {
    let stats_text = format!(
        "{} task records loaded ({} rows skipped)",
        options.loaded, options.skipped
    );

    if let Some(ms) = options.elapsed_ms {
        if use_color {
            println!("\n  {} | \x1b[36m{:.0}ms\x1b[0m\n", stats_text, ms);
        } else {
            println!("\n  {} | {:.0}ms\n", stats_text, ms);
        }
    } else {
        println!("\n  {}\n", stats_text);
    }
}

fn sort_keys(keys: &mut [&String], order: SortOrder) {
    match order {
        SortOrder::Asc => keys.sort(),
        SortOrder::Desc => keys.sort_by(|a, b| b.cmp(a)),
    }
}

fn rate_cells(tally: &Tally, use_color: bool, number_format: NumberFormat) -> [Cell; 2] {
    let completion = tally.completion_rate();
    let sla = tally.sla_compliance_rate();
    [
        right_cell(
            &format_percent(completion, number_format),
            rate_color(completion, use_color),
            false,
        ),
        right_cell(
            &format_percent(sla, number_format),
            rate_color(sla, use_color),
            false,
        ),
    ]
}

/// Overall KPI summary — the dashboard's headline numbers.
pub(crate) fn print_summary_table(
    overall: &OverallKpis,
    summary: SummaryOptions,
    options: KpiTableOptions,
) {
    let c = options.use_color;
    let fmt = options.number_format;

    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", c), header_cell("Value", c)]);

    let date_range = match (overall.first_date, overall.last_date) {
        (Some(first), Some(last)) => format!(
            "{} .. {}",
            first.format(DATE_FORMAT),
            last.format(DATE_FORMAT)
        ),
        _ => "n/a".to_string(),
    };

    let completion = overall.tally.completion_rate();
    let sla = overall.tally.sla_compliance_rate();

    table.add_row(vec![
        Cell::new("Tasks assigned"),
        right_cell(&format_number(overall.tally.assigned, fmt), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Tasks completed"),
        right_cell(&format_number(overall.tally.completed, fmt), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Completion rate"),
        right_cell(&format_percent(completion, fmt), rate_color(completion, c), true),
    ]);
    table.add_row(vec![
        Cell::new("SLA compliance"),
        right_cell(&format_percent(sla, fmt), rate_color(sla, c), true),
    ]);
    if !options.compact {
        table.add_row(vec![
            Cell::new("Departments"),
            right_cell(&format_number(overall.department_count as i64, fmt), None, false),
        ]);
        table.add_row(vec![Cell::new("Date range"), right_cell(&date_range, None, false)]);
    }

    println!("{table}");
    print_summary_line(summary, c);
}

/// Per-department KPI breakdown with a TOTAL row.
pub(crate) fn print_department_table(
    departments: &[DepartmentKpis],
    summary: SummaryOptions,
    options: KpiTableOptions,
) {
    let c = options.use_color;
    let fmt = options.number_format;

    let mut rows: Vec<&DepartmentKpis> = departments.iter().collect();
    if matches!(options.order, SortOrder::Desc) {
        rows.reverse();
    }

    let mut table = create_styled_table();
    if options.compact {
        table.set_header(vec![
            header_cell("Department", c),
            header_cell("Done", c),
            header_cell("SLA", c),
        ]);
    } else {
        table.set_header(vec![
            header_cell("Department", c),
            header_cell("Rows", c),
            header_cell("Assigned", c),
            header_cell("Completed", c),
            header_cell("Done", c),
            header_cell("SLA", c),
        ]);
    }

    let mut total = Tally::default();
    for dept in &rows {
        total.add(&dept.tally);
        let [done, sla] = rate_cells(&dept.tally, c, fmt);
        if options.compact {
            table.add_row(vec![Cell::new(&dept.department), done, sla]);
        } else {
            table.add_row(vec![
                Cell::new(&dept.department),
                right_cell(&format_number(dept.tally.rows, fmt), None, false),
                right_cell(&format_number(dept.tally.assigned, fmt), None, false),
                right_cell(&format_number(dept.tally.completed, fmt), None, false),
                done,
                sla,
            ]);
        }
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let [done, sla] = rate_cells(&total, c, fmt);
    if options.compact {
        table.add_row(vec![styled_cell("TOTAL", cyan, true), done, sla]);
    } else {
        table.add_row(vec![
            styled_cell("TOTAL", cyan, true),
            right_cell(&format_number(total.rows, fmt), cyan, true),
            right_cell(&format_number(total.assigned, fmt), cyan, true),
            right_cell(&format_number(total.completed, fmt), cyan, true),
            done,
            sla,
        ]);
    }

    println!("{table}");
    print_summary_line(summary, c);
}

struct PeriodConfig {
    label: &'static str,
    title: &'static str,
}

fn period_config(period: Period) -> PeriodConfig {
    match period {
        Period::Day => PeriodConfig {
            label: "Date",
            title: "Daily KPIs",
        },
        Period::Week => PeriodConfig {
            label: "Week",
            title: "Weekly KPIs",
        },
        Period::Month => PeriodConfig {
            label: "Month",
            title: "Monthly KPIs",
        },
    }
}

/// Per-period KPI trend; `breakdown` adds one row per department within
/// each period.
pub(crate) fn print_period_table(
    daily: &HashMap<String, DayKpis>,
    period: Period,
    breakdown: bool,
    summary: SummaryOptions,
    options: KpiTableOptions,
) {
    let c = options.use_color;
    let fmt = options.number_format;
    let cfg = period_config(period);

    let aggregated;
    let stats_ref = if period == Period::Day {
        daily
    } else {
        aggregated = aggregate_daily_by_period(daily, period);
        &aggregated
    };

    let mut keys: Vec<&String> = stats_ref.keys().collect();
    sort_keys(&mut keys, options.order);

    let mut table = create_styled_table();
    let mut header = vec![header_cell(cfg.label, c)];
    if breakdown {
        header.push(header_cell("Department", c));
    }
    if !options.compact {
        header.extend([header_cell("Assigned", c), header_cell("Completed", c)]);
    }
    header.extend([header_cell("Done", c), header_cell("SLA", c)]);
    table.set_header(header);

    let mut total = Tally::default();
    for key in &keys {
        let kpis = &stats_ref[*key];
        total.add(&kpis.tally);

        if breakdown {
            let mut departments: Vec<_> = kpis.departments.iter().collect();
            departments.sort_by_key(|(name, _)| name.as_str());
            for (department, tally) in departments {
                let [done, sla] = rate_cells(tally, c, fmt);
                let mut row = vec![Cell::new(key), Cell::new(department)];
                if !options.compact {
                    row.extend([
                        right_cell(&format_number(tally.assigned, fmt), None, false),
                        right_cell(&format_number(tally.completed, fmt), None, false),
                    ]);
                }
                row.extend([done, sla]);
                table.add_row(row);
            }
        } else {
            let [done, sla] = rate_cells(&kpis.tally, c, fmt);
            let mut row = vec![Cell::new(key)];
            if !options.compact {
                row.extend([
                    right_cell(&format_number(kpis.tally.assigned, fmt), None, false),
                    right_cell(&format_number(kpis.tally.completed, fmt), None, false),
                ]);
            }
            row.extend([done, sla]);
            table.add_row(row);
        }
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let [done, sla] = rate_cells(&total, c, fmt);
    let mut row = vec![styled_cell("TOTAL", cyan, true)];
    if breakdown {
        row.push(Cell::new(""));
    }
    if !options.compact {
        row.extend([
            right_cell(&format_number(total.assigned, fmt), cyan, true),
            right_cell(&format_number(total.completed, fmt), cyan, true),
        ]);
    }
    row.extend([done, sla]);
    table.add_row(row);

    if c {
        println!("\n \x1b[1m{}\x1b[0m", cfg.title);
    } else {
        println!("\n {}", cfg.title);
    }
    println!("{table}");
    print_summary_line(summary, c);
}

/// The loaded records, one row each — the dashboard's raw-data view.
pub(crate) fn print_records_table(
    records: &[TaskRecord],
    summary: SummaryOptions,
    options: KpiTableOptions,
) {
    let c = options.use_color;
    let fmt = options.number_format;

    let mut sorted: Vec<&TaskRecord> = records.iter().collect();
    match options.order {
        SortOrder::Asc => sorted.sort_by_key(|r| r.date),
        SortOrder::Desc => {
            sorted.sort_by_key(|r| r.date);
            sorted.reverse();
        }
    }

    let mut table = create_styled_table();
    if options.compact {
        table.set_header(vec![
            header_cell("Date", c),
            header_cell("Department", c),
            header_cell("Done", c),
            header_cell("SLA", c),
        ]);
    } else {
        table.set_header(vec![
            header_cell("Date", c),
            header_cell("Department", c),
            header_cell("Assigned", c),
            header_cell("Completed", c),
            header_cell("Time", c),
            header_cell("Target", c),
            header_cell("SLA", c),
        ]);
    }

    for record in &sorted {
        let tally = Tally::from_record(record);
        let date = record.date.format(DATE_FORMAT).to_string();
        if options.compact {
            let [done, sla] = rate_cells(&tally, c, fmt);
            table.add_row(vec![
                Cell::new(&date),
                Cell::new(&record.department),
                done,
                sla,
            ]);
        } else {
            let sla_text = if record.within_sla() { "ok" } else { "miss" };
            let sla_color = if !c {
                None
            } else if record.within_sla() {
                Some(Color::Green)
            } else {
                Some(Color::Red)
            };
            table.add_row(vec![
                Cell::new(&date),
                Cell::new(&record.department),
                right_cell(&format_number(record.tasks_assigned, fmt), None, false),
                right_cell(&format_number(record.tasks_completed, fmt), None, false),
                right_cell(&format_duration(record.completion_time, fmt), None, false),
                right_cell(&format_duration(record.sla_target, fmt), None, false),
                styled_cell(sla_text, sla_color, false),
            ]);
        }
    }

    println!("{table}");
    print_summary_line(summary, c);
}
