mod csv;
mod format;
mod json;
mod period;
mod table;

pub(crate) use csv::{
    output_department_csv, output_period_csv, output_records_csv, output_summary_csv,
};
pub(crate) use format::NumberFormat;
pub(crate) use json::{
    output_department_json, output_period_json, output_records_json, output_summary_json,
};
pub(crate) use period::Period;
pub(crate) use table::{
    KpiTableOptions, SummaryOptions, print_department_table, print_period_table,
    print_records_table, print_summary_table,
};
