pub(crate) mod date;

pub(crate) use date::{parse_date, parse_record_date};
