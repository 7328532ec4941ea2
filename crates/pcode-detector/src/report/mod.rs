//! Result reporting.

mod row;
mod sink;

pub use row::ReportRow;
pub use sink::{CsvReportSink, MemorySink, ResultSink, report_header};
