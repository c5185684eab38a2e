//! Parse sysbench benchmark reports into a single row of statistics.
//!
//! Lines are fed through [`extract::extract_line`] into one
//! [`report::BenchResult`], which [`format::render`] turns into a plain,
//! CSV or JSON row.
pub mod config;
pub mod extract;
pub mod format;
pub mod input;
pub mod report;

pub use extract::{extract_line, parse_lines, parse_reader, parse_str};
pub use format::{format_csv, format_plain, OutputFormat};
pub use report::BenchResult;
