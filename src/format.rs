//! Rendering a [`BenchResult`] as a single output row.
use crate::report::{BenchResult, FIELD_NAMES};
use serde::Deserialize;

/// Output rendering selected by config or CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Space-separated values.
    #[default]
    Plain,
    /// Comma-space separated values.
    Csv,
    /// One JSON object.
    Json,
}

/// Space-separated, floats at three decimals.
pub fn format_plain(result: &BenchResult) -> String {
    join(result, " ")
}

/// Comma-space separated, same fields and precision as [`format_plain`].
pub fn format_csv(result: &BenchResult) -> String {
    join(result, ", ")
}

/// Column names for [`format_csv`].
pub fn csv_header() -> String {
    FIELD_NAMES.join(", ")
}

/// Single-line JSON object keyed by field name.
pub fn format_json(result: &BenchResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Render `result` in the requested format.
pub fn render(result: &BenchResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(format_plain(result)),
        OutputFormat::Csv => Ok(format_csv(result)),
        OutputFormat::Json => format_json(result),
    }
}

fn join(result: &BenchResult, sep: &str) -> String {
    result
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_str;

    const SAMPLE: &str = include_str!("../testdata/sample1.txt");

    const EXPECTED_PLAIN: &str = "1.0.9 2.0.4 16 24833060 7095097 3547560 1773770 5912.460 35475717 118250.340 20 0 300.003 1773770 2.240 2.700 79.970 3.250 4796635.380 110860.625 959.190 299.790 0.000";
    const EXPECTED_CSV: &str = "1.0.9, 2.0.4, 16, 24833060, 7095097, 3547560, 1773770, 5912.460, 35475717, 118250.340, 20, 0, 300.003, 1773770, 2.240, 2.700, 79.970, 3.250, 4796635.380, 110860.625, 959.190, 299.790, 0.000";

    /// Indices of float columns in output order.
    const FLOAT_COLUMNS: [usize; 12] = [7, 9, 12, 14, 15, 16, 17, 18, 19, 20, 21, 22];

    #[test]
    fn plain_output_of_canonical_report() {
        assert_eq!(format_plain(&parse_str(SAMPLE)), EXPECTED_PLAIN);
    }

    #[test]
    fn csv_output_of_canonical_report() {
        assert_eq!(format_csv(&parse_str(SAMPLE)), EXPECTED_CSV);
    }

    #[test]
    fn default_record_renders_zeroes() {
        let r = BenchResult::default();
        // Empty version strings still occupy their slots.
        assert_eq!(
            format_plain(&r),
            "  0 0 0 0 0 0.000 0 0.000 0 0 0.000 0 0.000 0.000 0.000 0.000 0.000 0.000 0.000 0.000 0.000"
        );
        assert_eq!(format_csv(&r).split(", ").count(), 23);
    }

    #[test]
    fn every_row_has_23_fields_with_three_decimal_floats() {
        let mut r = parse_str(SAMPLE);
        r.min_latency_ms = 1.0 / 3.0;
        r.sum_latency_ms = 1e9;
        let row = format_csv(&r);
        let fields: Vec<&str> = row.split(", ").collect();
        assert_eq!(fields.len(), 23);
        for i in FLOAT_COLUMNS {
            let (_, frac) = fields[i].split_once('.').expect("float column has a point");
            assert_eq!(frac.len(), 3, "column {i} = {}", fields[i]);
        }
        assert_eq!(format_plain(&r).split(' ').count(), 23);
    }

    #[test]
    fn header_matches_row_width() {
        let header = csv_header();
        assert!(header.starts_with("sysbench_version, luajit_version, threads"));
        assert_eq!(header.split(", ").count(), 23);
    }

    #[test]
    fn json_carries_named_fields() {
        let json = format_json(&parse_str(SAMPLE)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["sysbench_version"], "1.0.9");
        assert_eq!(v["threads"], 16);
        assert_eq!(v["p95_latency_ms"], 3.25);
        assert!(!json.contains('\n'));
    }

    #[test]
    fn render_dispatches_on_format() {
        let r = parse_str(SAMPLE);
        assert_eq!(render(&r, OutputFormat::Plain).unwrap(), EXPECTED_PLAIN);
        assert_eq!(render(&r, OutputFormat::Csv).unwrap(), EXPECTED_CSV);
        assert!(render(&r, OutputFormat::Json).unwrap().starts_with('{'));
    }

    #[test]
    fn output_format_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrap {
            format: OutputFormat,
        }
        let w: Wrap = toml::from_str("format = \"csv\"").unwrap();
        assert_eq!(w.format, OutputFormat::Csv);
    }
}
