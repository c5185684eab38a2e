use serde::Serialize;

/// Statistics collected from one sysbench report.
///
/// Every field starts at its zero value and is only overwritten when a
/// matching report line is seen, so a truncated report still yields a
/// usable record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchResult {
    pub sysbench_version: String,
    pub luajit_version: String,
    pub threads: i64,
    pub total_read: i64,
    pub total_write: i64,
    pub total_other: i64,
    pub total_transactions: i64,
    pub transactions_per_sec: f64,
    pub total_queries: i64,
    pub queries_per_sec: f64,
    pub ignored_errors: i64,
    pub reconnects: i64,
    pub total_time_secs: f64,
    pub total_events: i64,
    pub min_latency_ms: f64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub sum_latency_ms: f64,
    pub thread_events_avg: f64,
    pub thread_events_stddev: f64,
    pub thread_exec_time_avg: f64,
    pub thread_exec_time_stddev: f64,
}

/// A single rendered field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
}

/// Column names in output order.
pub const FIELD_NAMES: [&str; 23] = [
    "sysbench_version",
    "luajit_version",
    "threads",
    "total_read",
    "total_write",
    "total_other",
    "total_transactions",
    "transactions_per_sec",
    "total_queries",
    "queries_per_sec",
    "ignored_errors",
    "reconnects",
    "total_time_secs",
    "total_events",
    "min_latency_ms",
    "avg_latency_ms",
    "max_latency_ms",
    "p95_latency_ms",
    "sum_latency_ms",
    "thread_events_avg",
    "thread_events_stddev",
    "thread_exec_time_avg",
    "thread_exec_time_stddev",
];

impl BenchResult {
    /// All fields in output order, matching [`FIELD_NAMES`].
    pub fn values(&self) -> [FieldValue<'_>; 23] {
        use FieldValue::{Float, Int, Text};
        [
            Text(&self.sysbench_version),
            Text(&self.luajit_version),
            Int(self.threads),
            Int(self.total_read),
            Int(self.total_write),
            Int(self.total_other),
            Int(self.total_transactions),
            Float(self.transactions_per_sec),
            Int(self.total_queries),
            Float(self.queries_per_sec),
            Int(self.ignored_errors),
            Int(self.reconnects),
            Float(self.total_time_secs),
            Int(self.total_events),
            Float(self.min_latency_ms),
            Float(self.avg_latency_ms),
            Float(self.max_latency_ms),
            Float(self.p95_latency_ms),
            Float(self.sum_latency_ms),
            Float(self.thread_events_avg),
            Float(self.thread_events_stddev),
            Float(self.thread_exec_time_avg),
            Float(self.thread_exec_time_stddev),
        ]
    }
}

impl std::fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
            // Non-finite values use the `+Inf`/`-Inf`/`NaN` spelling of C-style `%.3f`.
            FieldValue::Float(x) if x.is_nan() => f.write_str("NaN"),
            FieldValue::Float(x) if x.is_infinite() => {
                f.write_str(if x.is_sign_positive() { "+Inf" } else { "-Inf" })
            }
            FieldValue::Float(x) => write!(f, "{x:.3}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero() {
        let r = BenchResult::default();
        assert!(r.sysbench_version.is_empty());
        assert!(r.luajit_version.is_empty());
        for v in &r.values()[2..] {
            match v {
                FieldValue::Int(n) => assert_eq!(*n, 0),
                FieldValue::Float(x) => assert_eq!(*x, 0.0),
                FieldValue::Text(_) => panic!("unexpected text field"),
            }
        }
    }

    #[test]
    fn float_values_render_three_decimals() {
        assert_eq!(FieldValue::Float(2.7).to_string(), "2.700");
        assert_eq!(FieldValue::Float(300.0032).to_string(), "300.003");
        assert_eq!(FieldValue::Float(0.0).to_string(), "0.000");
    }

    #[test]
    fn non_finite_floats_render_signed() {
        assert_eq!(FieldValue::Float(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(FieldValue::Float(f64::NEG_INFINITY).to_string(), "-Inf");
        assert_eq!(FieldValue::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn int_and_text_values_render_plain() {
        assert_eq!(FieldValue::Int(1773770).to_string(), "1773770");
        assert_eq!(FieldValue::Text("1.0.9").to_string(), "1.0.9");
    }

    #[test]
    fn names_match_serialized_fields() {
        let json = serde_json::to_value(BenchResult::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FIELD_NAMES.len());
        for name in FIELD_NAMES {
            assert!(obj.contains_key(name), "missing {name}");
        }
    }
}
