//! Line classification and field extraction for sysbench reports.
//!
//! Each report line is normalized, matched against an ordered marker table
//! and, on the first hit, the relevant whitespace-separated tokens are
//! converted into [`BenchResult`] fields. Unparseable tokens are skipped
//! and the field keeps whatever value it already had.
use crate::report::BenchResult;
use regex::Regex;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::LazyLock;

/// Runs of spaces and tabs, collapsed to a single space before tokenizing.
static HORIZONTAL_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new("[ \t]+").unwrap());

type Extractor = fn(&mut BenchResult, &[&str]);

/// A marker substring and the extractor that runs when a line contains it.
pub struct Marker {
    pub pattern: &'static str,
    extract: Extractor,
}

/// Markers in evaluation order. The first match wins.
///
/// Order is significant: `total:` sits ahead of `transactions:` and the
/// plain `time:`/`events:`/`avg:` markers sit ahead of the thread-fairness
/// markers.
pub static MARKERS: &[Marker] = &[
    Marker {
        pattern: "sysbench",
        extract: |r, t| {
            if let Some(v) = t.get(1) {
                r.sysbench_version = (*v).to_string();
            }
            if let Some(v) = t.get(5) {
                r.luajit_version = v.replace(')', "");
            }
        },
    },
    Marker {
        pattern: "Number of threads",
        extract: |r, t| set(&mut r.threads, "threads", t.get(3).copied()),
    },
    Marker {
        pattern: "read:",
        extract: |r, t| set(&mut r.total_read, "total_read", t.get(2).copied()),
    },
    Marker {
        pattern: "write:",
        extract: |r, t| set(&mut r.total_write, "total_write", t.get(2).copied()),
    },
    Marker {
        pattern: "other:",
        extract: |r, t| set(&mut r.total_other, "total_other", t.get(2).copied()),
    },
    Marker {
        pattern: "total:",
        extract: |r, t| {
            set(
                &mut r.total_transactions,
                "total_transactions",
                t.get(2).copied(),
            )
        },
    },
    Marker {
        pattern: "transactions:",
        extract: |r, t| {
            set(
                &mut r.total_transactions,
                "total_transactions",
                t.get(2).copied(),
            );
            let rate = t.get(3).map(|s| s.replace('(', ""));
            set(
                &mut r.transactions_per_sec,
                "transactions_per_sec",
                rate.as_deref(),
            );
        },
    },
    Marker {
        pattern: "queries:",
        extract: |r, t| {
            set(&mut r.total_queries, "total_queries", t.get(2).copied());
            let rate = t.get(3).map(|s| s.replace('(', ""));
            set(&mut r.queries_per_sec, "queries_per_sec", rate.as_deref());
        },
    },
    Marker {
        pattern: "errors:",
        extract: |r, t| set(&mut r.ignored_errors, "ignored_errors", t.get(3).copied()),
    },
    Marker {
        pattern: "reconnects:",
        extract: |r, t| set(&mut r.reconnects, "reconnects", t.get(2).copied()),
    },
    Marker {
        pattern: "time:",
        extract: |r, t| {
            let secs = t.get(3).map(|s| s.replace('s', ""));
            set(&mut r.total_time_secs, "total_time_secs", secs.as_deref());
        },
    },
    Marker {
        pattern: "events:",
        extract: |r, t| set(&mut r.total_events, "total_events", t.get(5).copied()),
    },
    Marker {
        pattern: "min:",
        extract: |r, t| set(&mut r.min_latency_ms, "min_latency_ms", t.get(2).copied()),
    },
    Marker {
        pattern: "avg:",
        extract: |r, t| set(&mut r.avg_latency_ms, "avg_latency_ms", t.get(2).copied()),
    },
    Marker {
        pattern: "max:",
        extract: |r, t| set(&mut r.max_latency_ms, "max_latency_ms", t.get(2).copied()),
    },
    Marker {
        pattern: "percentile:",
        extract: |r, t| set(&mut r.p95_latency_ms, "p95_latency_ms", t.get(3).copied()),
    },
    Marker {
        pattern: "sum:",
        extract: |r, t| set(&mut r.sum_latency_ms, "sum_latency_ms", t.get(2).copied()),
    },
    Marker {
        pattern: "events (avg/stddev):",
        extract: |r, t| {
            let (avg, stddev) = split_pair(t.get(3).copied());
            set(&mut r.thread_events_avg, "thread_events_avg", avg);
            set(&mut r.thread_events_stddev, "thread_events_stddev", stddev);
        },
    },
    Marker {
        pattern: "time (avg/stddev):",
        extract: |r, t| {
            let (avg, stddev) = split_pair(t.get(4).copied());
            set(&mut r.thread_exec_time_avg, "thread_exec_time_avg", avg);
            set(
                &mut r.thread_exec_time_stddev,
                "thread_exec_time_stddev",
                stddev,
            );
        },
    },
];

/// Collapse runs of spaces and tabs into one space. Leading and trailing
/// whitespace is collapsed, not removed.
pub fn normalize(line: &str) -> std::borrow::Cow<'_, str> {
    HORIZONTAL_WS.replace_all(line, " ")
}

/// The marker that would handle `line`, if any.
pub fn classify(line: &str) -> Option<&'static Marker> {
    find_marker(&normalize(line))
}

/// First marker contained in an already normalized line.
fn find_marker(normalized: &str) -> Option<&'static Marker> {
    MARKERS.iter().find(|m| normalized.contains(m.pattern))
}

/// Apply one report line to `result`.
///
/// Lines that match no marker leave `result` untouched, as do tokens that
/// are missing or fail to parse.
pub fn extract_line(result: &mut BenchResult, line: &str) {
    let line = normalize(line);
    let Some(marker) = find_marker(&line) else {
        return;
    };
    tracing::trace!(marker = marker.pattern, line = %line, "matched report line");
    let tokens: Vec<&str> = line.split(' ').collect();
    (marker.extract)(result, &tokens);
}

/// Build a result from an ordered sequence of lines.
pub fn parse_lines<'a, I>(lines: I) -> BenchResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = BenchResult::default();
    for line in lines {
        extract_line(&mut result, line.strip_suffix('\r').unwrap_or(line));
    }
    result
}

/// Build a result from a whole report held in memory.
pub fn parse_str(report: &str) -> BenchResult {
    parse_lines(report.split('\n'))
}

/// Stream a report line by line. Only I/O failures are errors; bytes that
/// are not valid UTF-8 are replaced and the line is still extracted.
pub fn parse_reader<R: BufRead>(mut reader: R) -> std::io::Result<BenchResult> {
    let mut result = BenchResult::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        extract_line(&mut result, &String::from_utf8_lossy(raw));
    }
    Ok(result)
}

/// Overwrite `field` with the parsed token, or leave it alone.
fn set<T: FromStr>(field: &mut T, name: &str, token: Option<&str>) {
    match token.map(str::parse::<T>) {
        Some(Ok(v)) => *field = v,
        Some(Err(_)) => tracing::debug!(field = name, token, "unparseable token, field skipped"),
        None => tracing::debug!(field = name, "token missing, field skipped"),
    }
}

/// Split an `avg/stddev` token into its two halves.
fn split_pair(token: Option<&str>) -> (Option<&str>, Option<&str>) {
    match token {
        Some(t) => {
            let mut parts = t.split('/');
            (parts.next(), parts.next())
        }
        None => (None, None),
    }
}
