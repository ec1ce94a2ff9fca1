//! # trace-log
//!
//! why: read mongod logs written with `logComponentVerbosity: {tlaPlusTrace: 1}` and pick out trace records
//! relations: produces trace-core RawEvent streams for the merge, one stream per log file
//! what: LINE_PATTERN, parse_line, LogSource iterator, open_sources

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use trace_core::{RawEvent, TraceError};

/// Matches trace lines like
/// `2019-07-16T12:24:41.964-0400 I  TLA_PLUS [replexec-0] {"action": ...}`.
pub const LINE_PATTERN: &str = r"(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4}).+? TLA_PLUS \[(?P<thread>[\w\-\d]+)\] (?P<json>\{.*\})";

/// chrono format of the leading timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(LINE_PATTERN).expect("trace line pattern compiles"));

/// parse a mongod log timestamp such as `2019-07-16T12:24:41.964-0400`
pub fn parse_log_timestamp(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT)
}

/// parse one log line
///
/// returns `None` for lines that are not trace records. a trace record whose
/// json does not decode is `MalformedInput`, with a 1-based byte column into
/// the line.
pub fn parse_line(name: &str, line_number: usize, line: &str) -> Option<Result<RawEvent, TraceError>> {
    let caps = LINE_RE.captures(line)?;
    let location = format!("{name}:{line_number}");

    let stamp = &caps["timestamp"];
    let timestamp = match parse_log_timestamp(stamp) {
        Ok(t) => t,
        Err(e) => {
            return Some(Err(TraceError::MalformedInput {
                location,
                column: 1,
                message: format!("invalid timestamp {stamp:?}: {e}"),
            }))
        }
    };

    let json = caps.name("json")?;
    let payload = match serde_json::from_str(json.as_str()) {
        Ok(v) => v,
        Err(e) => {
            return Some(Err(TraceError::MalformedInput {
                location,
                column: json.start() + e.column(),
                message: e.to_string(),
            }))
        }
    };

    Some(Ok(RawEvent {
        timestamp,
        location,
        line: line.to_string(),
        payload,
    }))
}

// -- log source --

/// lazily yields the trace records of one log, in file order
///
/// reads one line at a time; lines that are not trace records are skipped.
pub struct LogSource<R> {
    /// name used in locations, usually the path as given
    name: String,
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> LogSource<R> {
    /// wrap any buffered reader
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            lines: reader.lines(),
            line_number: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl LogSource<BufReader<File>> {
    /// open a log file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LogSource<R> {
    type Item = Result<RawEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.next()?;
            self.line_number += 1;
            let line = match next {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(TraceError::Read {
                        location: format!("{}:{}", self.name, self.line_number),
                        source,
                    }))
                }
            };

            if let Some(parsed) = parse_line(&self.name, self.line_number, &line) {
                return Some(parsed);
            }
        }
    }
}

/// open every log, failing on the first one that cannot be read
pub fn open_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<LogSource<BufReader<File>>>, TraceError> {
    paths
        .iter()
        .map(|p| {
            debug!("opening {}", p.as_ref().display());
            LogSource::open(p).map_err(TraceError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRACE_LINE: &str = r#"2019-07-16T12:24:41.964-0400 I  TLA_PLUS [replexec-0] {"action": "BecomePrimaryByMagic", "host": "localhost:27017"}"#;

    #[test]
    fn parses_timestamp_with_offset() {
        let t = parse_log_timestamp("2019-07-16T12:24:41.964-0400").unwrap();
        assert_eq!(t.to_rfc3339(), "2019-07-16T12:24:41.964-04:00");
    }

    #[test]
    fn matches_trace_line() {
        let raw = parse_line("node1.log", 3, TRACE_LINE).unwrap().unwrap();
        assert_eq!(raw.location, "node1.log:3");
        assert_eq!(raw.payload["action"], "BecomePrimaryByMagic");
        assert_eq!(raw.line, TRACE_LINE);
        assert_eq!(raw.timestamp, parse_log_timestamp("2019-07-16T12:24:41.964-0400").unwrap());
    }

    #[test]
    fn skips_other_lines() {
        let line = "2019-07-16T12:24:41.964-0400 I  REPL     [replexec-0] transition to PRIMARY";
        assert!(parse_line("node1.log", 1, line).is_none());
        assert!(parse_line("node1.log", 1, "").is_none());
    }

    #[test]
    fn bad_json_is_malformed_input() {
        let line = r#"2019-07-16T12:24:41.964-0400 I  TLA_PLUS [replexec-0] {"action": oops}"#;
        let err = parse_line("node2.log", 9, line).unwrap().unwrap_err();
        match err {
            TraceError::MalformedInput { location, column, .. } => {
                assert_eq!(location, "node2.log:9");
                // column counts from the start of the line, not of the json
                assert!(column > line.find('{').unwrap());
                assert!(column <= line.len());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn source_counts_every_line() {
        let text = format!("startup noise\n{TRACE_LINE}\nmore noise\n{TRACE_LINE}\n");
        let source = LogSource::new("n.log", Cursor::new(text));
        assert_eq!(source.name(), "n.log");

        let locations: Vec<String> = source.map(|r| r.unwrap().location).collect();
        assert_eq!(locations, ["n.log:2", "n.log:4"]);
    }

    #[test]
    fn source_stops_at_malformed_record() {
        let text = format!("{TRACE_LINE}\n2019-07-16T12:24:42.000-0400 I  TLA_PLUS [replexec-1] {{\"a\": }}\n");
        let mut source = LogSource::new("n.log", Cursor::new(text));
        assert!(source.next().unwrap().is_ok());
        assert!(matches!(
            source.next().unwrap(),
            Err(TraceError::MalformedInput { .. })
        ));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = open_sources(&["/definitely/not/here.log"]).err().unwrap();
        assert!(matches!(err, TraceError::Io(_)));
    }

    #[test]
    fn unreadable_line_names_its_location() {
        let mut bytes = b"startup noise\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe not utf-8\n");
        let mut source = LogSource::new("n.log", Cursor::new(bytes));

        match source.next().unwrap() {
            Err(TraceError::Read { location, .. }) => assert_eq!(location, "n.log:2"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
