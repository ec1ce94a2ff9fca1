//! # pipeline
//!
//! why: drive merge -> translate -> accumulate one event at a time, stopping at the first error
//! relations: used by the repl-trace-checker binary with trace-log sources
//! what: PipelineConfig, build_trace

use log::{debug, info};

use crate::error::TraceError;
use crate::event::RawEvent;
use crate::merge::merge_streams;
use crate::trace::{Trace, TraceBuilder};
use crate::translate::Translator;

/// Settings for one trace reconstruction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of servers, one per log source
    pub n_servers: usize,
}

impl PipelineConfig {
    pub fn new(n_servers: usize) -> Self {
        Self { n_servers }
    }
}

/// Build a trace from per-server event streams, each sorted by timestamp.
pub fn build_trace<I>(config: PipelineConfig, sources: Vec<I>) -> Result<Trace, TraceError>
where
    I: Iterator<Item = Result<RawEvent, TraceError>>,
{
    let mut translator = Translator::new();
    let mut builder = TraceBuilder::new(config.n_servers);

    for (i, raw) in merge_streams(sources).enumerate() {
        let raw = raw?;
        let event = translator.translate(&raw)?;

        let label = if i == 0 { "Initial" } else { "Current" };
        debug!("{label} state:\n{}", builder.current());
        info!("Log line #{}:\n{}", i + 1, event);

        builder.push(&event)?;
    }

    info!("Final state:\n{}", builder.current());
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn raw(at: &str, port: u16, action: &str) -> Result<RawEvent, TraceError> {
        Ok(RawEvent {
            timestamp: DateTime::parse_from_rfc3339(at).unwrap(),
            location: format!("{port}.log:1"),
            line: String::new(),
            payload: json!({
                "action": action,
                "host": format!("localhost:{port}"),
                "state": {
                    "term": 1,
                    "serverState": "Follower",
                    "commitPoint": {"ts": {"$timestamp": {"t": 0, "i": 0}}, "t": -1},
                    "log": []
                }
            }),
        })
    }

    #[test]
    fn builds_trace_in_timestamp_order() {
        let a = vec![
            raw("2019-07-16T12:00:01.000+00:00", 27017, "A1"),
            raw("2019-07-16T12:00:03.000+00:00", 27017, "A3"),
        ];
        let b = vec![raw("2019-07-16T12:00:02.000+00:00", 27018, "B2")];

        let trace = build_trace(PipelineConfig::new(2), vec![a.into_iter(), b.into_iter()]).unwrap();
        let actions: Vec<_> = trace.complete().into_iter().map(|s| s.action).collect();
        assert_eq!(actions, ["Init", "A1", "B2", "A3"]);
    }

    #[test]
    fn source_error_aborts() {
        let a = vec![
            raw("2019-07-16T12:00:01.000+00:00", 27017, "A1"),
            Err(TraceError::MalformedInput {
                location: "a.log:2".into(),
                column: 1,
                message: "bad".into(),
            }),
        ];
        let err = build_trace(PipelineConfig::new(1), vec![a.into_iter()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_many_ports_aborts() {
        let a = vec![
            raw("2019-07-16T12:00:01.000+00:00", 27017, "A1"),
            raw("2019-07-16T12:00:02.000+00:00", 27018, "A2"),
        ];
        let err = build_trace(PipelineConfig::new(1), vec![a.into_iter()]).unwrap_err();
        assert!(matches!(err, TraceError::ServerOutOfRange { server_id: 1, n_servers: 1 }));
    }
}
