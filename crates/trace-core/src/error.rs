//! # error
//!
//! why: every failure while rebuilding a trace is fatal, so errors must carry enough context to diagnose
//! relations: returned by translate.rs, trace.rs, pipeline.rs; produced by trace-log for bad input
//! what: EventError (one record is inconsistent), TraceError (the run is aborted)

use thiserror::Error;

use crate::mapper::ServerId;
use crate::oplog::OplogTimestamp;

/// A single trace record could not be turned into a [`LogEvent`](crate::LogEvent).
#[derive(Debug, Error)]
pub enum EventError {
    /// The commit point names an oplog entry this server never logged.
    #[error("server {server_id} commit point references unknown oplog entry {timestamp}")]
    UnknownOplogReference {
        server_id: ServerId,
        timestamp: OplogTimestamp,
    },

    /// The server's oplog moved an entry, or grew somewhere other than its end.
    #[error(
        "server {server_id} oplog is not append-only: entry {timestamp} at index {found}, expected index {expected}"
    )]
    NonMonotonicLog {
        server_id: ServerId,
        timestamp: OplogTimestamp,
        expected: usize,
        found: usize,
    },

    #[error("unknown server state {0:?}")]
    UnknownRoleLabel(String),

    #[error("invalid trace payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("cannot read port from host {0:?}")]
    InvalidHost(String),
}

/// Errors that abort building a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line looks like a trace record but its payload does not decode.
    #[error("invalid trace record in {location}, column {column}: {message}")]
    MalformedInput {
        location: String,
        column: usize,
        message: String,
    },

    /// Translating one record failed; `line` is the untranslated log line.
    #[error("cannot translate record at {location}: {source}\n{line}")]
    Event {
        location: String,
        line: String,
        #[source]
        source: EventError,
    },

    /// A log could not be read past `location`.
    #[error("cannot read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server id {server_id} out of range for {n_servers} servers")]
    ServerOutOfRange {
        server_id: ServerId,
        n_servers: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            TraceError::MalformedInput { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_exits_with_two() {
        let err = TraceError::MalformedInput {
            location: "node1.log:12".into(),
            column: 7,
            message: "expected value".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("node1.log:12"));
    }

    #[test]
    fn consistency_errors_exit_with_one() {
        let err = TraceError::Event {
            location: "node2.log:3".into(),
            line: "{}".into(),
            source: EventError::UnknownRoleLabel("Arbiter".into()),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Arbiter"));
    }

    #[test]
    fn read_errors_name_the_line() {
        let err = TraceError::Read {
            location: "node3.log:41".into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("cannot read node3.log:41"));
    }
}
