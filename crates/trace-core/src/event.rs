//! # event
//!
//! why: define the records that flow through the pipeline
//! relations: RawEvent comes from trace-log, LogEvent is produced by translate.rs and applied by state.rs
//! what: RawEvent (one matched log line), LogEvent (one server's state change)

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::mapper::ServerId;
use crate::merge::Timestamped;
use crate::oplog::{fmt_log, CommitPoint, OplogEntry};
use crate::state::ServerState;

/// A trace line from one node's log, JSON already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// The server log timestamp
    pub timestamp: DateTime<FixedOffset>,
    /// File name and line number, like `node1.log:123`
    pub location: String,
    /// The text of the log line
    pub line: String,
    /// The decoded JSON object
    pub payload: serde_json::Value,
}

impl Timestamped for RawEvent {
    type Timestamp = DateTime<FixedOffset>;

    fn timestamp(&self) -> &Self::Timestamp {
        &self.timestamp
    }
}

/// One server's state as it logged it, translated into TLA+ spec terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub location: String,
    pub line: String,
    /// The TLA+ action the server is taking
    pub action: String,
    pub server_id: ServerId,
    /// Current term, normalized
    pub term: i64,
    pub state: ServerState,
    pub commit_point: CommitPoint,
    /// The server's whole oplog; an entry's index is its position
    pub log: Vec<OplogEntry>,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.location, self.timestamp.to_rfc3339())?;
        writeln!(
            f,
            "{} server_id={} state={} term={}",
            self.action, self.server_id, self.state, self.term
        )?;
        writeln!(f, "commit point: {}", self.commit_point)?;
        write!(f, "log: {}", fmt_log(&self.log))
    }
}
