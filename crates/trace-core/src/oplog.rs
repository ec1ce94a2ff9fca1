//! # oplog
//!
//! why: describe oplog entries and commit points the way the RaftMongo TLA+ spec sees them
//! relations: built by translate.rs, stored per server in state.rs
//! what: OplogTimestamp (mongod's optime key), OplogEntry, CommitPoint

use std::fmt;

use serde::{Deserialize, Serialize};

/// An oplog timestamp as mongod writes it: seconds plus an increment.
///
/// This is the key a commit point uses to reference an oplog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OplogTimestamp {
    pub secs: u32,
    pub inc: u32,
}

impl OplogTimestamp {
    /// The timestamp of the null optime a node reports before it has written anything.
    pub const NULL: OplogTimestamp = OplogTimestamp { secs: 0, inc: 0 };

    pub fn new(secs: u32, inc: u32) -> Self {
        Self { secs, inc }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for OplogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}, {})", self.secs, self.inc)
    }
}

/// A single entry in a server's oplog. Its index is its position in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OplogEntry {
    /// The term when this entry was written
    pub term: i64,
}

impl OplogEntry {
    pub fn new(term: i64) -> Self {
        Self { term }
    }
}

/// A server's view of the commit point, as a position in its own oplog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitPoint {
    pub term: i64,
    pub index: usize,
}

impl CommitPoint {
    pub fn new(term: i64, index: usize) -> Self {
        Self { term, index }
    }
}

impl fmt::Display for CommitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(term={}, index={})", self.term, self.index)
    }
}

/// Format a log as its entry terms, like `[1 1 2]`.
pub(crate) fn fmt_log(log: &[OplogEntry]) -> String {
    let terms: Vec<String> = log.iter().map(|e| e.term.to_string()).collect();
    format!("[{}]", terms.join(" "))
}
