//! # state
//!
//! why: define the global system snapshot that one trace step checks against the TLA+ spec
//! relations: built by trace.rs from LogEvents, rendered by trace-tla
//! what: ServerState enum, SystemState snapshot with copy-on-write event application

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, TraceError};
use crate::event::LogEvent;
use crate::oplog::{fmt_log, CommitPoint, OplogEntry};
use crate::term::PRE_ELECTION_TERM;

/// The role a server believes it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerState {
    /// Primary in replica set terms
    Leader,
    /// Secondary in replica set terms
    Follower,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::Follower
    }
}

impl ServerState {
    pub fn name(&self) -> &'static str {
        match self {
            ServerState::Leader => "Leader",
            ServerState::Follower => "Follower",
        }
    }
}

impl FromStr for ServerState {
    type Err = EventError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "Leader" | "Primary" => Ok(ServerState::Leader),
            "Follower" | "Secondary" => Ok(ServerState::Follower),
            other => Err(EventError::UnknownRoleLabel(other.to_string())),
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The whole replica set's state at one step of the trace.
///
/// Per-server fields are indexed by server id. Snapshots are never changed
/// after they are built: [`SystemState::with_event`] returns a new one and
/// shares the logs of untouched servers with its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    /// The term reported by the event that produced this state
    pub global_current_term: i64,
    /// The TLA+ action that led to this state
    pub action: String,
    /// One oplog per server
    pub log: Vec<Arc<[OplogEntry]>>,
    /// One role per server
    pub state: Vec<ServerState>,
    /// One commit point per server
    pub commit_point: Vec<CommitPoint>,
    /// `file:line` of the log line that produced this state
    pub server_log_location: String,
}

impl SystemState {
    /// The state before any log line: every server a follower with an empty oplog.
    pub fn initial(n_servers: usize) -> Self {
        let empty: Arc<[OplogEntry]> = Arc::from(Vec::new());
        Self {
            global_current_term: PRE_ELECTION_TERM,
            action: "Init".to_string(),
            log: vec![empty; n_servers],
            state: vec![ServerState::Follower; n_servers],
            commit_point: vec![CommitPoint::new(PRE_ELECTION_TERM, 0); n_servers],
            server_log_location: String::new(),
        }
    }

    pub fn n_servers(&self) -> usize {
        self.state.len()
    }

    /// A copy of this state with `event`'s server replaced.
    pub fn with_event(&self, event: &LogEvent) -> Result<Self, TraceError> {
        let id = event.server_id;
        if id >= self.n_servers() {
            return Err(TraceError::ServerOutOfRange {
                server_id: id,
                n_servers: self.n_servers(),
            });
        }

        let mut log = self.log.clone();
        log[id] = Arc::from(event.log.as_slice());

        let mut state = self.state.clone();
        state[id] = event.state;

        let mut commit_point = self.commit_point.clone();
        commit_point[id] = event.commit_point;

        Ok(Self {
            global_current_term: event.term,
            action: event.action.clone(),
            log,
            state,
            commit_point,
            server_log_location: event.location.clone(),
        })
    }

    /// Length of the longest oplog of any server.
    pub fn max_oplog_len(&self) -> usize {
        self.log.iter().map(|l| l.len()).max().unwrap_or(0)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "globalCurrentTerm={}", self.global_current_term)?;
        for i in 0..self.n_servers() {
            write!(
                f,
                "\nserver {}: state={:>8}, commit point={},",
                i, self.state[i], self.commit_point[i]
            )?;
            if self.log[i].is_empty() {
                write!(f, " log=empty")?;
            } else {
                write!(f, " log={}", fmt_log(&self.log[i]))?;
            }
        }
        Ok(())
    }
}
