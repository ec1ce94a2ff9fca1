//! # translate
//!
//! why: turn one node's self-reported state into TLA+ spec terms: server id, oplog indexes, normalized terms
//! relations: owns mapper.rs state, decodes payload.rs, produces LogEvents for trace.rs
//! what: Translator

use log::debug;
use serde::Deserialize;

use crate::error::{EventError, TraceError};
use crate::event::{LogEvent, RawEvent};
use crate::mapper::{OplogIndexMapper, PortMapper, ServerId};
use crate::oplog::{CommitPoint, OplogEntry, OplogTimestamp};
use crate::payload::TracePayload;
use crate::state::ServerState;
use crate::term::normalize_term;

/// Translates raw events into [`LogEvent`]s, in merged order.
///
/// Server ids and oplog indexes are handed out as events are translated, so
/// events must be fed in the global merged order for ids to be stable
/// between runs over the same logs.
#[derive(Debug, Default)]
pub struct Translator {
    ports: PortMapper,
    oplog: OplogIndexMapper,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ports(&self) -> &PortMapper {
        &self.ports
    }

    pub fn oplog(&self) -> &OplogIndexMapper {
        &self.oplog
    }

    /// Mutable access to the oplog index mapper, for registering entries up front.
    pub fn oplog_mut(&mut self) -> &mut OplogIndexMapper {
        &mut self.oplog
    }

    /// Translate one raw event. On failure the error carries the untranslated line.
    pub fn translate(&mut self, raw: &RawEvent) -> Result<LogEvent, TraceError> {
        self.translate_payload(raw).map_err(|source| TraceError::Event {
            location: raw.location.clone(),
            line: raw.line.clone(),
            source,
        })
    }

    fn translate_payload(&mut self, raw: &RawEvent) -> Result<LogEvent, EventError> {
        let payload = TracePayload::deserialize(&raw.payload)?;

        let port = payload
            .port()
            .ok_or_else(|| EventError::InvalidHost(payload.host.clone()))?;
        let server_id = self.server_id(port);

        let raft = &payload.state;
        let mut log = Vec::with_capacity(raft.log.len());
        for (index, entry) in raft.log.iter().enumerate() {
            self.oplog.set_index(server_id, entry.ts, index)?;
            log.push(OplogEntry::new(entry.t));
        }

        let commit_point = CommitPoint::new(
            normalize_term(raft.commit_point.t),
            self.oplog.get_index(server_id, raft.commit_point.ts)?,
        );

        let state: ServerState = raft.server_state.parse()?;

        Ok(LogEvent {
            timestamp: raw.timestamp,
            location: raw.location.clone(),
            line: raw.line.clone(),
            action: payload.action,
            server_id,
            term: normalize_term(raft.term),
            state,
            commit_point,
            log,
        })
    }

    /// Resolve a port, seeding the null optime for servers seen for the first time.
    fn server_id(&mut self, port: u16) -> ServerId {
        let known = self.ports.len();
        let server_id = self.ports.get_server_id(port);
        if server_id == known {
            debug!("port {port} is server {server_id}");
            self.oplog.seed(server_id, OplogTimestamp::NULL, 0);
        }
        server_id
    }
}
