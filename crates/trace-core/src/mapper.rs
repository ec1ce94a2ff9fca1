//! # mapper
//!
//! why: logs address servers by port and oplog entries by timestamp, TLA+ uses small integers for both
//! relations: owned by translate.rs, driven strictly in merged order
//! what: PortMapper (port -> server id), OplogIndexMapper ((server, timestamp) -> index)

use std::collections::HashMap;

use crate::error::EventError;
use crate::oplog::OplogTimestamp;

/// Dense, 0-based server identifier.
pub type ServerId = usize;

/// Maps ports to server ids in order of first appearance.
#[derive(Debug, Default)]
pub struct PortMapper {
    port_to_server: HashMap<u16, ServerId>,
    next_server_id: ServerId,
}

impl PortMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `port`, allocating the next unused one on first sight.
    pub fn get_server_id(&mut self, port: u16) -> ServerId {
        let next = &mut self.next_server_id;
        *self.port_to_server.entry(port).or_insert_with(|| {
            let id = *next;
            *next += 1;
            id
        })
    }

    /// Number of distinct ports seen so far.
    pub fn len(&self) -> usize {
        self.next_server_id
    }

    pub fn is_empty(&self) -> bool {
        self.next_server_id == 0
    }
}

/// One server's timestamp -> index table.
#[derive(Debug, Default)]
struct ServerOplogIndex {
    index_of: HashMap<OplogTimestamp, usize>,
    /// count of entries registered through `set_index`, i.e. the next sequential index
    assigned: usize,
}

/// Maps each server's oplog timestamps to sequential oplog indexes.
///
/// Every server has its own index space: equal timestamps on two servers
/// never share an entry. An index, once assigned, never changes.
#[derive(Debug, Default)]
pub struct OplogIndexMapper {
    servers: HashMap<ServerId, ServerOplogIndex>,
}

impl OplogIndexMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `timestamp` sits at `index` in `server_id`'s oplog.
    ///
    /// Re-recording a known timestamp at the same index is a no-op. A known
    /// timestamp at a different index, or a new timestamp anywhere but the
    /// next sequential index, means the oplog is not append-only.
    pub fn set_index(
        &mut self,
        server_id: ServerId,
        timestamp: OplogTimestamp,
        index: usize,
    ) -> Result<(), EventError> {
        let server = self.servers.entry(server_id).or_default();

        if let Some(&known) = server.index_of.get(&timestamp) {
            if known == index {
                // a seeded entry takes its sequential slot once a real log lists it
                if index == server.assigned {
                    server.assigned += 1;
                }
                return Ok(());
            }
            return Err(EventError::NonMonotonicLog {
                server_id,
                timestamp,
                expected: known,
                found: index,
            });
        }

        if index != server.assigned {
            return Err(EventError::NonMonotonicLog {
                server_id,
                timestamp,
                expected: server.assigned,
                found: index,
            });
        }

        server.index_of.insert(timestamp, index);
        server.assigned += 1;
        Ok(())
    }

    /// Record a mapping ahead of any log that lists it.
    ///
    /// Used for the null optime, which a node may report as its commit point
    /// before its oplog holds anything, and for an entry known to exist before
    /// tracing started. The seeded index is not counted until `set_index`
    /// meets the timestamp at that index. Existing mappings are left untouched.
    pub fn seed(&mut self, server_id: ServerId, timestamp: OplogTimestamp, index: usize) {
        self.servers
            .entry(server_id)
            .or_default()
            .index_of
            .entry(timestamp)
            .or_insert(index);
    }

    /// Look up the index of a previously registered timestamp.
    pub fn get_index(
        &self,
        server_id: ServerId,
        timestamp: OplogTimestamp,
    ) -> Result<usize, EventError> {
        self.servers
            .get(&server_id)
            .and_then(|server| server.index_of.get(&timestamp))
            .copied()
            .ok_or(EventError::UnknownOplogReference {
                server_id,
                timestamp,
            })
    }

    /// Number of sequentially registered entries for `server_id`.
    pub fn len(&self, server_id: ServerId) -> usize {
        self.servers.get(&server_id).map_or(0, |s| s.assigned)
    }
}
