//! # payload
//!
//! why: trace records are mongod extended JSON, with wrapped integers and timestamps
//! relations: decoded by translate.rs from RawEvent::payload
//! what: TracePayload and friends, extended JSON helpers

use serde::{de, Deserialize, Deserializer};

use crate::oplog::OplogTimestamp;

/// One `TLA_PLUS` trace record.
///
/// Generic trace fields sit at the top level, the RaftMongo specific ones
/// under `state`.
#[derive(Debug, Clone, Deserialize)]
pub struct TracePayload {
    pub action: String,
    /// `hostname:port`
    pub host: String,
    pub state: RaftMongoPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaftMongoPayload {
    #[serde(deserialize_with = "int64")]
    pub term: i64,
    pub server_state: String,
    pub commit_point: OpTimePayload,
    pub log: Vec<OpTimePayload>,
}

/// An optime: `{ts: Timestamp, t: term}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OpTimePayload {
    #[serde(deserialize_with = "timestamp")]
    pub ts: OplogTimestamp,
    #[serde(deserialize_with = "int64")]
    pub t: i64,
}

impl TracePayload {
    /// The port part of `host`.
    pub fn port(&self) -> Option<u16> {
        let (_, port) = self.host.rsplit_once(':')?;
        port.parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtInt {
    Plain(i64),
    Long {
        #[serde(rename = "$numberLong")]
        value: String,
    },
    Int {
        #[serde(rename = "$numberInt")]
        value: String,
    },
}

/// Accept `5`, `{"$numberLong": "5"}` or `{"$numberInt": "5"}`.
fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match ExtInt::deserialize(deserializer)? {
        ExtInt::Plain(n) => Ok(n),
        ExtInt::Long { value } | ExtInt::Int { value } => value
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer {value:?}"))),
    }
}

#[derive(Deserialize)]
struct TimestampParts {
    t: u32,
    i: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtTimestamp {
    Wrapped {
        #[serde(rename = "$timestamp")]
        parts: TimestampParts,
    },
    /// seconds in the high 32 bits, increment in the low 32 bits
    Packed(u64),
}

/// Accept `{"$timestamp": {"t": secs, "i": inc}}` or a packed 64-bit integer.
fn timestamp<'de, D>(deserializer: D) -> Result<OplogTimestamp, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ExtTimestamp::deserialize(deserializer)? {
        ExtTimestamp::Wrapped { parts } => OplogTimestamp::new(parts.t, parts.i),
        ExtTimestamp::Packed(n) => OplogTimestamp::new((n >> 32) as u32, n as u32),
    })
}
