//! # trace-core
//!
//! why: rebuild one globally ordered replica set trace from per-node log streams
//! relations: fed by trace-log (raw events), consumed by trace-tla (rendering)
//! what: stream merge, port/oplog index mappers, event translation, state accumulation

pub mod error;
pub mod event;
pub mod mapper;
pub mod merge;
pub mod oplog;
pub mod payload;
pub mod pipeline;
pub mod state;
pub mod term;
pub mod trace;
pub mod translate;

pub use error::{EventError, Result, TraceError};
pub use event::{LogEvent, RawEvent};
pub use mapper::{OplogIndexMapper, PortMapper, ServerId};
pub use merge::{merge_streams, MergedStreams, Timestamped};
pub use oplog::{CommitPoint, OplogEntry, OplogTimestamp};
pub use pipeline::{build_trace, PipelineConfig};
pub use state::{ServerState, SystemState};
pub use term::{normalize_term, INITIAL_TERM, PRE_ELECTION_TERM};
pub use trace::{Trace, TraceBuilder};
pub use translate::Translator;
