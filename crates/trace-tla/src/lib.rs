//! # trace-tla
//!
//! why: hand a reconstructed trace to TLC as a TLA+ module it can check against the user's spec
//! relations: renders trace-core traces, used by the repl-trace-checker binary
//! what: ToTla conversion, Trace.tla/Trace.cfg rendering, TlcInputs directory

pub mod error;
pub mod inputs;
pub mod render;
pub mod tla;

pub use error::{RenderError, Result};
pub use inputs::{write_atomic, TlcInputs};
pub use render::{
    module_name, render_config, render_spec, TraceModule, ALL_TLA_VARIABLES, RAFT_MONGO_VARIABLES,
};
pub use tla::{record, ToTla};
