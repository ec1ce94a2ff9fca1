//! # tla
//!
//! why: the trace is embedded in the generated module as TLA+ values
//! relations: used by render.rs
//! what: ToTla trait and impls for trace-core types

use std::sync::Arc;

use trace_core::{CommitPoint, OplogEntry, ServerState, SystemState};

/// Convert a value to a TLA+ expression.
pub trait ToTla {
    fn to_tla(&self) -> String;
}

impl ToTla for bool {
    fn to_tla(&self) -> String {
        let text = if *self { "TRUE" } else { "FALSE" };
        text.to_string()
    }
}

impl ToTla for i64 {
    fn to_tla(&self) -> String {
        self.to_string()
    }
}

impl ToTla for usize {
    fn to_tla(&self) -> String {
        self.to_string()
    }
}

impl ToTla for str {
    fn to_tla(&self) -> String {
        format!("\"{}\"", self.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl ToTla for String {
    fn to_tla(&self) -> String {
        self.as_str().to_tla()
    }
}

impl<T: ToTla> ToTla for [T] {
    fn to_tla(&self) -> String {
        let items: Vec<String> = self.iter().map(ToTla::to_tla).collect();
        format!("<<{}>>", items.join(", "))
    }
}

impl<T: ToTla> ToTla for Vec<T> {
    fn to_tla(&self) -> String {
        self.as_slice().to_tla()
    }
}

impl<T: ToTla + ?Sized> ToTla for Arc<T> {
    fn to_tla(&self) -> String {
        (**self).to_tla()
    }
}

/// A record like `[term |-> 1, index |-> 2]`.
pub fn record(fields: &[(&str, String)]) -> String {
    let fields: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{name} |-> {value}"))
        .collect();
    format!("[{}]", fields.join(", "))
}

impl ToTla for OplogEntry {
    fn to_tla(&self) -> String {
        record(&[("term", self.term.to_tla())])
    }
}

impl ToTla for CommitPoint {
    fn to_tla(&self) -> String {
        record(&[("term", self.term.to_tla()), ("index", self.index.to_tla())])
    }
}

impl ToTla for ServerState {
    fn to_tla(&self) -> String {
        self.name().to_tla()
    }
}

/// A record over every trace variable, in [`ALL_TLA_VARIABLES`](crate::ALL_TLA_VARIABLES) order.
impl ToTla for SystemState {
    fn to_tla(&self) -> String {
        record(&[
            ("globalCurrentTerm", self.global_current_term.to_tla()),
            ("action", self.action.to_tla()),
            ("log", self.log.to_tla()),
            ("state", self.state.to_tla()),
            ("commitPoint", self.commit_point.to_tla()),
            ("serverLogLocation", self.server_log_location.to_tla()),
        ])
    }
}
