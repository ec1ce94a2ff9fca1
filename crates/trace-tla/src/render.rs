//! # render
//!
//! why: TLC checks the trace by stepping the user's spec through it, one record per step
//! relations: uses tla.rs for values, output written by inputs.rs
//! what: variable name lists, render_spec (Trace.tla), render_config (Trace.cfg)

use std::fmt;
use std::path::Path;

use trace_core::SystemState;

use crate::error::{RenderError, Result};
use crate::tla::ToTla;

/// Variables of the RaftMongo spec that the trace pins down, indexed by server.
pub const RAFT_MONGO_VARIABLES: [&str; 4] = ["globalCurrentTerm", "log", "state", "commitPoint"];

/// Every variable of a trace record, including the diagnostic ones.
pub const ALL_TLA_VARIABLES: [&str; 6] = [
    "globalCurrentTerm",
    "action",
    "log",
    "state",
    "commitPoint",
    "serverLogLocation",
];

/// Variables the Trace module declares itself, on top of RaftMongo's.
const TRACE_ONLY_VARIABLES: [&str; 2] = ["action", "serverLogLocation"];

/// The module name of a spec file: its file stem, which must be a TLA+ identifier.
pub fn module_name(spec_file: &Path) -> Result<String> {
    let stem = spec_file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .ok_or_else(|| RenderError::InvalidModuleName(spec_file.to_path_buf()))?;
    Ok(stem.to_string())
}

fn conjunction(indent: &str, lines: impl IntoIterator<Item = String>) -> String {
    lines
        .into_iter()
        .map(|line| format!("{indent}/\\ {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `Trace` module for a sequence of states, extending `spec_module`.
pub struct TraceModule<'a> {
    pub states: &'a [SystemState],
    pub spec_module: &'a str,
}

impl fmt::Display for TraceModule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n_servers = self.states.first().map_or(0, SystemState::n_servers);
        let records: Vec<String> = self.states.iter().map(|s| format!("    {}", s.to_tla())).collect();
        let indent = "    ";

        let read = conjunction(
            indent,
            ALL_TLA_VARIABLES.iter().map(|v| format!("{v} = rec.{v}")),
        );
        let read_next = conjunction(
            indent,
            ALL_TLA_VARIABLES.iter().map(|v| format!("{v}' = rec.{v}")),
        );

        writeln!(f, "{:-<29} MODULE Trace {:-<29}", "", "")?;
        writeln!(f, "\\* Generated from {} log events.", self.states.len().saturating_sub(1))?;
        writeln!(f, "EXTENDS {}, Sequences, Naturals, TLC", self.spec_module)?;
        writeln!(f)?;
        writeln!(f, "VARIABLES {}, i", TRACE_ONLY_VARIABLES.join(", "))?;
        writeln!(f)?;
        writeln!(f, "TraceServer == 1..{n_servers}")?;
        writeln!(f)?;
        writeln!(f, "raftMongoVars == <<{}>>", RAFT_MONGO_VARIABLES.join(", "))?;
        writeln!(f, "traceVars == <<{}>>", ALL_TLA_VARIABLES.join(", "))?;
        writeln!(f)?;
        writeln!(f, "trace == <<\n{}\n>>", records.join(",\n"))?;
        writeln!(f)?;
        writeln!(f, "Read(rec) ==\n{read}")?;
        writeln!(f)?;
        writeln!(f, "ReadNext(rec) ==\n{read_next}")?;
        writeln!(f)?;
        writeln!(f, "TraceInit ==\n{indent}/\\ i = 1\n{indent}/\\ Read(trace[1])\n{indent}/\\ Init")?;
        writeln!(f)?;
        writeln!(
            f,
            "TraceNext ==\n{indent}/\\ i < Len(trace)\n{indent}/\\ i' = i + 1\n{indent}/\\ ReadNext(trace[i + 1])\n{indent}/\\ Next"
        )?;
        writeln!(f)?;
        writeln!(f, "TraceSpec == TraceInit /\\ [][TraceNext]_<<i, traceVars>>")?;
        writeln!(f)?;
        writeln!(f, "TraceMatched == <>(i = Len(trace))")?;
        writeln!(f, "{:=<77}", "")
    }
}

/// Render the `Trace` module for `states`, extending `spec_module`.
///
/// `states` must hold at least the initial state.
pub fn render_spec(states: &[SystemState], spec_module: &str) -> String {
    TraceModule { states, spec_module }.to_string()
}

/// Render the TLC configuration for the `Trace` module.
pub fn render_config() -> String {
    [
        "SPECIFICATION TraceSpec",
        "CONSTANT Server <- TraceServer",
        "PROPERTY TraceMatched",
        "CHECK_DEADLOCK FALSE",
        "",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn module_name_from_file_stem() {
        assert_eq!(module_name(Path::new("specs/RaftMongo.tla")).unwrap(), "RaftMongo");
        assert!(matches!(
            module_name(Path::new("my spec.tla")),
            Err(RenderError::InvalidModuleName(p)) if p == PathBuf::from("my spec.tla")
        ));
        assert!(module_name(Path::new("")).is_err());
    }

    #[test]
    fn variable_lists() {
        for v in RAFT_MONGO_VARIABLES {
            assert!(ALL_TLA_VARIABLES.contains(&v));
        }
        for v in TRACE_ONLY_VARIABLES {
            assert!(!RAFT_MONGO_VARIABLES.contains(&v));
        }
        assert_eq!(RAFT_MONGO_VARIABLES.len() + TRACE_ONLY_VARIABLES.len(), ALL_TLA_VARIABLES.len());
    }

    #[test]
    fn renders_module() {
        let spec = render_spec(&[SystemState::initial(3)], "RaftMongo");
        assert!(spec.starts_with("----"));
        assert!(spec.contains(" MODULE Trace "));
        assert!(spec.contains("EXTENDS RaftMongo, Sequences, Naturals, TLC"));
        assert!(spec.contains("VARIABLES action, serverLogLocation, i"));
        assert!(spec.contains("TraceServer == 1..3"));
        assert!(spec.contains("action |-> \"Init\""));
        assert!(spec.contains("    /\\ commitPoint' = rec.commitPoint"));
        assert!(spec.contains("\\* Generated from 0 log events."));
        assert!(spec.trim_end().ends_with("===="));
    }

    #[test]
    fn module_displays_like_rendered_spec() {
        let states = [SystemState::initial(1)];
        let module = TraceModule { states: &states, spec_module: "RaftMongo" };
        assert_eq!(module.to_string(), render_spec(&states, "RaftMongo"));
        assert!(module.to_string().ends_with(&format!("{:=<77}\n", "")));
    }

    #[test]
    fn config_names_trace_spec() {
        let cfg = render_config();
        assert!(cfg.starts_with("SPECIFICATION TraceSpec\n"));
        assert!(cfg.contains("CONSTANT Server <- TraceServer"));
    }
}
