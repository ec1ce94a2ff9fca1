//! # trace
//!
//! why: fold per-server events into the sequence of whole-system states the model checker walks
//! relations: applies LogEvents through state.rs, driven by pipeline.rs
//! what: TraceBuilder (current-state cursor), Trace (recorded states + terminal state)

use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::event::LogEvent;
use crate::state::SystemState;

/// Accumulates a trace one event at a time.
#[derive(Debug)]
pub struct TraceBuilder {
    states: Vec<SystemState>,
    current: SystemState,
}

impl TraceBuilder {
    /// Start from the initial state of `n_servers` servers.
    pub fn new(n_servers: usize) -> Self {
        Self::from_state(SystemState::initial(n_servers))
    }

    pub fn from_state(initial: SystemState) -> Self {
        Self {
            states: Vec::new(),
            current: initial,
        }
    }

    pub fn current(&self) -> &SystemState {
        &self.current
    }

    /// States recorded so far, not including the current one.
    pub fn states(&self) -> &[SystemState] {
        &self.states
    }

    /// Record the current state, then move to the state `event` produces.
    ///
    /// On error nothing is recorded.
    pub fn push(&mut self, event: &LogEvent) -> Result<(), TraceError> {
        let next = self.current.with_event(event)?;
        let previous = std::mem::replace(&mut self.current, next);
        self.states.push(previous);
        Ok(())
    }

    pub fn finish(self) -> Trace {
        Trace {
            states: self.states,
            terminal: self.current,
        }
    }
}

/// A finished trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Every state before an event was applied, starting with the initial state
    pub states: Vec<SystemState>,
    /// The state produced by the last event
    pub terminal: SystemState,
}

impl Trace {
    /// All states from the initial one through the terminal one.
    pub fn complete(&self) -> Vec<SystemState> {
        let mut all = self.states.clone();
        all.push(self.terminal.clone());
        all
    }

    /// Number of events that went into this trace.
    pub fn n_events(&self) -> usize {
        self.states.len()
    }

    pub fn n_servers(&self) -> usize {
        self.terminal.n_servers()
    }
}
