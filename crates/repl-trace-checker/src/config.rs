//! # config
//!
//! why: one place turns command line arguments into the settings a run needs
//! relations: parsed in main.rs, drives logging setup and the checker run
//! what: Cli (clap arguments), CheckerConfig

use std::path::PathBuf;

use clap::Parser;

/// Check that mongod logs match a TLA+ spec
#[derive(Debug, Parser)]
#[command(name = "repl-trace-checker", version, about)]
pub struct Cli {
    /// One or more mongod log files, one per replica set member
    #[arg(required = true, num_args = 1..)]
    pub logfile: Vec<PathBuf>,

    /// TLA+ spec to check against
    pub specfile: PathBuf,

    /// Save generated spec in the working directory, as "Trace.tla"
    #[arg(long)]
    pub keep_temp_spec: bool,

    /// Also write the reconstructed trace as JSON
    #[arg(long, value_name = "PATH")]
    pub trace_json: Option<PathBuf>,

    /// Log every state, not just every event
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings for one checker run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub logfiles: Vec<PathBuf>,
    pub specfile: PathBuf,
    pub keep_temp_spec: bool,
    pub trace_json: Option<PathBuf>,
    pub verbose: bool,
}

impl CheckerConfig {
    /// One server per log file.
    pub fn n_servers(&self) -> usize {
        self.logfiles.len()
    }

    /// Default log filter when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

impl From<Cli> for CheckerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            logfiles: cli.logfile,
            specfile: cli.specfile,
            keep_temp_spec: cli.keep_temp_spec,
            trace_json: cli.trace_json,
            verbose: cli.verbose,
        }
    }
}
