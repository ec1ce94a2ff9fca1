//! repl-trace-checker: check that mongod logs match a TLA+ spec
//!
//! Merges the TLA_PLUS trace lines of every replica set member's log into one
//! trace, then writes a `Trace` module for TLC that steps the given spec
//! through it. Members must run with
//! `logComponentVerbosity: {tlaPlusTrace: 1}`.

mod config;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use trace_core::{build_trace, PipelineConfig, TraceError};
use trace_log::open_sources;
use trace_tla::{module_name, render_config, render_spec, write_atomic, TlcInputs};

use crate::config::{CheckerConfig, Cli};

fn main() {
    let config = CheckerConfig::from(Cli::parse());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .format(|buf, record| writeln!(buf, "{:<8} {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&config) {
        error!("{e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Process exit status for a failed run.
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<TraceError>().map_or(1, TraceError::exit_code)
}

fn run(config: &CheckerConfig) -> Result<()> {
    let work_dir = std::env::current_dir()?;
    check(config, &work_dir)
}

/// Build the trace and write TLC's inputs, into `work_dir` when they are kept.
fn check(config: &CheckerConfig, work_dir: &Path) -> Result<()> {
    if !config.specfile.is_file() {
        bail!("could not open spec file {}", config.specfile.display());
    }
    let module = module_name(&config.specfile)?;

    let sources = open_sources(&config.logfiles)?;
    let trace = build_trace(PipelineConfig::new(config.n_servers()), sources)?;
    info!(
        "Read {} events for {} servers",
        trace.n_events(),
        trace.n_servers()
    );

    if let Some(path) = &config.trace_json {
        let json = serde_json::to_string_pretty(&trace)?;
        write_atomic(path, &json).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote trace to {}", path.display());
    }

    // render everything before touching the filesystem
    let spec = render_spec(&trace.complete(), &module);
    let cfg = render_config();

    let inputs = if config.keep_temp_spec {
        TlcInputs::in_dir(work_dir)
    } else {
        TlcInputs::create(false)?
    };
    println!("Generating {}", inputs.spec_path().display());
    inputs.write_spec(&spec)?;
    inputs.write_config(&cfg)?;

    if let Some(copied) = inputs.copy_spec_file(&config.specfile)? {
        if config.keep_temp_spec {
            println!("Copied {} to {}", config.specfile.display(), copied.display());
        }
    }

    // TODO: run TLC on `inputs` before the temporary directory is dropped
    Ok(())
}
