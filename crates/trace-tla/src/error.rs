//! # error
//!
//! why: rendering fails only on a spec file that cannot name a TLA+ module, or on i/o
//! relations: returned by render.rs, wrapped by the repl-trace-checker binary
//! what: RenderError and its Result alias

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The TLA+ spec file name cannot be used as a TLA+ module name.
    #[error("cannot derive a TLA+ module name from {0}")]
    InvalidModuleName(PathBuf),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
