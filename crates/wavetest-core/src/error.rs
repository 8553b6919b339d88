//! Registration-time structural errors.
//!
//! The only error class that aborts early. Everything that happens inside a
//! running body (assertion mismatches, panics, timeouts) is recorded on the
//! case and never propagates past it.

use thiserror::Error;

/// Errors that can occur while setting up a run.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Duplicate test name: {name}")]
    DuplicateName { name: String },

    #[error("Harness setup error: {0}")]
    Setup(String),
}
