//! Test support utilities for wavetest integration tests
//!
//! - Document: in-process stand-in for the host under test
//! - init_tracing: opt-in log output via WAVETEST_LOG

#![allow(dead_code)]

mod document;

pub use document::{Document, Element};

/// Install a tracing subscriber once, honoring the `WAVETEST_LOG` filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("WAVETEST_LOG"))
        .with_test_writer()
        .try_init();
}
