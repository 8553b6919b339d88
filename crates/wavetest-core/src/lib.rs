//! # Wavetest Core
//!
//! Registry, case model, and assertion library for the wavetest harness.
//!
//! ## Design Goals
//!
//! 1. **Explicit context**: no ambient globals; every predicate reaches the
//!    running case through a handle the scheduler hands out
//! 2. **Tagged bodies**: sync vs suspendable is resolved once at registration,
//!    never by runtime shape-checking
//! 3. **Single terminal transition**: a case leaves `Running` exactly once and
//!    is immutable to the harness afterwards

mod assert;
mod body;
mod case;
mod config;
mod error;
mod registry;
mod status;

pub use body::TestBody;
pub use case::{CaseHandle, CaseSnapshot, TestCase};
pub use config::RunConfig;
pub use error::HarnessError;
pub use registry::{RegisterOptions, TestRun};
pub use status::{Expectation, TestKind, TestStatus};
