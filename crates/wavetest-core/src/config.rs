//! Run configuration.

use std::time::Duration;

/// Configuration for one test run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Budget a suspendable body may spend before it is marked `Timeout`.
    /// Overridable per case at registration.
    pub default_timeout: Duration,
    /// Interval at which the scheduler ticks the animation-frame clock.
    pub frame_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(10),
            frame_interval: Duration::from_millis(16), // ~60 fps
        }
    }
}
