/*!
    Source configuration.
*/

use serde::{Deserialize, Serialize};

use crate::io::DEFAULT_BUFFER_SIZE;
use crate::probe::ProbeLimits;

/**
    Configuration for opening a source.

    Missing fields deserialize to their defaults, so this can be embedded in a
    larger application config.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Size of the read buffer for callback and stream origins.
    pub io_buffer_size: usize,
    /// Limits applied before stream-information discovery.
    pub probe: ProbeLimits,
}

impl SourceConfig {
    pub fn io_buffer_size(mut self, size: usize) -> Self {
        self.io_buffer_size = size;
        self
    }

    pub fn probe_size(mut self, bytes: i64) -> Self {
        self.probe.probe_size = bytes;
        self
    }

    pub fn analyze_duration(mut self, micros: i64) -> Self {
        self.probe.analyze_duration = micros;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            io_buffer_size: DEFAULT_BUFFER_SIZE,
            probe: ProbeLimits::default(),
        }
    }
}
