/*!
    Stream-information discovery on an opened input.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use media_types::{Error, Result};

use crate::engine::Engine;

/**
    How much input the engine may scan before declaring stream information known.

    The defaults lift both limits to the engine's integer ceiling so inputs
    with late-appearing tracks or sloppy muxing are classified correctly, at
    the cost of startup latency. Callers that need bounded latency should
    lower them or bound the input itself.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeLimits {
    /// Maximum number of bytes read while probing.
    pub probe_size: i64,
    /// Maximum stream duration analyzed, in microseconds.
    pub analyze_duration: i64,
}

impl ProbeLimits {
    /// Largest value the engine accepts for either limit.
    pub const MAX: i64 = i32::MAX as i64;

    pub const UNBOUNDED: Self = Self {
        probe_size: Self::MAX,
        analyze_duration: Self::MAX,
    };

    pub const fn is_unbounded(&self) -> bool {
        self.probe_size >= Self::MAX && self.analyze_duration >= Self::MAX
    }

    /**
        Reject limits the engine cannot honor. Both must be positive.
    */
    pub fn validate(&self) -> Result<()> {
        if self.probe_size <= 0 {
            return Err(Error::invalid_argument(format!(
                "probe size must be positive, got {}",
                self.probe_size
            )));
        }
        if self.analyze_duration <= 0 {
            return Err(Error::invalid_argument(format!(
                "analyze duration must be positive, got {}",
                self.analyze_duration
            )));
        }
        Ok(())
    }
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/**
    Probe `input` for its streams.

    Failure is not retried here; the caller decides whether to try again with
    other input or other limits.
*/
pub(crate) fn scan<E: Engine>(
    engine: &E,
    input: &mut E::Input,
    limits: &ProbeLimits,
) -> Result<()> {
    debug!(
        probe_size = limits.probe_size,
        analyze_duration = limits.analyze_duration,
        "probing source"
    );
    engine
        .probe(input, limits)
        .map_err(|e| Error::probe(e.to_string()))
}
