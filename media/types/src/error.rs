use thiserror::Error;

use crate::StreamType;

/**
    Errors reported by source construction and stream queries.

    Failed constructors have already released everything they acquired by the
    time one of these is returned.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A buffer or engine context could not be allocated.
    #[error("unable to allocate {0}")]
    Allocation(&'static str),

    /// The engine rejected the input (bad format, unreachable resource).
    #[error("unable to open source: {0}")]
    Open(String),

    /// The input opened but its streams could not be determined.
    #[error("unable to fetch source information: {0}")]
    Probe(String),

    /// A caller-supplied argument is out of range or missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine reported a media type outside the supported set.
    #[error("unknown native stream type {0}")]
    UnknownStreamType(i32),

    /// A matching stream exists but nothing can decode it.
    #[error("unable to find a decoder for the best {0} stream")]
    DecoderUnavailable(StreamType),

    /// Any other failure code surfaced by the engine.
    #[error("engine error {code}: {message}")]
    Engine { code: i32, message: String },
}

impl Error {
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open(message.into())
    }

    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn engine(code: i32, message: impl Into<String>) -> Self {
        Self::Engine {
            code,
            message: message.into(),
        }
    }
}

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

/**
    Type alias for results that may return an [`Error`].
*/
pub type Result<T> = std::result::Result<T, Error>;
