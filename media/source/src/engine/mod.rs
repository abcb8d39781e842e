/*!
    Capability contract of the demuxing/probing engine.

    The source layer never touches engine state directly. It drives an
    [`Engine`] through the acquisition stages and queries the opened
    [`Demuxer`]. Every handle type releases its resource when dropped, so the
    order in which handles are dropped is the order in which resources are
    released.
*/

use core::fmt;

use media_types::Error;

use crate::io::IoCallbacks;
use crate::probe::ProbeLimits;

#[cfg(test)]
pub(crate) mod mock;

/**
    Native media type tag as reported by the engine.

    Kept as a raw integer so tags outside the supported set can be detected
    instead of being folded into a catch-all. The associated constants follow
    FFmpeg's `AVMediaType` numbering.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeMediaType(pub i32);

impl NativeMediaType {
    pub const UNKNOWN: Self = Self(-1);
    pub const VIDEO: Self = Self(0);
    pub const AUDIO: Self = Self(1);
    pub const DATA: Self = Self(2);
    pub const SUBTITLE: Self = Self(3);
    pub const ATTACHMENT: Self = Self(4);
}

/**
    Outcome of the engine's best-stream heuristic.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BestStream {
    Found(usize),
    NotFound,
    /// A stream of the requested type exists, but no decoder is registered for it.
    DecoderNotFound,
}

/**
    Failure reported by the engine: its native error code plus a readable message.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for EngineError {}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        Error::Engine {
            code: e.code,
            message: e.message,
        }
    }
}

/**
    The operations a demuxing engine must provide to back a [`Source`](crate::Source).

    Allocation methods return `None` when the engine is out of memory. Methods
    that consume a handle are responsible for releasing it if they fail, with
    the exception of [`alloc_io`](Engine::alloc_io), which hands the buffer
    back so the caller can release it in acquisition order.
*/
pub trait Engine {
    /// Read buffer handed to the I/O context.
    type Buffer;
    /// Allocated, not yet opened, format context.
    type Context;
    /// Engine I/O context bound to a callback pair. Owns its buffer.
    type Io;
    /// Opened format context.
    type Input: Demuxer;

    /**
        Open a name (path or URL) with the engine's own I/O.
    */
    fn open_by_name(&self, name: &str) -> Result<Self::Input, EngineError>;

    fn alloc_buffer(&self, size: usize) -> Option<Self::Buffer>;

    fn alloc_context(&self) -> Option<Self::Context>;

    /**
        Wrap `buffer` and `callbacks` into an I/O context.

        On success the I/O context owns the buffer. On failure the buffer is
        returned untouched and the callbacks are dropped.
    */
    fn alloc_io(
        &self,
        buffer: Self::Buffer,
        callbacks: IoCallbacks,
    ) -> Result<Self::Io, Self::Buffer>;

    /**
        Install `io` as the I/O slot of `context`.

        The context only borrows the I/O context; the caller keeps it alive
        for as long as the opened input exists.
    */
    fn attach_io(&self, context: &mut Self::Context, io: &mut Self::Io);

    /**
        Open a context whose I/O slot was set with [`attach_io`](Engine::attach_io).

        The context is released by the engine if opening fails.
    */
    fn open_with_io(
        &self,
        context: Self::Context,
        placeholder: &str,
    ) -> Result<Self::Input, EngineError>;

    /**
        Apply `limits` and run stream-information discovery.

        May read and seek far ahead in the input.
    */
    fn probe(&self, input: &mut Self::Input, limits: &ProbeLimits) -> Result<(), EngineError>;
}

/**
    Read-only queries over an opened input.
*/
pub trait Demuxer {
    fn stream_count(&self) -> usize;

    /**
        Native media type of the stream at `index`.

        Callers guarantee `index < self.stream_count()`.
    */
    fn stream_type(&self, index: usize) -> NativeMediaType;

    /**
        Rank the streams of `media_type` with no codec preference and no flags.
    */
    fn best_stream(&self, media_type: NativeMediaType) -> Result<BestStream, EngineError>;
}
