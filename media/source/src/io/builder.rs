/*!
    Staged construction of the engine I/O context.
*/

use media_types::{Error, Result};
use tracing::debug;

use super::IoCallbacks;
use crate::engine::Engine;

/// The engine takes the buffer size as a C `int`.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/**
    Two-step construction of an engine I/O context.

    [`allocate`](Self::allocate) acquires the read buffer; the builder owns it
    and releases it when dropped. [`build`](Self::build) moves the buffer into a
    new I/O context. If that fails the builder is handed back intact, so the
    caller decides when the buffer is released relative to its other
    resources.
*/
pub struct IoContextBuilder<'e, E: Engine> {
    engine: &'e E,
    buffer: E::Buffer,
    size: usize,
}

impl<'e, E: Engine> IoContextBuilder<'e, E> {
    pub fn allocate(engine: &'e E, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_argument("I/O buffer size must be non-zero"));
        }
        if size > MAX_BUFFER_SIZE {
            return Err(Error::invalid_argument(format!(
                "I/O buffer size {size} exceeds {MAX_BUFFER_SIZE}"
            )));
        }
        let buffer = engine
            .alloc_buffer(size)
            .ok_or(Error::Allocation("I/O buffer"))?;
        debug!(size, "allocated I/O buffer");
        Ok(Self {
            engine,
            buffer,
            size,
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.size
    }

    pub fn build(self, callbacks: IoCallbacks) -> std::result::Result<E::Io, (Self, Error)> {
        let Self {
            engine,
            buffer,
            size,
        } = self;
        let seekable = callbacks.is_seekable();

        match engine.alloc_io(buffer, callbacks) {
            Ok(io) => {
                debug!(size, seekable, "allocated I/O context");
                Ok(io)
            }
            Err(buffer) => Err((
                Self {
                    engine,
                    buffer,
                    size,
                },
                Error::Allocation("I/O context"),
            )),
        }
    }
}

impl<E: Engine> std::fmt::Debug for IoContextBuilder<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoContextBuilder")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
