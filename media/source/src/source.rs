/*!
    Media source implementation.
*/

use tracing::debug;

use crate::engine::{Demuxer, Engine};

/**
    An opened and probed media input.

    Created by [`Source::from_name`], [`Source::from_callbacks`] or
    [`Source::from_stream`] (or the `open*` shortcuts). A `Source` only exists
    once the input has been opened and probed; failed construction never
    leaves one behind. Stream queries live in the catalog methods
    ([`stream_count`](Source::stream_count), [`stream_info`](Source::stream_info),
    [`best_stream`](Source::best_stream)).

    Dropping the source, or calling [`close`](Source::close), releases the
    format context and then the I/O context with its read buffer.
*/
pub struct Source<E: Engine> {
    // Field order is release order: the input reads through `io`.
    input: E::Input,
    /// Present only for callback and stream origins.
    io: Option<E::Io>,
}

impl<E: Engine> Source<E> {
    pub(crate) fn new(input: E::Input, io: Option<E::Io>) -> Self {
        Self { input, io }
    }

    pub(crate) fn input(&self) -> &E::Input {
        &self.input
    }

    /**
        Returns true if the source reads through caller-supplied I/O
        (callbacks or a byte stream) rather than the engine's own.
    */
    pub fn has_custom_io(&self) -> bool {
        self.io.is_some()
    }

    /**
        Close the source, releasing every engine resource it owns.

        Equivalent to dropping it.
    */
    pub fn close(self) {
        drop(self);
    }
}

impl<E: Engine> Drop for Source<E> {
    fn drop(&mut self) {
        debug!(
            streams = self.input.stream_count(),
            custom_io = self.io.is_some(),
            "closing source"
        );
    }
}

impl<E: Engine> std::fmt::Debug for Source<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("streams", &self.input.stream_count())
            .field("custom_io", &self.has_custom_io())
            .finish_non_exhaustive()
    }
}
