/*!
    Construction of sources from the three supported origins.

    Each origin acquires its resources in stages. A stage is only attempted
    once the previous one succeeded, and a failing stage releases exactly the
    resources acquired before it, most recent first, before the error is
    returned.
*/

use tracing::debug;

use media_types::{Error, Result};

use crate::config::SourceConfig;
use crate::engine::{Demuxer, Engine};
use crate::io::{ByteStream, Callbacks, IoContextBuilder};
use crate::last_error::Record;
use crate::probe;
use crate::source::Source;

/// Name given to the engine when it reads through custom I/O.
const CUSTOM_IO_PLACEHOLDER: &str = "";

impl<E: Engine> Source<E> {
    /**
        Open a path or URL with the engine's own I/O.

        No I/O context is allocated for this origin.
    */
    pub fn from_name(engine: &E, name: &str, config: &SourceConfig) -> Result<Self> {
        open_name(engine, name, config).record("open source by name")
    }

    /**
        Open a source that reads through caller-supplied callbacks.

        Fails with [`Error::InvalidArgument`] before allocating anything if
        `callbacks` has no read callback.
    */
    pub fn from_callbacks(engine: &E, callbacks: Callbacks, config: &SourceConfig) -> Result<Self> {
        open_custom(engine, callbacks, config).record("open source from callbacks")
    }

    /**
        Open a source that reads from a byte stream.

        The stream is owned by the source and dropped with it.
    */
    pub fn from_stream<S: ByteStream + 'static>(
        engine: &E,
        stream: S,
        config: &SourceConfig,
    ) -> Result<Self> {
        open_custom(engine, Callbacks::from_stream(stream), config)
            .record("open source from stream")
    }
}

fn open_name<E: Engine>(engine: &E, name: &str, config: &SourceConfig) -> Result<Source<E>> {
    config.probe.validate()?;

    let mut input = engine
        .open_by_name(name)
        .map_err(|e| Error::open(format!("'{name}': {e}")))?;

    // May seek forwards; `input` is closed if this fails.
    probe::scan(engine, &mut input, &config.probe)?;

    debug!(name, streams = input.stream_count(), "opened source");
    Ok(Source::new(input, None))
}

fn open_custom<E: Engine>(
    engine: &E,
    callbacks: Callbacks,
    config: &SourceConfig,
) -> Result<Source<E>> {
    let callbacks = callbacks.into_io()?;
    config.probe.validate()?;

    let builder = IoContextBuilder::allocate(engine, config.io_buffer_size)?;

    let mut context = engine
        .alloc_context()
        .ok_or(Error::Allocation("format context"))?;

    let mut io = match builder.build(callbacks) {
        Ok(io) => io,
        Err((builder, e)) => {
            drop(context);
            drop(builder);
            return Err(e);
        }
    };

    engine.attach_io(&mut context, &mut io);

    // The engine releases `context` if opening fails; `io` is dropped after it.
    let mut input = engine
        .open_with_io(context, CUSTOM_IO_PLACEHOLDER)
        .map_err(|e| Error::open(format!("custom source: {e}")))?;

    // `input` is declared after `io`, so it is closed first if probing fails.
    probe::scan(engine, &mut input, &config.probe)?;

    debug!(
        buffer_size = config.io_buffer_size,
        streams = input.stream_count(),
        "opened custom source"
    );
    Ok(Source::new(input, Some(io)))
}

/**
    Open a path or URL with FFmpeg and the default configuration.

    Shortcut for [`Source::from_name`] with [`Ffmpeg`](crate::ffmpeg::Ffmpeg).
*/
#[cfg(feature = "ffmpeg")]
pub fn open(name: &str) -> Result<Source<crate::ffmpeg::Ffmpeg>> {
    let engine = crate::ffmpeg::Ffmpeg::new().record("initialize engine")?;
    Source::from_name(&engine, name, &SourceConfig::default())
}

/**
    Open caller-supplied callbacks with FFmpeg and the default configuration.
*/
#[cfg(feature = "ffmpeg")]
pub fn open_callbacks(callbacks: Callbacks) -> Result<Source<crate::ffmpeg::Ffmpeg>> {
    let engine = crate::ffmpeg::Ffmpeg::new().record("initialize engine")?;
    Source::from_callbacks(&engine, callbacks, &SourceConfig::default())
}

/**
    Open a byte stream with FFmpeg and the default configuration.

    ```ignore
    let source = media_source::open_stream(std::fs::File::open("movie.mkv")?)?;
    ```
*/
#[cfg(feature = "ffmpeg")]
pub fn open_stream<S: ByteStream + 'static>(stream: S) -> Result<Source<crate::ffmpeg::Ffmpeg>> {
    let engine = crate::ffmpeg::Ffmpeg::new().record("initialize engine")?;
    Source::from_stream(&engine, stream, &SourceConfig::default())
}
