/*!
    Media source abstraction over a demuxing and probing engine.

    A [`Source`] is opened from one of three origins: a name the engine resolves
    itself (file path or URL), a pair of read/seek callbacks, or any
    [`ByteStream`]. Opening acquires the engine resources in stages, probes the
    input for its streams, and either returns a fully probed source or releases
    every stage it had acquired. The opened source then answers read-only
    queries about its stream table in the public [`StreamType`] taxonomy.

    # Example

    ```ignore
    let source = media_source::open("movie.mkv")?;
    for info in source.streams() {
        println!("{}", info?);
    }
    if let Some(index) = source.best_stream(StreamType::Audio)? {
        println!("best audio stream: {index}");
    }
    source.close();
    ```
*/

mod catalog;
mod config;
mod convert;
mod last_error;
mod open;
mod probe;
mod source;

pub mod engine;
pub mod io;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

pub use media_types::{Error, Result, StreamInfo, StreamType};

pub use self::config::SourceConfig;
pub use self::io::{ByteStream, Callbacks};
pub use self::last_error::{clear_last_error, last_error};
pub use self::probe::ProbeLimits;
pub use self::source::Source;

#[cfg(feature = "ffmpeg")]
pub use self::open::{open, open_callbacks, open_stream};
