/*!
    Shared types for the media source crates.

    This crate defines the vocabulary that crosses crate boundaries: the public
    stream taxonomy and the error type. It has no dependency on a demuxing
    engine, so consumers can depend on it without pulling in FFmpeg bindings.
*/

mod error;
mod stream;

pub use self::error::{Error, ParseError, Result};
pub use self::stream::{StreamInfo, StreamType};
