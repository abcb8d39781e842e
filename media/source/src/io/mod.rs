/*!
    Pull-based I/O bridged into the engine.

    Callbacks follow the engine's calling convention: a read returns the
    number of bytes written into the buffer or a negative code, a seek takes a
    raw `whence` value that may carry the [`SEEK_SIZE`] and [`SEEK_FORCE`] bits.
    The values below match FFmpeg's `SEEK_*`, `AVSEEK_*` and `AVERROR_EOF`.
*/

use std::io::{self, Read, Seek, SeekFrom};

mod adapter;
mod builder;
mod callbacks;

pub use self::adapter::{read_packet, seek};
pub use self::builder::{IoContextBuilder, MAX_BUFFER_SIZE};
pub use self::callbacks::{Callbacks, IoCallbacks, ReadCallback, SeekCallback};

/// Seek relative to the start of the stream.
pub const SEEK_SET: i32 = 0;
/// Seek relative to the current position.
pub const SEEK_CUR: i32 = 1;
/// Seek relative to the end of the stream.
pub const SEEK_END: i32 = 2;
/// Return the total stream size instead of seeking.
pub const SEEK_SIZE: i32 = 0x10000;
/// Engine hint to seek even when it would be expensive. Passed through.
pub const SEEK_FORCE: i32 = 0x20000;

/// End of input. Distinct from a zero-length read.
pub const EOF: i32 = -0x2046_4F45;
/// Generic I/O failure, used when the handle gives no OS error code.
pub const IO_ERROR: i32 = -5;

/**
    Default size of the read buffer handed to the engine's I/O context.
*/
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/**
    A readable, seekable byte stream.

    Implemented for every `Read + Seek`. `tell` defaults to a zero-length
    relative seek; handles that cannot report a position return an error.
*/
pub trait ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    fn tell(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::Current(0))
    }
}

impl<T: Read + Seek> ByteStream for T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }
}

/**
    Engine error code for a failed handle operation.
*/
pub(crate) fn error_code(e: &io::Error) -> i32 {
    match e.raw_os_error() {
        Some(errno) if errno > 0 => -errno,
        _ => IO_ERROR,
    }
}
