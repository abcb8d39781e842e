/*!
    Translation of [`ByteStream`] operations into engine callback semantics.
*/

use std::io::{ErrorKind, SeekFrom};

use tracing::trace;

use super::{ByteStream, EOF, IO_ERROR, SEEK_CUR, SEEK_END, SEEK_FORCE, SEEK_SIZE, error_code};

/**
    Read up to `buf.len()` bytes from `stream`.

    Returns the number of bytes read. A zero-length read means the handle is
    exhausted and is reported as [`EOF`], never as `0`. Read failures are
    reported as negative error codes.
*/
pub fn read_packet<S: ByteStream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> i32 {
    // The engine never asks for more than `i32::MAX` bytes.
    let len = buf.len().min(i32::MAX as usize);
    loop {
        match stream.read(&mut buf[..len]) {
            Ok(0) => {
                trace!("byte stream exhausted");
                return EOF;
            }
            Ok(n) => return n as i32,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                trace!(error = %e, "byte stream read failed");
                return error_code(&e);
            }
        }
    }
}

/**
    Seek `stream` as requested by the engine.

    If `whence` carries [`SEEK_SIZE`] the total stream length is returned and
    the position is left unchanged. Otherwise [`SEEK_FORCE`] is stripped, the
    remaining value picks the origin, and the resulting position (or negative
    error code) is returned.
*/
pub fn seek<S: ByteStream + ?Sized>(stream: &mut S, offset: i64, whence: i32) -> i64 {
    if whence & SEEK_SIZE != 0 {
        return stream_size(stream);
    }

    let pos = match whence & !SEEK_FORCE {
        SEEK_CUR => SeekFrom::Current(offset),
        SEEK_END => SeekFrom::End(offset),
        // SEEK_SET, and anything the engine should never send
        _ => match u64::try_from(offset) {
            Ok(offset) => SeekFrom::Start(offset),
            Err(_) => return i64::from(IO_ERROR),
        },
    };

    match stream.seek(pos) {
        Ok(position) => position as i64,
        Err(e) => {
            trace!(error = %e, ?pos, "byte stream seek failed");
            i64::from(error_code(&e))
        }
    }
}

/**
    Total length via tell, seek to end, tell, seek back.

    Handles that cannot report their position are treated as unsized and get
    `-1` without being moved.
*/
fn stream_size<S: ByteStream + ?Sized>(stream: &mut S) -> i64 {
    let Ok(current) = stream.tell() else {
        return -1;
    };
    if stream.seek(SeekFrom::End(0)).is_err() {
        return -1;
    }
    let size = stream.tell().map_or(-1, |end| end as i64);
    if let Err(e) = stream.seek(SeekFrom::Start(current)) {
        trace!(error = %e, current, "failed to restore position after size query");
    }
    size
}
