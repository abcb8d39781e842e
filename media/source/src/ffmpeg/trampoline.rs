/*!
    C entry points handed to `avio_alloc_context`.

    `opaque` is the `IoCallbacks` owned by the enclosing `Io` handle, which
    outlives the AVIOContext. Panics must not unwind into FFmpeg, so they
    become I/O errors.
*/

use std::ffi::{c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use tracing::error;

use crate::io::{IO_ERROR, IoCallbacks};

pub(super) unsafe extern "C" fn read_packet(
    opaque: *mut c_void,
    buf: *mut u8,
    buf_size: c_int,
) -> c_int {
    if opaque.is_null() || buf.is_null() || buf_size <= 0 {
        return IO_ERROR;
    }
    let callbacks = unsafe { &mut *opaque.cast::<IoCallbacks>() };
    let buf = unsafe { slice::from_raw_parts_mut(buf, buf_size as usize) };

    panic::catch_unwind(AssertUnwindSafe(|| callbacks.read(buf))).unwrap_or_else(|_| {
        error!("read callback panicked");
        IO_ERROR
    })
}

pub(super) unsafe extern "C" fn seek(opaque: *mut c_void, offset: i64, whence: c_int) -> i64 {
    if opaque.is_null() {
        return i64::from(IO_ERROR);
    }
    let callbacks = unsafe { &mut *opaque.cast::<IoCallbacks>() };

    panic::catch_unwind(AssertUnwindSafe(|| callbacks.seek(offset, whence))).unwrap_or_else(|_| {
        error!("seek callback panicked");
        i64::from(IO_ERROR)
    })
}
