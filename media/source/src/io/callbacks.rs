/*!
    Caller-supplied read/seek callbacks and their validated form.
*/

use std::cell::RefCell;
use std::rc::Rc;

use media_types::{Error, Result};

use super::{ByteStream, adapter};

/// Fill the buffer, returning the byte count, [`EOF`](super::EOF) or a negative code.
pub type ReadCallback = Box<dyn FnMut(&mut [u8]) -> i32>;

/// Seek by `(offset, whence)`, returning the new position, the size or a negative code.
pub type SeekCallback = Box<dyn FnMut(i64, i32) -> i64>;

/**
    Caller-supplied read/seek callbacks for a custom source.

    Whatever the closures capture plays the role of userdata: it lives exactly
    as long as the source's I/O context. A seek callback is optional; without
    one the engine treats the input as forward-only.

    # Example

    ```ignore
    let data = std::rc::Rc::new(payload);
    let mut pos = 0;
    let callbacks = Callbacks::new().read(move |buf| {
        let n = buf.len().min(data.len() - pos);
        buf[..n].copy_from_slice(&data[pos..pos + n]);
        pos += n;
        if n == 0 { media_source::io::EOF } else { n as i32 }
    });
    ```
*/
#[derive(Default)]
pub struct Callbacks {
    read: Option<ReadCallback>,
    seek: Option<SeekCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, read: impl FnMut(&mut [u8]) -> i32 + 'static) -> Self {
        self.read = Some(Box::new(read));
        self
    }

    pub fn seek(mut self, seek: impl FnMut(i64, i32) -> i64 + 'static) -> Self {
        self.seek = Some(Box::new(seek));
        self
    }

    /**
        Callbacks that drive `stream` through the byte-stream adapter.

        Both callbacks share the stream, which is dropped together with the
        source's I/O context.
    */
    pub fn from_stream<S: ByteStream + 'static>(stream: S) -> Self {
        let stream = Rc::new(RefCell::new(stream));
        let reader = Rc::clone(&stream);
        Self::new()
            .read(move |buf| adapter::read_packet(&mut *reader.borrow_mut(), buf))
            .seek(move |offset, whence| adapter::seek(&mut *stream.borrow_mut(), offset, whence))
    }

    pub fn has_read(&self) -> bool {
        self.read.is_some()
    }

    pub fn has_seek(&self) -> bool {
        self.seek.is_some()
    }

    /**
        Validate into the form handed to the engine.

        Fails if no read callback was supplied.
    */
    pub(crate) fn into_io(self) -> Result<IoCallbacks> {
        let read = self
            .read
            .ok_or_else(|| Error::invalid_argument("a read callback is required"))?;
        Ok(IoCallbacks {
            read,
            seek: self.seek,
        })
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("read", &self.has_read())
            .field("seek", &self.has_seek())
            .finish()
    }
}

/**
    Validated callback pair bound into an engine I/O context.
*/
pub struct IoCallbacks {
    read: ReadCallback,
    seek: Option<SeekCallback>,
}

impl IoCallbacks {
    pub fn read(&mut self, buf: &mut [u8]) -> i32 {
        (self.read)(buf)
    }

    /**
        Forward a seek request. Returns `-1` when the input is forward-only.
    */
    pub fn seek(&mut self, offset: i64, whence: i32) -> i64 {
        match self.seek.as_mut() {
            Some(seek) => seek(offset, whence),
            None => -1,
        }
    }

    pub fn is_seekable(&self) -> bool {
        self.seek.is_some()
    }
}

impl std::fmt::Debug for IoCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoCallbacks")
            .field("seekable", &self.is_seekable())
            .finish_non_exhaustive()
    }
}
