/*!
    [`Engine`] implementation backed by FFmpeg through `ffmpeg-next`.
*/

use std::ffi::{CString, c_int, c_void};
use std::ptr::{self, NonNull};

use ffmpeg_next::ffi;
use tracing::trace;

use media_types::{Error, Result};

use crate::engine::{Engine, EngineError};
use crate::io::IoCallbacks;
use crate::probe::ProbeLimits;

mod handles;
mod trampoline;

pub use self::handles::{Buffer, Context, Input, Io};

/// `AVERROR(EINVAL)`.
const INVALID_ARGUMENT: c_int = -22;

fn error_from_code(code: c_int) -> EngineError {
    EngineError::new(code, ffmpeg_next::Error::from(code).to_string())
}

/**
    The FFmpeg engine.

    Construction initializes FFmpeg, which is safe to repeat.
*/
#[derive(Debug, Clone, Copy)]
pub struct Ffmpeg {
    _private: (),
}

impl Ffmpeg {
    pub fn new() -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::engine(e.into(), e.to_string()))?;
        Ok(Self { _private: () })
    }
}

/**
    Run `avformat_open_input` on `ctx`, which may be null or a pre-allocated
    context. FFmpeg frees a pre-allocated context when this fails.
*/
unsafe fn open_input(mut ctx: *mut ffi::AVFormatContext, url: &str) -> Result<Input, EngineError> {
    let url = CString::new(url)
        .map_err(|_| EngineError::new(INVALID_ARGUMENT, "name contains a NUL byte"))?;
    let ret =
        unsafe { ffi::avformat_open_input(&mut ctx, url.as_ptr(), ptr::null(), ptr::null_mut()) };
    if ret < 0 {
        return Err(error_from_code(ret));
    }
    Ok(unsafe { Input::from_raw(ctx) })
}

impl Engine for Ffmpeg {
    type Buffer = Buffer;
    type Context = Context;
    type Io = Io;
    type Input = Input;

    fn open_by_name(&self, name: &str) -> Result<Input, EngineError> {
        unsafe { open_input(ptr::null_mut(), name) }
    }

    fn alloc_buffer(&self, size: usize) -> Option<Buffer> {
        let ptr = unsafe { ffi::av_malloc(size) };
        NonNull::new(ptr.cast::<u8>()).map(|ptr| Buffer::new(ptr, size))
    }

    fn alloc_context(&self) -> Option<Context> {
        NonNull::new(unsafe { ffi::avformat_alloc_context() }).map(Context::new)
    }

    fn alloc_io(&self, buffer: Buffer, callbacks: IoCallbacks) -> Result<Io, Buffer> {
        let Ok(size) = c_int::try_from(buffer.size()) else {
            return Err(buffer);
        };
        let seek: Option<unsafe extern "C" fn(*mut c_void, i64, c_int) -> i64> =
            callbacks.is_seekable().then_some(trampoline::seek);
        let opaque = Box::into_raw(Box::new(callbacks));

        let ptr = unsafe {
            ffi::avio_alloc_context(
                buffer.as_ptr(),
                size,
                0,
                opaque.cast(),
                Some(trampoline::read_packet),
                None,
                seek,
            )
        };
        match NonNull::new(ptr) {
            Some(ptr) => {
                let _ = buffer.into_raw();
                // Box::into_raw never returns null.
                let callbacks = unsafe { NonNull::new_unchecked(opaque) };
                Ok(Io::new(ptr, callbacks))
            }
            None => {
                drop(unsafe { Box::from_raw(opaque) });
                Err(buffer)
            }
        }
    }

    fn attach_io(&self, context: &mut Context, io: &mut Io) {
        let ctx = context.as_ptr();
        unsafe {
            (*ctx).pb = io.as_ptr();
            (*ctx).flags |= ffi::AVFMT_FLAG_CUSTOM_IO as c_int;
        }
    }

    fn open_with_io(&self, context: Context, placeholder: &str) -> Result<Input, EngineError> {
        unsafe { open_input(context.into_raw(), placeholder) }
    }

    fn probe(&self, input: &mut Input, limits: &ProbeLimits) -> Result<(), EngineError> {
        let ctx = input.as_mut_ptr();
        let ret = unsafe {
            (*ctx).probesize = limits.probe_size;
            (*ctx).max_analyze_duration = limits.analyze_duration;
            ffi::avformat_find_stream_info(ctx, ptr::null_mut())
        };
        if ret < 0 {
            return Err(error_from_code(ret));
        }
        trace!(
            probe_size = limits.probe_size,
            analyze_duration = limits.analyze_duration,
            "probed input"
        );
        Ok(())
    }
}
