/*!
    Owned FFmpeg handles. Each one frees its resource when dropped.
*/

use std::ffi::{c_int, c_void};
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};

use ffmpeg_next::ffi;
use ffmpeg_next::format::context::Input as InputContext;

use super::error_from_code;
use crate::engine::{BestStream, Demuxer, EngineError, NativeMediaType};
use crate::io::IoCallbacks;

/**
    Read buffer from `av_malloc`.
*/
pub struct Buffer {
    ptr: NonNull<u8>,
    size: usize,
}

impl Buffer {
    pub(super) fn new(ptr: NonNull<u8>, size: usize) -> Self {
        Self { ptr, size }
    }

    pub(super) fn size(&self) -> usize {
        self.size
    }

    pub(super) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Hand the buffer over to an I/O context.
    pub(super) fn into_raw(self) -> *mut u8 {
        ManuallyDrop::new(self).ptr.as_ptr()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe { ffi::av_free(self.ptr.as_ptr().cast()) };
    }
}

/**
    Format context from `avformat_alloc_context`, not yet opened.
*/
pub struct Context {
    ptr: NonNull<ffi::AVFormatContext>,
}

impl Context {
    pub(super) fn new(ptr: NonNull<ffi::AVFormatContext>) -> Self {
        Self { ptr }
    }

    pub(super) fn as_ptr(&self) -> *mut ffi::AVFormatContext {
        self.ptr.as_ptr()
    }

    /// Hand the context over to `avformat_open_input`, which frees it on failure.
    pub(super) fn into_raw(self) -> *mut ffi::AVFormatContext {
        ManuallyDrop::new(self).ptr.as_ptr()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { ffi::avformat_free_context(self.ptr.as_ptr()) };
    }
}

/**
    AVIOContext bound to boxed callbacks. Owns its read buffer.
*/
pub struct Io {
    ptr: NonNull<ffi::AVIOContext>,
    callbacks: NonNull<IoCallbacks>,
}

impl Io {
    /// Takes ownership of `callbacks`, which must come from `Box::into_raw`.
    pub(super) fn new(ptr: NonNull<ffi::AVIOContext>, callbacks: NonNull<IoCallbacks>) -> Self {
        Self { ptr, callbacks }
    }

    pub(super) fn as_ptr(&self) -> *mut ffi::AVIOContext {
        self.ptr.as_ptr()
    }
}

impl Drop for Io {
    fn drop(&mut self) {
        unsafe {
            // FFmpeg may have swapped the buffer, so free the one it holds now.
            let buffer = &raw mut (*self.ptr.as_ptr()).buffer;
            ffi::av_freep(buffer.cast::<c_void>());

            let mut ptr = self.ptr.as_ptr();
            ffi::avio_context_free(&mut ptr);

            drop(Box::from_raw(self.callbacks.as_ptr()));
        }
    }
}

/**
    Opened format context.
*/
pub struct Input {
    inner: InputContext,
}

impl Input {
    /// Takes ownership of a context opened by `avformat_open_input`.
    pub(super) unsafe fn from_raw(ptr: *mut ffi::AVFormatContext) -> Self {
        Self {
            inner: unsafe { InputContext::wrap(ptr) },
        }
    }

    pub(super) fn as_mut_ptr(&mut self) -> *mut ffi::AVFormatContext {
        unsafe { self.inner.as_mut_ptr() }
    }
}

fn av_media_type(native: NativeMediaType) -> Option<ffi::AVMediaType> {
    match native {
        NativeMediaType::VIDEO => Some(ffi::AVMediaType::AVMEDIA_TYPE_VIDEO),
        NativeMediaType::AUDIO => Some(ffi::AVMediaType::AVMEDIA_TYPE_AUDIO),
        NativeMediaType::DATA => Some(ffi::AVMediaType::AVMEDIA_TYPE_DATA),
        NativeMediaType::SUBTITLE => Some(ffi::AVMediaType::AVMEDIA_TYPE_SUBTITLE),
        NativeMediaType::ATTACHMENT => Some(ffi::AVMediaType::AVMEDIA_TYPE_ATTACHMENT),
        _ => None,
    }
}

impl Demuxer for Input {
    fn stream_count(&self) -> usize {
        self.inner.nb_streams() as usize
    }

    fn stream_type(&self, index: usize) -> NativeMediaType {
        unsafe {
            let ctx = self.inner.as_ptr();
            let stream = *(*ctx).streams.add(index);
            // Read the raw tag so values newer than the bindings stay detectable.
            let tag = &raw const (*(*stream).codecpar).codec_type;
            NativeMediaType(ptr::read(tag.cast::<c_int>()))
        }
    }

    fn best_stream(&self, media_type: NativeMediaType) -> Result<BestStream, EngineError> {
        let Some(media_type) = av_media_type(media_type) else {
            return Ok(BestStream::NotFound);
        };
        // av_find_best_stream only reads the context.
        let ret = unsafe {
            let ctx = self.inner.as_ptr().cast_mut();
            ffi::av_find_best_stream(ctx, media_type, -1, -1, ptr::null_mut(), 0)
        };
        match ret {
            index if index >= 0 => Ok(BestStream::Found(index as usize)),
            ffi::AVERROR_STREAM_NOT_FOUND => Ok(BestStream::NotFound),
            ffi::AVERROR_DECODER_NOT_FOUND => Ok(BestStream::DecoderNotFound),
            code => Err(error_from_code(code)),
        }
    }
}
