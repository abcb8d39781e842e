/*!
    Stream table queries over an opened source.
*/

use media_types::{Error, Result, StreamInfo, StreamType};

use crate::convert::{native_for_best_stream, stream_type_from_native};
use crate::engine::{BestStream, Demuxer, Engine};
use crate::last_error::Record;
use crate::source::Source;

impl<E: Engine> Source<E> {
    /**
        Number of streams found in the input.
    */
    pub fn stream_count(&self) -> usize {
        self.input().stream_count()
    }

    /**
        Classify the stream at `index`.

        Any integer type is accepted, so negative indices are reported as
        [`Error::InvalidArgument`] instead of wrapping around.
    */
    pub fn stream_info<I: TryInto<usize>>(&self, index: I) -> Result<StreamInfo> {
        self.lookup(index).record("get stream info")
    }

    fn lookup<I: TryInto<usize>>(&self, index: I) -> Result<StreamInfo> {
        let count = self.stream_count();
        let index = index
            .try_into()
            .ok()
            .filter(|i| *i < count)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "invalid stream index (source has {count} streams)"
                ))
            })?;

        let native = self.input().stream_type(index);
        let stream_type =
            stream_type_from_native(native).ok_or(Error::UnknownStreamType(native.0))?;
        Ok(StreamInfo::new(index, stream_type))
    }

    /**
        Index of the stream the engine considers best for `stream_type`.

        Only video, audio and subtitle streams are ranked; other types return
        `Ok(None)` without asking the engine. `Ok(None)` is also returned when
        the input has no stream of the type.
    */
    pub fn best_stream(&self, stream_type: StreamType) -> Result<Option<usize>> {
        self.rank(stream_type).record("get best stream")
    }

    fn rank(&self, stream_type: StreamType) -> Result<Option<usize>> {
        let Some(native) = native_for_best_stream(stream_type) else {
            return Ok(None);
        };
        match self.input().best_stream(native)? {
            BestStream::Found(index) => Ok(Some(index)),
            BestStream::NotFound => Ok(None),
            BestStream::DecoderNotFound => Err(Error::DecoderUnavailable(stream_type)),
        }
    }

    /**
        Classification of every stream, in index order.
    */
    pub fn streams(&self) -> impl Iterator<Item = Result<StreamInfo>> + '_ {
        (0..self.stream_count()).map(|index| self.stream_info(index))
    }
}
