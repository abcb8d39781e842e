/*!
    Conversion between the engine's native media types and [`StreamType`].
*/

use media_types::StreamType;

use crate::engine::NativeMediaType;

/**
    Classify a native media type. `None` for tags outside the supported set.
*/
pub fn stream_type_from_native(native: NativeMediaType) -> Option<StreamType> {
    match native {
        NativeMediaType::UNKNOWN => Some(StreamType::Unknown),
        NativeMediaType::DATA => Some(StreamType::Data),
        NativeMediaType::VIDEO => Some(StreamType::Video),
        NativeMediaType::AUDIO => Some(StreamType::Audio),
        NativeMediaType::SUBTITLE => Some(StreamType::Subtitle),
        NativeMediaType::ATTACHMENT => Some(StreamType::Attachment),
        _ => None,
    }
}

/**
    Native media type to rank for a best-stream query.

    Only video, audio and subtitle streams are ranked.
*/
pub fn native_for_best_stream(stream_type: StreamType) -> Option<NativeMediaType> {
    match stream_type {
        StreamType::Video => Some(NativeMediaType::VIDEO),
        StreamType::Audio => Some(NativeMediaType::AUDIO),
        StreamType::Subtitle => Some(NativeMediaType::SUBTITLE),
        StreamType::Unknown | StreamType::Data | StreamType::Attachment => None,
    }
}
