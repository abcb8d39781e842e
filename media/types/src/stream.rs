/*!
    Stream classification types.
*/

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/**
    Public classification of a logical stream inside a source.

    This is a closed set. Engines report a wider native taxonomy which is
    mapped onto these variants; anything that does not map is an error rather
    than a silent `Unknown`.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    /// The engine knows the stream exists but not what it carries.
    Unknown,
    /// Opaque data track (timecodes, metadata streams, ...).
    Data,
    Video,
    Audio,
    Subtitle,
    /// Attached file, usually fonts or cover art in Matroska.
    Attachment,
}

impl StreamType {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Data,
        Self::Video,
        Self::Audio,
        Self::Subtitle,
        Self::Attachment,
    ];

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Data => "data",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Attachment => "attachment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.to_name().eq_ignore_ascii_case(name))
    }

    /**
        Returns true if a "best stream" selection is meaningful for this type.

        Only video, audio and subtitle streams are ranked by the engine.
    */
    pub const fn is_selectable(self) -> bool {
        matches!(self, Self::Video | Self::Audio | Self::Subtitle)
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for StreamType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseError {
            kind: "stream type",
            value: s.to_owned(),
        })
    }
}

/**
    Classified view of one stream of an opened source.

    Derived on demand from the source's live stream table; never cached.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Position of the stream in the source's stream table (0-based).
    pub index: usize,
    /// Classified stream type.
    #[serde(rename = "type")]
    pub stream_type: StreamType,
}

impl StreamInfo {
    pub const fn new(index: usize, stream_type: StreamType) -> Self {
        Self { index, stream_type }
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.stream_type)
    }
}
