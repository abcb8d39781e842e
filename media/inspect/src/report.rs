use std::fmt::Write;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use media_source::engine::Engine;
use media_source::{Source, StreamInfo, StreamType};

/**
    Stream catalog of an opened source.
*/
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub streams: Vec<StreamInfo>,
    pub best: Best,
}

#[derive(Debug, Default, Serialize)]
pub struct Best {
    pub video: Option<usize>,
    pub audio: Option<usize>,
    pub subtitle: Option<usize>,
}

impl Report {
    /**
        Query every stream and the best stream of each selectable type.

        Streams that fail to classify and types without a usable decoder are
        logged and left out.
    */
    pub fn collect<E: Engine>(source: &Source<E>) -> Self {
        let streams = source
            .streams()
            .filter_map(|info| info.inspect_err(|e| warn!("skipping stream: {e}")).ok())
            .collect();

        let best = |stream_type| {
            source
                .best_stream(stream_type)
                .inspect_err(|e| warn!("{e}"))
                .ok()
                .flatten()
        };

        Self {
            streams,
            best: Best {
                video: best(StreamType::Video),
                audio: best(StreamType::Audio),
                subtitle: best(StreamType::Subtitle),
            },
        }
    }

    pub fn render(&self, path: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {} streams", path.display(), self.streams.len());
        for info in &self.streams {
            let _ = writeln!(out, "  {info}");
        }

        let best = [
            ("video", self.best.video),
            ("audio", self.best.audio),
            ("subtitle", self.best.subtitle),
        ];
        for (name, index) in best {
            if let Some(index) = index {
                let _ = writeln!(out, "best {name}: #{index}");
            }
        }
        out
    }
}
