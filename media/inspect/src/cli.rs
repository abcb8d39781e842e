use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use media_source::ffmpeg::Ffmpeg;
use media_source::{Callbacks, Source, SourceConfig, io};

use crate::report::Report;

/**
    Print the streams of a media file.
*/
#[derive(Parser, Debug)]
#[command(name = "media-inspect")]
pub struct Cli {
    /// File to inspect.
    path: PathBuf,

    /// How the file is handed to the engine.
    #[arg(long, value_enum, default_value_t = Origin::Name)]
    origin: Origin,

    /// JSON source configuration. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read buffer size in bytes, for the stream and callbacks origins.
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Maximum bytes read while probing.
    #[arg(long)]
    probe_size: Option<i64>,

    /// Maximum stream duration analyzed while probing, in microseconds.
    #[arg(long)]
    analyze_duration: Option<i64>,

    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Origin {
    /// Let the engine open the path itself.
    Name,
    /// Read through a seekable byte stream.
    Stream,
    /// Read through a forward-only read callback.
    Callbacks,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = self.source_config()?;
        let engine = Ffmpeg::new().context("failed to initialize ffmpeg")?;

        let source = self.open(&engine, &config)?;
        let report = Report::collect(&source);
        source.close();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report.render(&self.path));
        }
        Ok(())
    }

    fn source_config(&self) -> Result<SourceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => SourceConfig::default(),
        };

        if let Some(size) = self.buffer_size {
            config = config.io_buffer_size(size);
        }
        if let Some(bytes) = self.probe_size {
            config = config.probe_size(bytes);
        }
        if let Some(micros) = self.analyze_duration {
            config = config.analyze_duration(micros);
        }
        Ok(config)
    }

    fn open(&self, engine: &Ffmpeg, config: &SourceConfig) -> Result<Source<Ffmpeg>> {
        let source = match self.origin {
            Origin::Name => {
                let name = self.path.to_str().context("path is not valid UTF-8")?;
                Source::from_name(engine, name, config)
            }
            Origin::Stream => Source::from_stream(engine, open_file(&self.path)?, config),
            Origin::Callbacks => {
                let mut file = open_file(&self.path)?;
                let callbacks = Callbacks::new().read(move |buf| io::read_packet(&mut file, buf));
                Source::from_callbacks(engine, callbacks, config)
            }
        };
        source.with_context(|| format!("failed to open {}", self.path.display()))
    }
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}
