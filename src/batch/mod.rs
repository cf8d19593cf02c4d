//! Sequential batch conversion.

pub mod converter;
pub mod events;

use std::path::PathBuf;
use crate::audio::format::AudioFormat;

pub use converter::BatchConverter;
pub use events::{BatchEvent, ConversionOutcome, RunSummary};

/// Settings shared by every file of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub format: AudioFormat,
    /// `None` (or an empty path) writes into `outputs/` beside each source.
    pub destination_dir: Option<PathBuf>,
    /// Removed from the start of each output name when present.
    pub strip_prefix: Option<String>,
    pub bitrate_kbps: Option<u32>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: AudioFormat::Mp3,
            destination_dir: None,
            strip_prefix: None,
            bitrate_kbps: None,
        }
    }
}
