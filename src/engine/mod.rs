//! External transcoding engine.
//!
//! The batch never touches audio samples; it hands an engine an input path,
//! an output path and a target format and waits for the call to return.

pub mod ffmpeg;

use std::path::PathBuf;
use crate::audio::format::AudioFormat;
use crate::Result;

pub use ffmpeg::FfmpegEngine;

/// One decode-and-encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: AudioFormat,
    /// Fixed output bitrate; `None` leaves the encoder default.
    pub bitrate_kbps: Option<u32>,
}

pub trait TranscodeEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Checks that the engine can be invoked at all.
    fn validate(&self) -> Result<()>;

    /// Blocks until the output file has been written or the engine failed.
    fn transcode(&self, request: &TranscodeRequest) -> Result<()>;
}
