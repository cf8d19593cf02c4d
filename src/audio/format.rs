use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use crate::ConvertError;

/// Extensions picked up by folder scans. Wider than the set of target
/// formats: wma can be read but is never written.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["m4a", "mp3", "wav", "flac", "ogg", "wma"];

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
    Ogg,
    M4a,
}

impl AudioFormat {
    /// Choices offered by the format selector, in display order.
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Ogg,
        AudioFormat::M4a,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::M4a => "m4a",
        }
    }

    /// Audio encoder ffmpeg should use when writing this format. `None`
    /// leaves the choice to the container's default, which for ogg depends
    /// on the encoders ffmpeg was built with.
    pub fn ffmpeg_codec(&self) -> Option<&'static str> {
        match self {
            AudioFormat::Mp3 => Some("libmp3lame"),
            AudioFormat::Wav => Some("pcm_s16le"),
            AudioFormat::Flac => Some("flac"),
            AudioFormat::Ogg => None,
            AudioFormat::M4a => Some("aac"),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for AudioFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_lowercase();
        AudioFormat::ALL
            .iter()
            .copied()
            .find(|f| f.extension() == normalized)
            .ok_or_else(|| ConvertError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Case-insensitive check against [`RECOGNIZED_EXTENSIONS`].
pub fn is_recognized_audio(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| RECOGNIZED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
