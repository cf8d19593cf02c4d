use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use crate::engine::{TranscodeEngine, TranscodeRequest};
use crate::{ConvertError, Result};

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Runs the `ffmpeg` executable once per file.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// -y            : overwrite without asking
    /// -i <input>    : input, container probed by ffmpeg
    /// -vn           : drop embedded cover art streams
    /// -codec:a <c>  : encoder for the target format, when one is pinned
    /// -b:a <n>k     : only when a bitrate is pinned
    pub fn build_args(request: &TranscodeRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            request.input.clone().into_os_string(),
            "-vn".into(),
        ];
        if let Some(codec) = request.format.ffmpeg_codec() {
            args.push("-codec:a".into());
            args.push(codec.into());
        }
        if let Some(bitrate) = request.bitrate_kbps {
            args.push("-b:a".into());
            args.push(format!("{}k", bitrate).into());
        }
        args.push(request.output.clone().into_os_string());
        args
    }

    fn spawn_error(&self, e: io::Error) -> ConvertError {
        if e.kind() == io::ErrorKind::NotFound {
            ConvertError::EngineNotFound(self.ffmpeg_path.clone())
        } else {
            ConvertError::Io(e)
        }
    }

    fn run(&self, args: &[OsString]) -> Result<Output> {
        Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))
    }
}

impl TranscodeEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn validate(&self) -> Result<()> {
        let output = self.run(&[OsString::from("-version")])?;
        if !output.status.success() {
            return Err(ConvertError::Engine(format!(
                "{} -version exited with status {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }
        Ok(())
    }

    fn transcode(&self, request: &TranscodeRequest) -> Result<()> {
        let args = Self::build_args(request);
        log::debug!("Running {} {:?}", self.ffmpeg_path.display(), args);

        let output = self.run(&args)?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ConvertError::Engine(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("Unknown error")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::format::AudioFormat;
    use pretty_assertions::assert_eq;

    fn request(format: AudioFormat, bitrate_kbps: Option<u32>) -> TranscodeRequest {
        TranscodeRequest {
            input: PathBuf::from("/in/song.m4a"),
            output: PathBuf::from("/in/outputs/song.mp3"),
            format,
            bitrate_kbps,
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn pinned_bitrate_is_passed_through() {
        let args = strings(FfmpegEngine::build_args(&request(AudioFormat::Mp3, Some(192))));
        assert_eq!(
            args,
            vec![
                "-hide_banner", "-loglevel", "error", "-y", "-i", "/in/song.m4a", "-vn",
                "-codec:a", "libmp3lame", "-b:a", "192k", "/in/outputs/song.mp3",
            ]
        );
    }

    #[test]
    fn no_bitrate_flag_by_default() {
        let args = strings(FfmpegEngine::build_args(&request(AudioFormat::Flac, None)));
        assert!(!args.contains(&"-b:a".to_string()));
        assert!(args.contains(&"flac".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/in/outputs/song.mp3"));
    }

    #[test]
    fn ogg_uses_the_container_default_codec() {
        let args = strings(FfmpegEngine::build_args(&request(AudioFormat::Ogg, None)));
        assert!(!args.contains(&"-codec:a".to_string()));
        assert!(!args.contains(&"libvorbis".to_string()));
        assert_eq!(args[args.len() - 2], "-vn");
    }

    #[test]
    fn missing_executable_is_engine_not_found() {
        let engine = FfmpegEngine::new("/definitely/not/here/ffmpeg");
        assert!(engine.validate().unwrap_err().is_engine_not_found());
        let err = engine.transcode(&request(AudioFormat::Mp3, None)).unwrap_err();
        assert!(err.is_engine_not_found());
    }
}
