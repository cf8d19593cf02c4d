//! The one-shot folder conversion: every `.m4a` in a folder becomes a
//! 192 kbps mp3 in `<folder>/outputs`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use crate::audio::file_set::{scan_directory, InputFile};
use crate::audio::format::AudioFormat;
use crate::batch::{BatchConverter, ConversionOptions, RunSummary};
use crate::engine::TranscodeEngine;
use crate::utils::paths::{ensure_directory, DEFAULT_OUTPUT_DIR};
use crate::utils::reporting::{generate_conversion_report, Reporter};
use crate::{ConvertError, Result};

pub const SOURCE_EXTENSION: &str = "m4a";
pub const TARGET_BITRATE_KBPS: u32 = 192;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_dir: PathBuf,
    pub clean: bool,
    pub prefix: Option<String>,
    pub report: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(DEFAULT_OUTPUT_DIR)
    }

    fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            format: AudioFormat::Mp3,
            destination_dir: Some(self.output_dir()),
            strip_prefix: if self.clean { self.prefix.clone() } else { None },
            bitrate_kbps: Some(TARGET_BITRATE_KBPS),
        }
    }
}

/// The user's Downloads folder, falling back to `~/Downloads`.
pub fn default_input_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Runs the folder conversion.
///
/// Errors are reserved for conditions that stop the run before any file is
/// touched: a missing or unreadable input folder, or an engine that cannot
/// be started. An empty folder is a warning and yields an empty summary.
pub fn run_convert<W: Write>(
    options: &ConvertOptions,
    engine: Arc<dyn TranscodeEngine>,
    reporter: &mut Reporter<W>,
) -> Result<RunSummary> {
    reporter.line("--- M4A to MP3 Converter Starting ---")?;

    let files = scan_directory(&options.input_dir, SOURCE_EXTENSION)?;
    ensure_directory(options.output_dir())?;

    if files.is_empty() {
        reporter.line(format!(
            "Warning: {} (no .{} files in '{}').",
            ConvertError::NoInputFiles,
            SOURCE_EXTENSION,
            options.input_dir.display()
        ))?;
        let summary = RunSummary::default();
        reporter.summary(&summary)?;
        return Ok(summary);
    }

    reporter.line(format!(
        "Found a total of {} .{} files. Starting conversion...",
        files.len(),
        SOURCE_EXTENSION
    ))?;

    engine.validate()?;

    let files: Vec<InputFile> = files.into_iter().map(InputFile::new).collect();
    let converter = BatchConverter::new(engine);
    let summary = converter.run(&files, &options.conversion_options(), |event| {
        if let Err(e) = reporter.event(&event) {
            log::warn!("Could not write progress: {}", e);
        }
    });

    reporter.line("\nAll conversion tasks completed.")?;
    reporter.line(format!(
        "--- Results saved in the '{}' directory. ---",
        options.output_dir().display()
    ))?;

    if let Some(report) = &options.report {
        generate_conversion_report(&summary, report)?;
        reporter.line(format!("Report saved to: {}", report.display()))?;
    }

    Ok(summary)
}

/// Process exit status for a finished `run_convert`: 0 when the run got
/// through the batch (even with per-file failures or no files at all), 1 for
/// the errors that stop it up front.
pub fn exit_status(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Follow-up advice printed after a fatal error, if there is any.
pub fn failure_hint(error: &ConvertError) -> Option<String> {
    match error {
        ConvertError::InputDirectoryMissing(dir) => Some(format!(
            "Please create a '{}' folder and place your .{} files inside.",
            dir.display(),
            SOURCE_EXTENSION
        )),
        ConvertError::EngineNotFound(_) => {
            Some("Make sure ffmpeg is installed and on PATH, or pass --ffmpeg.".to_string())
        }
        _ => None,
    }
}
