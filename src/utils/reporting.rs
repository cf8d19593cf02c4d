use std::io::{self, Write};
use std::path::Path;
use csv::Writer;
use serde::Serialize;
use crate::audio::format::AudioFormat;
use crate::batch::{BatchEvent, ConversionOutcome, RunSummary};
use crate::Result;

/// Renders batch progress as human-readable lines.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref())?;
        self.out.flush()
    }

    pub fn event(&mut self, event: &BatchEvent) -> io::Result<()> {
        match event {
            BatchEvent::Started { format, .. } => {
                self.line(format!("--- Starting Batch Conversion to .{} ---", format))
            }
            BatchEvent::Processing { index, total, input } => {
                self.line(format!("[{}/{}] Processing: {}", index, total, input.file_name))
            }
            BatchEvent::Item(ConversionOutcome::Converted { output, .. }) => {
                self.line(format!("  -> Saved: {}", output.display()))
            }
            BatchEvent::Item(ConversionOutcome::Failed { error, .. }) => {
                self.line(format!("  -> ERROR: {}", error))
            }
            BatchEvent::Completed(summary) => self.summary(summary),
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.line("--- Conversion Completed ---")?;
        self.line(format!("Success: {}", summary.succeeded))?;
        self.line(format!("Failed: {}", summary.failed))?;
        if summary.engine_missing {
            self.line(
                "Warning: the transcoding engine could not be started for any file. \
                 Make sure ffmpeg is installed and on PATH.",
            )?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    input: String,
    output: String,
    format: Option<AudioFormat>,
    status: &'a str,
    error: &'a str,
}

/// Writes one CSV row per processed file.
pub fn generate_conversion_report(summary: &RunSummary, output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    let mut writer = Writer::from_path(output_path)?;

    for outcome in &summary.outcomes {
        let row = match outcome {
            ConversionOutcome::Converted { input, output } => ReportRow {
                input: input.path.display().to_string(),
                output: output.display().to_string(),
                format: AudioFormat::from_path(output),
                status: "converted",
                error: "",
            },
            ConversionOutcome::Failed { input, error, .. } => ReportRow {
                input: input.path.display().to_string(),
                output: String::new(),
                format: None,
                status: "failed",
                error,
            },
        };
        writer.serialize(row)?;
    }

    writer.flush()?;
    log::info!("Conversion report written to {}", output_path.display());
    Ok(())
}
