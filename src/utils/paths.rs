use std::fs;
use std::path::{Path, PathBuf};
use crate::audio::file_set::InputFile;
use crate::batch::ConversionOptions;
use crate::audio::format::AudioFormat;
use crate::Result;

/// Name of the folder created beside a source file when no destination
/// directory is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Derives where each converted file is written.
#[derive(Debug, Clone)]
pub struct PathResolver {
    destination_dir: Option<PathBuf>,
    format: AudioFormat,
    strip_prefix: Option<String>,
}

impl PathResolver {
    pub fn new(options: &ConversionOptions) -> Self {
        Self {
            destination_dir: options
                .destination_dir
                .clone()
                .filter(|dir| !dir.as_os_str().is_empty()),
            format: options.format,
            strip_prefix: options.strip_prefix.clone().filter(|p| !p.is_empty()),
        }
    }

    pub fn destination_dir(&self, input: &InputFile) -> PathBuf {
        match &self.destination_dir {
            Some(dir) => dir.clone(),
            None => input
                .path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Output base name: the input stem, minus the configured prefix when the
    /// stem starts with it. A stem made only of the prefix is kept whole.
    pub fn output_stem(&self, input: &InputFile) -> String {
        let stem = input.stem();
        match self.strip_prefix.as_deref().and_then(|p| stem.strip_prefix(p)) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => stem,
        }
    }

    pub fn output_path(&self, input: &InputFile) -> PathBuf {
        self.destination_dir(input)
            .join(format!("{}.{}", self.output_stem(input), self.format.extension()))
    }

    /// Resolves the output path and makes sure its directory exists.
    pub fn prepare(&self, input: &InputFile) -> Result<PathBuf> {
        ensure_directory(self.destination_dir(input))?;
        Ok(self.output_path(input))
    }
}

pub fn ensure_directory(path: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(path.as_ref())?;
    Ok(())
}
