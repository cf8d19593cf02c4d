use std::path::PathBuf;

pub mod audio;
pub mod batch;
pub mod cli;
pub mod engine;
pub mod testing;
pub mod utils;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Input directory '{}' not found", .0.display())]
    InputDirectoryMissing(PathBuf),
    #[error("Could not read files from '{}': {source}", path.display())]
    InputListingFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No input files found")]
    NoInputFiles,
    #[error("Transcoding engine not found at '{}'", .0.display())]
    EngineNotFound(PathBuf),
    #[error("{0}")]
    Engine(String),
    #[error("Output '{}' was already written by another input in this run", .0.display())]
    OutputCollision(PathBuf),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl ConvertError {
    pub fn is_engine_not_found(&self) -> bool {
        matches!(self, ConvertError::EngineNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

// Re-exports for convenience
pub use audio::file_set::{FileSet, InputFile};
pub use audio::format::AudioFormat;
pub use batch::{BatchConverter, BatchEvent, ConversionOptions, ConversionOutcome, RunSummary};
pub use engine::{TranscodeEngine, TranscodeRequest};
pub use utils::paths::PathResolver;
pub use utils::reporting::Reporter;
