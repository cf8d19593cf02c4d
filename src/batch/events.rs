use std::path::PathBuf;
use crate::audio::file_set::InputFile;
use crate::audio::format::AudioFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted {
        input: InputFile,
        output: PathBuf,
    },
    Failed {
        input: InputFile,
        error: String,
        engine_missing: bool,
    },
}

impl ConversionOutcome {
    pub fn input(&self) -> &InputFile {
        match self {
            ConversionOutcome::Converted { input, .. } | ConversionOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<ConversionOutcome>,
    /// Every attempt failed because the engine could not be started.
    pub engine_missing: bool,
}

impl RunSummary {
    pub fn record(&mut self, outcome: ConversionOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.engine_missing = self.failed > 0
            && self.outcomes.iter().all(|o| {
                matches!(o, ConversionOutcome::Failed { engine_missing: true, .. })
            });
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Progress notifications emitted while a batch runs, in order:
/// `Started`, then `Processing`/`Item` per file, then `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { total: usize, format: AudioFormat },
    Processing { index: usize, total: usize, input: InputFile },
    Item(ConversionOutcome),
    Completed(RunSummary),
}
