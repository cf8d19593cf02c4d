use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use crate::audio::file_set::InputFile;
use crate::batch::events::{BatchEvent, ConversionOutcome, RunSummary};
use crate::batch::ConversionOptions;
use crate::engine::{TranscodeEngine, TranscodeRequest};
use crate::utils::paths::PathResolver;
use crate::{ConvertError, Result};

/// Converts files one at a time, isolating each file's failure.
#[derive(Clone)]
pub struct BatchConverter {
    engine: Arc<dyn TranscodeEngine>,
}

impl BatchConverter {
    pub fn new(engine: Arc<dyn TranscodeEngine>) -> Self {
        Self { engine }
    }

    pub fn run<F>(&self, files: &[InputFile], options: &ConversionOptions, mut on_event: F) -> RunSummary
    where
        F: FnMut(BatchEvent),
    {
        let total = files.len();
        let resolver = PathResolver::new(options);
        let mut written: HashSet<PathBuf> = HashSet::new();
        let mut summary = RunSummary::default();

        log::info!(
            "Starting batch of {} files to .{} with {}",
            total,
            options.format,
            self.engine.name()
        );
        on_event(BatchEvent::Started { total, format: options.format });

        for (idx, input) in files.iter().enumerate() {
            on_event(BatchEvent::Processing {
                index: idx + 1,
                total,
                input: input.clone(),
            });

            let outcome = match self.convert_one(input, options, &resolver, &written) {
                Ok(output) => {
                    written.insert(output.clone());
                    ConversionOutcome::Converted {
                        input: input.clone(),
                        output,
                    }
                }
                Err(e) => {
                    log::debug!("Failed to convert {}: {}", input.path.display(), e);
                    ConversionOutcome::Failed {
                        input: input.clone(),
                        engine_missing: e.is_engine_not_found(),
                        error: e.to_string(),
                    }
                }
            };
            summary.record(outcome.clone());
            on_event(BatchEvent::Item(outcome));
        }

        summary.finish();
        if summary.engine_missing {
            log::warn!("{} could not be started for any file", self.engine.name());
        }
        log::info!("Batch finished: {} succeeded, {} failed", summary.succeeded, summary.failed);
        on_event(BatchEvent::Completed(summary.clone()));
        summary
    }

    fn convert_one(
        &self,
        input: &InputFile,
        options: &ConversionOptions,
        resolver: &PathResolver,
        written: &HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        let output = resolver.output_path(input);
        if written.contains(&output) || output == input.path {
            return Err(ConvertError::OutputCollision(output));
        }
        let output = resolver.prepare(input)?;

        self.engine.transcode(&TranscodeRequest {
            input: input.path.clone(),
            output: output.clone(),
            format: options.format,
            bitrate_kbps: options.bitrate_kbps,
        })?;
        Ok(output)
    }
}
