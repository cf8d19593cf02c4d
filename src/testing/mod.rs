//! In-process engine for exercising batches without ffmpeg.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use crate::engine::{TranscodeEngine, TranscodeRequest};
use crate::{ConvertError, Result};

/// A `TranscodeEngine` whose answers are fixed up front.
///
/// Successful calls write an empty file at the requested output path, so
/// callers can assert on the filesystem as well as on [`requests`].
///
/// [`requests`]: ScriptedEngine::requests
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    missing: bool,
    failing: HashSet<PathBuf>,
    requests: Mutex<Vec<TranscodeRequest>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose executable cannot be found.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// Makes conversion of `input` fail with a decode error.
    pub fn fail_on(mut self, input: impl Into<PathBuf>) -> Self {
        self.failing.insert(input.into());
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<TranscodeRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TranscodeRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn not_found(&self) -> ConvertError {
        ConvertError::EngineNotFound(PathBuf::from("scripted"))
    }
}

impl TranscodeEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn validate(&self) -> Result<()> {
        if self.missing {
            return Err(self.not_found());
        }
        Ok(())
    }

    fn transcode(&self, request: &TranscodeRequest) -> Result<()> {
        self.lock().push(request.clone());

        if self.missing {
            return Err(self.not_found());
        }
        if self.failing.contains(&request.input) {
            return Err(ConvertError::Engine(format!(
                "Invalid data found when processing input: {}",
                request.input.display()
            )));
        }
        fs::write(&request.output, b"")?;
        Ok(())
    }
}
