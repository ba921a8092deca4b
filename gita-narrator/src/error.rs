//! Stage-level failures of the narration pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{what} not found: {}", path.display())]
    InputMissing { what: &'static str, path: PathBuf },

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No voice configured for language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Recovered inside the composer; only ever logged.
    #[error("Background animation failed: {0}")]
    AnimationFailed(String),

    #[error("Lip-sync inference failed: {0}")]
    ModelInferenceFailed(String),

    #[error("Static video encode failed: {0}")]
    FallbackEncodeFailed(String),

    #[error("Could not replace video at {}: {source}", path.display())]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::InputMissing {
            what,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
