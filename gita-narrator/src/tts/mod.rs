//! Speech synthesis: the voice-service capability and chunked narration.

mod edge;
pub mod synthesizer;

pub use edge::EdgeTtsService;
pub use synthesizer::SpeechSynthesizer;

use crate::error::{PipelineError, Result};
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

/// A text-to-speech service addressed by voice identifier.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `text` with `voice` into an audio file at `output_path`.
    async fn synthesize(&self, text: &str, voice: &str, output_path: &Path) -> AnyResult<()>;
}

/// Language code to voice identifier.
#[derive(Debug, Clone)]
pub struct VoiceMap {
    voices: BTreeMap<String, String>,
}

impl VoiceMap {
    pub fn new(voices: BTreeMap<String, String>) -> Self {
        Self { voices }
    }

    pub fn voice_for(&self, lang: &str) -> Result<&str> {
        self.voices
            .get(lang)
            .map(String::as_str)
            .ok_or_else(|| PipelineError::UnsupportedLanguage(lang.to_string()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.voices.keys().map(String::as_str)
    }
}
