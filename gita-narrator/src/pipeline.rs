//! The narration pipeline: extract text, synthesize speech, compose video.

use crate::config::NarratorConfig;
use crate::document::{PdfReader, TextExtractor};
use crate::error::{PipelineError, Result};
use crate::lipsync::Wav2LipModel;
use crate::media::FfmpegTranscoder;
use crate::text::HeaderChapterLocator;
use crate::tts::{EdgeTtsService, SpeechSynthesizer, VoiceMap};
use crate::video::VideoComposer;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One narration run.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub document: PathBuf,
    pub lang: String,
    pub chapter: Option<u32>,
    pub avatar: PathBuf,
    pub output: PathBuf,
}

pub struct Pipeline {
    extractor: TextExtractor,
    synthesizer: SpeechSynthesizer,
    composer: VideoComposer,
}

impl Pipeline {
    pub fn new(
        extractor: TextExtractor,
        synthesizer: SpeechSynthesizer,
        composer: VideoComposer,
    ) -> Self {
        Self {
            extractor,
            synthesizer,
            composer,
        }
    }

    /// Wire the pipeline to lopdf, edge-tts, ffmpeg and Wav2Lip.
    pub fn from_config(config: &NarratorConfig) -> Self {
        let transcoder = Arc::new(FfmpegTranscoder::from_config(&config.tools));
        if !transcoder.is_available() {
            log::warn!("ffmpeg is not runnable; audio joins and video encodes will fail");
        }

        let extractor = TextExtractor::new(
            Box::new(PdfReader),
            Box::new(HeaderChapterLocator::new(config.chapter_labels.iter().cloned())),
        );
        let synthesizer = SpeechSynthesizer::new(
            Arc::new(EdgeTtsService::new(&config.tts.edge_tts_bin)),
            transcoder.clone(),
            VoiceMap::new(config.tts.voices.clone()),
            config.tts.chunk_size,
            &config.work_dir,
        );
        let composer = VideoComposer::new(
            transcoder,
            Arc::new(Wav2LipModel::from_config(&config.wav2lip)),
            config.video.clone(),
            &config.work_dir,
        );

        Self::new(extractor, synthesizer, composer)
    }

    /// Run every stage in order, stopping at the first failure.
    ///
    /// Returns the path of the finished video, which is `request.output`.
    pub async fn run(&self, request: &NarrationRequest) -> Result<PathBuf> {
        if !request.document.exists() {
            return Err(PipelineError::missing("PDF file", &request.document));
        }
        let voices = self.synthesizer.voices();
        if let Err(e) = voices.voice_for(&request.lang) {
            log::info!(
                "Configured languages: {}",
                voices.languages().collect::<Vec<_>>().join(", ")
            );
            return Err(e);
        }

        log::info!("Extracting text from {}...", request.document.display());
        let text = self.extractor.extract(&request.document, request.chapter)?;
        if text.is_empty() {
            return Err(PipelineError::ExtractionFailed("extracted text is empty".into()));
        }
        log::info!("Extracted {} characters.", text.chars().count());

        log::info!("Generating audio in {}...", request.lang);
        let audio = self.synthesizer.synthesize(&text, &request.lang).await?;
        log::info!("Audio saved to {}", audio.display());

        log::info!("Generating video with avatar to {}...", request.output.display());
        let video = self.composer.compose(&audio, &request.avatar)?;

        finalize(&video, &request.output)?;
        log::info!("Video saved to {}", request.output.display());

        Ok(request.output.clone())
    }
}

/// Move the composed video to the requested path, replacing any file there.
fn finalize(video: &Path, requested: &Path) -> Result<()> {
    if video == requested || same_file(video, requested) {
        return Ok(());
    }

    let io_err = |source: std::io::Error| PipelineError::Finalize {
        path: requested.to_path_buf(),
        source,
    };

    if requested.exists() {
        std::fs::remove_file(requested).map_err(io_err)?;
    }

    if let Err(e) = std::fs::rename(video, requested) {
        // Rename cannot cross filesystems; copy instead.
        log::debug!("Rename failed ({}), copying instead", e);
        std::fs::copy(video, requested).map_err(io_err)?;
        std::fs::remove_file(video).map_err(io_err)?;
    }

    Ok(())
}

/// Whether two paths name the same existing file ("./a.mp4" and "a.mp4").
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
