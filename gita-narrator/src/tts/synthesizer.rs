//! Chunked narration: one TTS request per chunk, joined into a single file.

use super::{SpeechService, VoiceMap};
use crate::error::{PipelineError, Result};
use crate::media::{concat, MediaTranscoder};
use crate::scratch::ScratchFile;
use crate::text::chunk_text;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Final narration file, written into the work directory.
pub const AUDIO_OUTPUT_FILENAME: &str = "output_audio.mp3";

/// Concat list handed to the transcoder.
pub const CONCAT_LIST_FILENAME: &str = "chunks.txt";

pub struct SpeechSynthesizer {
    service: Arc<dyn SpeechService>,
    transcoder: Arc<dyn MediaTranscoder>,
    voices: VoiceMap,
    chunk_size: usize,
    work_dir: PathBuf,
}

impl SpeechSynthesizer {
    pub fn new(
        service: Arc<dyn SpeechService>,
        transcoder: Arc<dyn MediaTranscoder>,
        voices: VoiceMap,
        chunk_size: usize,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            transcoder,
            voices,
            chunk_size,
            work_dir: work_dir.into(),
        }
    }

    pub fn voices(&self) -> &VoiceMap {
        &self.voices
    }

    fn chunk_path(&self, index: usize) -> PathBuf {
        self.work_dir.join(format!("chunk_{}.mp3", index))
    }

    /// Narrate `text` in `lang`, returning the path of the final audio file.
    ///
    /// Chunks are synthesized one at a time, in order. Every chunk file is
    /// removed before this returns, on success or failure.
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf> {
        let voice = self.voices.voice_for(lang)?;
        let output = self.work_dir.join(AUDIO_OUTPUT_FILENAME);
        remove_if_exists(&output).await?;

        let chunks = chunk_text(text, self.chunk_size);
        if chunks.is_empty() {
            return Err(PipelineError::SynthesisFailed("no text to narrate".into()));
        }

        log::info!("Generating audio in {} chunks with {}...", chunks.len(), voice);

        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("TTS");

        let mut audio_chunks: Vec<ScratchFile> = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            // Tracked before the request so a half-written file is cleaned up too.
            audio_chunks.push(ScratchFile::new(self.chunk_path(i)));
            let chunk_file = audio_chunks[i].path();

            if let Err(e) = self.service.synthesize(chunk, voice, chunk_file).await {
                pb.abandon_with_message("TTS failed");
                return Err(PipelineError::SynthesisFailed(format!(
                    "chunk {} of {}: {:#}",
                    i + 1,
                    chunks.len(),
                    e
                )));
            }
            pb.inc(1);
        }
        pb.finish_with_message("TTS done");

        if let [only] = audio_chunks.as_slice() {
            tokio::fs::rename(only.path(), &output)
                .await
                .map_err(|e| PipelineError::SynthesisFailed(format!("promoting chunk: {}", e)))?;
        } else {
            log::info!("Combining audio chunks...");
            self.combine(&audio_chunks, &output).await?;
        }

        if !output.exists() {
            return Err(PipelineError::SynthesisFailed(format!(
                "no audio produced at {}",
                output.display()
            )));
        }

        Ok(output)
    }

    /// Stream-copy join of the chunk files into `output`.
    async fn combine(&self, audio_chunks: &[ScratchFile], output: &Path) -> Result<()> {
        let list = ScratchFile::new(self.work_dir.join(CONCAT_LIST_FILENAME));
        let paths: Vec<&Path> = audio_chunks.iter().map(ScratchFile::path).collect();

        let joined = concat::write_list(&paths, list.path())
            .and_then(|()| self.transcoder.concat_copy(list.path(), output));

        if let Err(e) = joined {
            // Never leave a truncated join behind as the final audio.
            remove_if_exists(output).await?;
            return Err(PipelineError::SynthesisFailed(format!("{:#}", e)));
        }

        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::SynthesisFailed(format!(
            "removing stale {}: {}",
            path.display(),
            e
        ))),
    }
}
