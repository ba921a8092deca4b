//! Audio/video transcoding capability and its ffmpeg implementation.

pub mod concat;
pub mod effect;
mod ffmpeg;

pub use effect::BreathingEffect;
pub use ffmpeg::FfmpegTranscoder;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Media operations the pipeline delegates to an external transcoder.
pub trait MediaTranscoder: Send + Sync {
    /// Playback duration of an audio or video file.
    fn duration(&self, media: &Path) -> Result<Duration>;

    /// Join the files named in a concat list without re-encoding.
    fn concat_copy(&self, list_file: &Path, output: &Path) -> Result<()>;

    /// Render a still image into a clip of `duration` with the breathing effect.
    fn animate_still(
        &self,
        image: &Path,
        effect: &BreathingEffect,
        duration: Duration,
        output: &Path,
    ) -> Result<()>;

    /// Loop a still image under an audio track; the audio sets the length.
    fn still_with_audio(&self, image: &Path, audio: &Path, output: &Path) -> Result<()>;
}

/// Resolve an external tool: explicit path, then PATH lookup, then the bare name.
pub fn resolve_tool(configured: Option<&Path>, name: &str) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    which::which(name).unwrap_or_else(|_| PathBuf::from(name))
}
