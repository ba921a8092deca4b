//! Avatar video composition: animated background, lip-sync, static fallback.

use crate::error::{PipelineError, Result};
use crate::lipsync::LipSyncModel;
use crate::media::{BreathingEffect, MediaTranscoder};
use crate::scratch::ScratchFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Composed video, written into the work directory.
pub const VIDEO_OUTPUT_FILENAME: &str = "output_video.mp4";

/// Animated background handed to the lip-sync model.
pub const ALIVE_VIDEO_FILENAME: &str = "temp_alive_input.mp4";

pub struct VideoComposer {
    transcoder: Arc<dyn MediaTranscoder>,
    lipsync: Arc<dyn LipSyncModel>,
    effect: BreathingEffect,
    work_dir: PathBuf,
}

impl VideoComposer {
    pub fn new(
        transcoder: Arc<dyn MediaTranscoder>,
        lipsync: Arc<dyn LipSyncModel>,
        effect: BreathingEffect,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transcoder,
            lipsync,
            effect,
            work_dir: work_dir.into(),
        }
    }

    /// Produce a narrated avatar video from `audio` and a still `image`.
    ///
    /// With the lip-sync model present, the image is first animated with the
    /// breathing effect (falling back to the still image if that fails) and
    /// then lip-synced. Without the model, the still image is looped under the
    /// audio instead. A lip-sync failure is final for this call.
    pub fn compose(&self, audio: &Path, image: &Path) -> Result<PathBuf> {
        if !image.exists() {
            return Err(PipelineError::missing("Avatar image", image));
        }
        if !audio.exists() {
            return Err(PipelineError::missing("Audio file", audio));
        }

        let output = self.work_dir.join(VIDEO_OUTPUT_FILENAME);
        if output.exists() {
            std::fs::remove_file(&output)
                .map_err(|source| PipelineError::Finalize {
                    path: output.clone(),
                    source,
                })?;
        }

        if !self.lipsync.is_available() {
            log::warn!("Lip-sync model not found. Falling back to static image.");
            return self.static_video(audio, image, &output);
        }

        let alive = ScratchFile::new(self.work_dir.join(ALIVE_VIDEO_FILENAME));
        let face = match self.animate(image, audio, alive.path()) {
            Ok(()) => alive.path(),
            Err(e) => {
                log::warn!("{}. Using static image.", e);
                image
            }
        };

        self.lip_sync(face, audio, &output)
    }

    /// Render the breathing background clip, sized to the audio plus padding.
    fn animate(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        log::info!(
            "Applying breathing effect ({:.1}s cycle)...",
            self.effect.breath_period_secs()
        );

        let duration = self
            .transcoder
            .duration(audio)
            .map_err(|e| PipelineError::AnimationFailed(format!("{:#}", e)))?;

        self.transcoder
            .animate_still(image, &self.effect, self.effect.clip_duration(duration), output)
            .map_err(|e| PipelineError::AnimationFailed(format!("{:#}", e)))
    }

    fn lip_sync(&self, face: &Path, audio: &Path, output: &Path) -> Result<PathBuf> {
        log::info!("Generating lip-sync video...");

        self.lipsync
            .infer(face, audio, output)
            .map_err(|e| PipelineError::ModelInferenceFailed(format!("{:#}", e)))?;

        if !output.exists() {
            return Err(PipelineError::ModelInferenceFailed(format!(
                "model wrote no video to {}",
                output.display()
            )));
        }

        log::info!("Lip-sync video generated: {}", output.display());
        Ok(output.to_path_buf())
    }

    fn static_video(&self, audio: &Path, image: &Path, output: &Path) -> Result<PathBuf> {
        log::info!("Generating static video (fallback)...");

        self.transcoder
            .still_with_audio(image, audio, output)
            .map_err(|e| PipelineError::FallbackEncodeFailed(format!("{:#}", e)))?;

        if !output.exists() {
            return Err(PipelineError::FallbackEncodeFailed(format!(
                "encoder wrote no video to {}",
                output.display()
            )));
        }

        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{leftover_files, FakeLipSync, FakeTranscoder};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        audio: PathBuf,
        image: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let audio = dir.path().join("output_audio.mp3");
        let image = dir.path().join("krishna.jpg");
        std::fs::write(&audio, "narration").unwrap();
        std::fs::write(&image, "avatar").unwrap();
        Fixture { dir, audio, image }
    }

    fn composer(
        transcoder: &Arc<FakeTranscoder>,
        lipsync: &Arc<FakeLipSync>,
        dir: &Path,
    ) -> VideoComposer {
        VideoComposer::new(
            transcoder.clone(),
            lipsync.clone(),
            BreathingEffect::default(),
            dir,
        )
    }

    #[test]
    fn test_missing_image_has_no_side_effects() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::available());

        let err = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.dir.path().join("absent.jpg"))
            .unwrap_err();

        assert!(matches!(err, PipelineError::InputMissing { what: "Avatar image", .. }));
        assert_eq!(transcoder.animate_calls(), 0);
        assert!(lipsync.faces().is_empty());
    }

    #[test]
    fn test_missing_audio() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::available());

        let err = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.dir.path().join("absent.mp3"), &fx.image)
            .unwrap_err();

        assert!(matches!(err, PipelineError::InputMissing { what: "Audio file", .. }));
    }

    #[test]
    fn test_lipsync_uses_animated_background() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::available());

        let out = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap();

        assert_eq!(out, fx.dir.path().join(VIDEO_OUTPUT_FILENAME));
        assert!(out.exists());
        assert_eq!(
            lipsync.faces(),
            vec![fx.dir.path().join(ALIVE_VIDEO_FILENAME)]
        );
        assert!(!fx.dir.path().join(ALIVE_VIDEO_FILENAME).exists());
        assert_eq!(transcoder.still_calls(), 0);
    }

    #[test]
    fn test_animation_failure_falls_back_to_still_face() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working().with_failing_animation());
        let lipsync = Arc::new(FakeLipSync::available());

        let out = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap();

        assert!(out.exists());
        assert_eq!(lipsync.faces(), vec![fx.image.clone()]);
        assert!(!fx.dir.path().join(ALIVE_VIDEO_FILENAME).exists());
    }

    #[test]
    fn test_model_failure_is_fatal_and_cleans_up() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::failing());

        let err = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap_err();

        assert!(matches!(err, PipelineError::ModelInferenceFailed(_)));
        assert_eq!(transcoder.still_calls(), 0);
        assert_eq!(
            leftover_files(fx.dir.path()),
            vec!["krishna.jpg", "output_audio.mp3"]
        );
    }

    #[test]
    fn test_model_without_output_is_failure() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::silent());

        let err = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap_err();

        assert!(matches!(err, PipelineError::ModelInferenceFailed(_)));
    }

    #[test]
    fn test_stale_video_not_mistaken_for_output() {
        let fx = fixture();
        std::fs::write(fx.dir.path().join(VIDEO_OUTPUT_FILENAME), "old").unwrap();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::silent());

        let result = composer(&transcoder, &lipsync, fx.dir.path()).compose(&fx.audio, &fx.image);

        assert!(result.is_err());
        assert!(!fx.dir.path().join(VIDEO_OUTPUT_FILENAME).exists());
    }

    #[test]
    fn test_missing_model_uses_static_fallback() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working());
        let lipsync = Arc::new(FakeLipSync::missing());

        let out = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap();

        assert!(out.exists());
        assert_eq!(transcoder.still_calls(), 1);
        assert_eq!(transcoder.animate_calls(), 0);
        assert!(lipsync.faces().is_empty());
        assert!(!fx.dir.path().join(ALIVE_VIDEO_FILENAME).exists());
    }

    #[test]
    fn test_fallback_encode_failure() {
        let fx = fixture();
        let transcoder = Arc::new(FakeTranscoder::working().with_failing_still());
        let lipsync = Arc::new(FakeLipSync::missing());

        let err = composer(&transcoder, &lipsync, fx.dir.path())
            .compose(&fx.audio, &fx.image)
            .unwrap_err();

        assert!(matches!(err, PipelineError::FallbackEncodeFailed(_)));
    }
}
