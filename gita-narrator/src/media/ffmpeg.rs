//! MediaTranscoder backed by the ffmpeg/ffprobe command-line tools.

use super::{resolve_tool, BreathingEffect, MediaTranscoder};
use crate::config::ToolsConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(
            resolve_tool(tools.ffmpeg.as_deref(), "ffmpeg"),
            resolve_tool(tools.ffprobe.as_deref(), "ffprobe"),
        )
    }

    fn ffmpeg_command(&self) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y");
        cmd
    }

    /// Check if ffmpeg runs at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Run a command to completion, turning a non-zero exit into an error carrying stderr.
fn run(mut cmd: Command, what: &str) -> Result<()> {
    log::debug!("Running {}: {:?}", what, cmd);

    let output = cmd
        .output()
        .with_context(|| format!("Failed to run {}", what))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{} failed ({}): {}", what, output.status, stderr.trim());
    }

    Ok(())
}

/// Parse ffprobe's bare `format=duration` output.
fn parse_duration(stdout: &str) -> Result<Duration> {
    let secs: f64 = stdout
        .trim()
        .parse()
        .with_context(|| format!("Failed to parse duration {:?}", stdout.trim()))?;

    Duration::try_from_secs_f64(secs).context("Duration out of range")
}

impl MediaTranscoder for FfmpegTranscoder {
    fn duration(&self, media: &Path) -> Result<Duration> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(media)
            .output()
            .context("Failed to run ffprobe")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffprobe failed: {}", stderr);
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    fn concat_copy(&self, list_file: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg_command();
        cmd.args(["-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(list_file)
            .args(["-c", "copy"])
            .arg(output);
        run(cmd, "ffmpeg concat")
    }

    fn animate_still(
        &self,
        image: &Path,
        effect: &BreathingEffect,
        duration: Duration,
        output: &Path,
    ) -> Result<()> {
        let mut cmd = self.ffmpeg_command();
        cmd.args(["-loop", "1", "-i"])
            .arg(image)
            .arg("-vf")
            .arg(effect.zoompan_filter())
            .args(["-c:v", "libx264"])
            .arg("-t")
            .arg(format!("{:.3}", duration.as_secs_f64()))
            .args(["-pix_fmt", "yuv420p"])
            .arg(output);
        run(cmd, "ffmpeg zoompan")
    }

    fn still_with_audio(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg_command();
        cmd.args(["-loop", "1", "-i"])
            .arg(image)
            .arg("-i")
            .arg(audio)
            .args(["-vf", "scale=trunc(iw/2)*2:trunc(ih/2)*2"])
            .args(["-c:v", "libx264", "-tune", "stillimage"])
            .args(["-c:a", "aac", "-b:a", "192k"])
            .args(["-pix_fmt", "yuv420p", "-shortest"])
            .arg(output);
        run(cmd, "ffmpeg still encode")
    }
}
