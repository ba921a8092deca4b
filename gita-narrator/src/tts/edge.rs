//! Microsoft Edge neural voices through the `edge-tts` command-line client.

use super::SpeechService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

pub struct EdgeTtsService {
    bin: PathBuf,
}

impl EdgeTtsService {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl SpeechService for EdgeTtsService {
    async fn synthesize(&self, text: &str, voice: &str, output_path: &Path) -> Result<()> {
        let output = Command::new(&self.bin)
            .arg("--voice")
            .arg(voice)
            .arg("--text")
            .arg(text)
            .arg("--write-media")
            .arg(output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to run {} (pip install edge-tts)",
                    self.bin.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("edge-tts failed ({}): {}", output.status, stderr.trim());
        }

        if !output_path.exists() {
            anyhow::bail!("edge-tts wrote no audio to {}", output_path.display());
        }

        Ok(())
    }
}
