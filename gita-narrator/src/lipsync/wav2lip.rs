//! Wav2Lip run as a Python subprocess.

use super::LipSyncModel;
use crate::config::Wav2LipConfig;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct Wav2LipModel {
    dir: PathBuf,
    checkpoint: PathBuf,
    script: PathBuf,
    python: PathBuf,
}

impl Wav2LipModel {
    pub fn from_config(config: &Wav2LipConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            checkpoint: config.checkpoint_path(),
            script: config.inference_script_path(),
            python: config.python.clone(),
        }
    }

    /// Arguments passed to the inference script.
    fn inference_args(&self, face: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        vec![
            self.script.clone().into(),
            "--checkpoint_path".into(),
            self.checkpoint.clone().into(),
            "--face".into(),
            face.into(),
            "--audio".into(),
            audio.into(),
            "--outfile".into(),
            output.into(),
            "--resize_factor".into(),
            "1".into(),
            "--nosmooth".into(),
        ]
    }
}

impl LipSyncModel for Wav2LipModel {
    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }

    fn infer(&self, face: &Path, audio: &Path, output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.python);
        cmd.args(self.inference_args(face, audio, output))
            // The inference script imports its sibling modules.
            .env("PYTHONPATH", &self.dir);

        log::debug!("Running Wav2Lip: {:?}", cmd);

        // Inherit stdio so the model's own progress stays visible.
        let status = cmd
            .status()
            .with_context(|| format!("Failed to run {}", self.python.display()))?;

        if !status.success() {
            anyhow::bail!("Wav2Lip inference exited with {}", status);
        }

        Ok(())
    }
}
