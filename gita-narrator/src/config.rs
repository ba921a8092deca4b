//! gita-narrator configuration management.

use crate::media::effect::BreathingEffect;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Characters per TTS request.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

const VOICE_EN: &str = "en-IN-PrabhatNeural";
const VOICE_HI: &str = "hi-IN-MadhurNeural";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// Directory for transient artifacts (chunks, concat list, temp video)
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Avatar image used when --avatar-image is not given
    #[serde(default = "default_avatar")]
    pub default_avatar: PathBuf,

    /// Video path used when --output is not given
    #[serde(default = "default_output")]
    pub default_output: PathBuf,

    /// Header labels searched when isolating a chapter
    #[serde(default = "default_chapter_labels")]
    pub chapter_labels: Vec<String>,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub video: BreathingEffect,

    #[serde(default)]
    pub wav2lip: Wav2LipConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Maximum characters per synthesis request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// edge-tts executable
    #[serde(default = "default_edge_tts_bin")]
    pub edge_tts_bin: PathBuf,

    /// Language code -> voice identifier
    #[serde(default = "default_voices")]
    pub voices: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wav2LipConfig {
    /// Model checkout; its presence enables lip-sync
    #[serde(default = "default_wav2lip_dir")]
    pub dir: PathBuf,

    /// Checkpoint path, relative to `dir`
    #[serde(default = "default_checkpoint")]
    pub checkpoint: PathBuf,

    /// Inference entry point, relative to `dir`
    #[serde(default = "default_inference_script")]
    pub inference_script: PathBuf,

    /// Python interpreter used to run inference
    #[serde(default = "default_python")]
    pub python: PathBuf,
}

/// Explicit tool locations. Unset tools are looked up on PATH.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe: Option<PathBuf>,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_avatar() -> PathBuf {
    PathBuf::from("assets").join("krishna.jpg")
}

fn default_output() -> PathBuf {
    PathBuf::from("output_video.mp4")
}

fn default_chapter_labels() -> Vec<String> {
    vec!["Chapter".to_string(), "Adhyay".to_string()]
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_edge_tts_bin() -> PathBuf {
    PathBuf::from("edge-tts")
}

fn default_voices() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("en".to_string(), VOICE_EN.to_string()),
        ("hi".to_string(), VOICE_HI.to_string()),
    ])
}

fn default_wav2lip_dir() -> PathBuf {
    PathBuf::from("Wav2Lip")
}

fn default_checkpoint() -> PathBuf {
    PathBuf::from("checkpoints").join("wav2lip_gan.pth")
}

fn default_inference_script() -> PathBuf {
    PathBuf::from("inference.py")
}

fn default_python() -> PathBuf {
    PathBuf::from("python3")
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            default_avatar: default_avatar(),
            default_output: default_output(),
            chapter_labels: default_chapter_labels(),
            tts: TtsConfig::default(),
            video: BreathingEffect::default(),
            wav2lip: Wav2LipConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            edge_tts_bin: default_edge_tts_bin(),
            voices: default_voices(),
        }
    }
}

impl Default for Wav2LipConfig {
    fn default() -> Self {
        Self {
            dir: default_wav2lip_dir(),
            checkpoint: default_checkpoint(),
            inference_script: default_inference_script(),
            python: default_python(),
        }
    }
}

impl Wav2LipConfig {
    pub fn checkpoint_path(&self) -> PathBuf {
        self.dir.join(&self.checkpoint)
    }

    pub fn inference_script_path(&self) -> PathBuf {
        self.dir.join(&self.inference_script)
    }
}

impl NarratorConfig {
    /// Get the config file path: <config_dir>/gita-narrator/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gita-narrator")
            .join("config.toml")
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}
