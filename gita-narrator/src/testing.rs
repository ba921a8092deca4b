//! In-process fakes for the external capabilities.
//!
//! Speech "audio" is the chunk text itself and the fake concat joins file
//! bytes, so a narration can be read back and compared with its source text.

use crate::document::DocumentReader;
use crate::lipsync::LipSyncModel;
use crate::media::{concat, BreathingEffect, MediaTranscoder};
use crate::tts::SpeechService;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Sorted names of the files left in a directory.
pub fn leftover_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub struct FakeDocument {
    pages: Option<Vec<String>>,
}

impl FakeDocument {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: Some(pages.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn unreadable() -> Self {
        Self { pages: None }
    }
}

impl DocumentReader for FakeDocument {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        match &self.pages {
            Some(pages) => Ok(pages.clone()),
            None => anyhow::bail!("cannot open {}", path.display()),
        }
    }
}

pub struct FakeSpeech {
    /// Calls at or after this index fail
    fail_from: usize,
    calls: AtomicUsize,
    voices: Mutex<Vec<String>>,
}

impl FakeSpeech {
    /// Writes each chunk's text as its "audio".
    pub fn echo() -> Self {
        Self::failing_from(usize::MAX)
    }

    pub fn failing_from(call: usize) -> Self {
        Self {
            fail_from: call,
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn voices_used(&self) -> Vec<String> {
        self.voices.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechService for FakeSpeech {
    async fn synthesize(&self, text: &str, voice: &str, output_path: &Path) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.voices.lock().unwrap().push(voice.to_string());

        if call >= self.fail_from {
            // Leave a partial file behind, as an interrupted download would.
            std::fs::write(output_path, b"partial")?;
            anyhow::bail!("voice service unavailable");
        }

        std::fs::write(output_path, text)?;
        Ok(())
    }
}

pub struct FakeTranscoder {
    duration: Duration,
    fail_concat: bool,
    fail_animate: bool,
    fail_still: bool,
    concat_calls: AtomicUsize,
    animate_calls: AtomicUsize,
    still_calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn working() -> Self {
        Self {
            duration: Duration::from_secs(3),
            fail_concat: false,
            fail_animate: false,
            fail_still: false,
            concat_calls: AtomicUsize::new(0),
            animate_calls: AtomicUsize::new(0),
            still_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    pub fn with_failing_animation(mut self) -> Self {
        self.fail_animate = true;
        self
    }

    pub fn with_failing_still(mut self) -> Self {
        self.fail_still = true;
        self
    }

    pub fn concat_calls(&self) -> usize {
        self.concat_calls.load(Ordering::SeqCst)
    }

    pub fn animate_calls(&self) -> usize {
        self.animate_calls.load(Ordering::SeqCst)
    }

    pub fn still_calls(&self) -> usize {
        self.still_calls.load(Ordering::SeqCst)
    }
}

impl MediaTranscoder for FakeTranscoder {
    fn duration(&self, media: &Path) -> Result<Duration> {
        if !media.exists() {
            anyhow::bail!("no such media {}", media.display());
        }
        Ok(self.duration)
    }

    fn concat_copy(&self, list_file: &Path, output: &Path) -> Result<()> {
        self.concat_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_concat {
            std::fs::write(output, b"truncated")?;
            anyhow::bail!("concat failed");
        }

        let list = std::fs::read_to_string(list_file)?;
        let mut joined = Vec::new();
        for path in concat::parse_list(&list) {
            joined.extend(std::fs::read(&path)?);
        }
        std::fs::write(output, joined)?;
        Ok(())
    }

    fn animate_still(
        &self,
        image: &Path,
        effect: &BreathingEffect,
        duration: Duration,
        output: &Path,
    ) -> Result<()> {
        self.animate_calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(
            output,
            format!("{} {:?} {}", image.display(), duration, effect.zoompan_filter()),
        )?;
        if self.fail_animate {
            anyhow::bail!("zoompan failed");
        }
        Ok(())
    }

    fn still_with_audio(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        self.still_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_still {
            anyhow::bail!("libx264 missing");
        }
        std::fs::write(output, format!("{} + {}", image.display(), audio.display()))?;
        Ok(())
    }
}

pub struct FakeLipSync {
    available: bool,
    fail: bool,
    write_output: bool,
    faces: Mutex<Vec<PathBuf>>,
}

impl FakeLipSync {
    pub fn available() -> Self {
        Self {
            available: true,
            fail: false,
            write_output: true,
            faces: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::available()
        }
    }

    /// Exits cleanly but never writes its output file.
    pub fn silent() -> Self {
        Self {
            write_output: false,
            ..Self::available()
        }
    }

    /// Face inputs passed to `infer`, in call order.
    pub fn faces(&self) -> Vec<PathBuf> {
        self.faces.lock().unwrap().clone()
    }
}

impl LipSyncModel for FakeLipSync {
    fn is_available(&self) -> bool {
        self.available
    }

    fn infer(&self, face: &Path, audio: &Path, output: &Path) -> Result<()> {
        if !face.exists() {
            anyhow::bail!("face input {} missing", face.display());
        }
        self.faces.lock().unwrap().push(face.to_path_buf());
        if self.fail {
            anyhow::bail!("CUDA out of memory");
        }
        if self.write_output {
            std::fs::write(output, format!("lipsync {}", audio.display()))?;
        }
        Ok(())
    }
}
