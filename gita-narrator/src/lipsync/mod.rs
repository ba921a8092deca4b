//! Lip-sync inference capability.

mod wav2lip;

pub use wav2lip::Wav2LipModel;

use anyhow::Result;
use std::path::Path;

/// A pretrained model that re-renders a face so its mouth follows an audio track.
pub trait LipSyncModel: Send + Sync {
    /// Whether the model's assets are present.
    fn is_available(&self) -> bool;

    /// Render `face` (image or video) lip-synced to `audio` into `output`.
    fn infer(&self, face: &Path, audio: &Path, output: &Path) -> Result<()>;
}
