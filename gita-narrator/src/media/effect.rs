//! The "breathing" camera effect applied to a still avatar.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of a periodic zoom/pan over a still image.
///
/// Zoom oscillates around `zoom_base` with a sine of the output frame index;
/// the frame drifts horizontally (sine) and vertically (cosine) on a slower
/// period so the picture never sits perfectly still.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingEffect {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub zoom_base: f64,
    pub zoom_amplitude: f64,
    pub zoom_period_frames: u32,
    pub sway_x_amplitude: f64,
    pub sway_y_amplitude: f64,
    pub sway_period_frames: u32,
    /// Seconds of picture kept past the end of the audio
    pub padding_secs: f64,
}

impl Default for BreathingEffect {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 25,
            zoom_base: 1.05,
            zoom_amplitude: 0.02,
            zoom_period_frames: 150,
            sway_x_amplitude: 2.0,
            sway_y_amplitude: 1.0,
            sway_period_frames: 250,
            padding_secs: 1.0,
        }
    }
}

impl BreathingEffect {
    pub fn zoom_expr(&self) -> String {
        format!(
            "{}+{}*sin(2*PI*on/{})",
            self.zoom_base, self.zoom_amplitude, self.zoom_period_frames
        )
    }

    pub fn x_expr(&self) -> String {
        format!(
            "iw/2-(iw/zoom/2)+{}*sin(2*PI*on/{})",
            self.sway_x_amplitude, self.sway_period_frames
        )
    }

    pub fn y_expr(&self) -> String {
        format!(
            "ih/2-(ih/zoom/2)+{}*cos(2*PI*on/{})",
            self.sway_y_amplitude, self.sway_period_frames
        )
    }

    /// The ffmpeg `zoompan` filter for this effect.
    pub fn zoompan_filter(&self) -> String {
        format!(
            "zoompan=z='{}':x='{}':y='{}':d=1:s={}x{}:fps={}",
            self.zoom_expr(),
            self.x_expr(),
            self.y_expr(),
            self.width,
            self.height,
            self.fps
        )
    }

    /// Length of the animated clip for a given audio duration.
    pub fn clip_duration(&self, audio: Duration) -> Duration {
        audio + Duration::from_secs_f64(self.padding_secs.max(0.0))
    }

    /// Seconds per zoom cycle.
    pub fn breath_period_secs(&self) -> f64 {
        f64::from(self.zoom_period_frames) / f64::from(self.fps.max(1))
    }
}
