use crate::foundation::error::{VerditeError, VerditeResult};

/// Text-overlay configuration handed through to the overlay collaborator.
///
/// The compositing core never reads these fields itself; text is rendered
/// by an external layer strictly after compositing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextSettings {
    /// Whether the overlay collaborator should run at all.
    pub enabled: bool,
    /// Font family name.
    pub font: String,
    /// Font size in pixels.
    pub size: u32,
    /// Text color as a `#rrggbb` hex string.
    pub color: String,
    /// Horizontal anchor, percent of the output width.
    pub x_position_pct: u32,
    /// Vertical anchor, percent of the output height.
    pub y_position_pct: u32,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            font: "Arial".to_string(),
            size: 48,
            color: "#000000".to_string(),
            x_position_pct: 50,
            y_position_pct: 80,
        }
    }
}

/// Placement and crop configuration for the blur-background compositor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlurSettings {
    /// Rows to drop from the top of the sharp source, percent of height.
    pub crop_top_pct: f64,
    /// Rows to drop from the bottom of the sharp source, percent of height.
    pub crop_bottom_pct: f64,
    /// Horizontal placement within the leftover space, 0-100.
    pub x_position_pct: f64,
    /// Vertical placement within the leftover space, 0-100.
    pub y_position_pct: f64,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            crop_top_pct: 0.0,
            crop_bottom_pct: 0.0,
            x_position_pct: 50.0,
            y_position_pct: 50.0,
        }
    }
}

impl BlurSettings {
    /// Pre-flight check: each crop must stay within 0-30% and positions
    /// within 0-100%.
    pub fn validate(&self) -> VerditeResult<()> {
        for (name, v) in [
            ("crop_top_pct", self.crop_top_pct),
            ("crop_bottom_pct", self.crop_bottom_pct),
        ] {
            if !(0.0..=30.0).contains(&v) {
                return Err(VerditeError::validation(format!(
                    "{name} must be within 0-30, got {v}"
                )));
            }
        }
        for (name, v) in [
            ("x_position_pct", self.x_position_pct),
            ("y_position_pct", self.y_position_pct),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return Err(VerditeError::validation(format!(
                    "{name} must be within 0-100, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// How an externally-mixed narration track relates to the clip's own audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AudioMode {
    /// The narration track fully replaces the original audio.
    Replace,
    /// Narration is mixed over the attenuated original audio.
    Mix,
}

/// Audio configuration passed through to the external muxing layer. The
/// frame pipeline itself never consumes audio; only the volume scaling
/// factors are interpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AudioSettings {
    /// Replace or mix against the original track.
    pub mode: AudioMode,
    /// Narration volume, percent.
    pub narration_volume_pct: u32,
    /// Original-audio volume, percent (only meaningful for [`AudioMode::Mix`]).
    pub original_volume_pct: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            mode: AudioMode::Replace,
            narration_volume_pct: 100,
            original_volume_pct: 30,
        }
    }
}

impl AudioSettings {
    /// Narration gain as a linear factor.
    pub fn narration_gain(&self) -> f64 {
        f64::from(self.narration_volume_pct) / 100.0
    }

    /// Original-audio gain as a linear factor.
    pub fn original_gain(&self) -> f64 {
        f64::from(self.original_volume_pct) / 100.0
    }
}

/// Encoder selection, constructed by the caller and threaded into writer
/// setup. There is deliberately no process-wide probe-and-cache here.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncoderSettings {
    /// Prefer a hardware encoder when the host supports one.
    pub use_hardware: bool,
    /// The hardware codec to request when `use_hardware` is set.
    pub hardware_codec: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            use_hardware: false,
            hardware_codec: "h264_nvenc".to_string(),
        }
    }
}

impl EncoderSettings {
    /// The ffmpeg video codec name to encode with.
    pub fn video_codec(&self) -> &str {
        if self.use_hardware {
            &self.hardware_codec
        } else {
            "libx264"
        }
    }
}
