use crate::foundation::core::Frame;
use crate::foundation::error::{VerditeError, VerditeResult};

/// Nominal display duration for a single-frame (static image) template.
pub const STATIC_FRAME_MS: u32 = 100;
/// Floor for decoded GIF frame delays, so degenerate zero-duration frames
/// cannot stall timing math downstream.
pub const MIN_FRAME_MS: u32 = 50;

/// An ordered, finite, restartable sequence of template frames with
/// per-frame display durations in milliseconds.
///
/// Restartability is positional: the frame-sequence driver indexes frames
/// modulo the stream length, cycling back to index 0 whenever the paired
/// input outlives the template.
#[derive(Clone, Debug)]
pub struct TemplateStream {
    frames: Vec<Frame>,
    durations_ms: Vec<u32>,
}

impl TemplateStream {
    /// Build a stream from matching frame and duration lists. Both must be
    /// non-empty and of equal length.
    pub fn new(frames: Vec<Frame>, durations_ms: Vec<u32>) -> VerditeResult<Self> {
        if frames.is_empty() {
            return Err(VerditeError::template("template stream has no frames"));
        }
        if frames.len() != durations_ms.len() {
            return Err(VerditeError::template(format!(
                "template stream has {} frames but {} durations",
                frames.len(),
                durations_ms.len()
            )));
        }
        Ok(Self {
            frames,
            durations_ms,
        })
    }

    /// A single-frame stream with the nominal static duration.
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            durations_ms: vec![STATIC_FRAME_MS],
        }
    }

    /// Number of frames in the stream.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for iterator-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True for single-frame (static) templates, which the driver may
    /// amortize across calls.
    pub fn is_static(&self) -> bool {
        self.frames.len() == 1
    }

    /// Frame at an absolute index, if present.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Frame at `index % len`, the driver's cycling accessor.
    pub fn cycle_frame(&self, index: u64) -> &Frame {
        &self.frames[(index % self.frames.len() as u64) as usize]
    }

    /// Display duration of the frame at `index % len`.
    pub fn cycle_duration_ms(&self, index: u64) -> u32 {
        self.durations_ms[(index % self.durations_ms.len() as u64) as usize]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/stream.rs"]
mod tests;
