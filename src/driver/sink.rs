use crate::foundation::core::Frame;
use crate::foundation::error::VerditeResult;

/// A frame consumer fed one composited frame at a time, in output order.
pub trait FrameSink {
    /// Accept the next output frame.
    fn write_frame(&mut self, frame: &Frame) -> VerditeResult<()>;
}

/// Collects written frames in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written so far, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consume the sink, yielding the collected frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &Frame) -> VerditeResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
