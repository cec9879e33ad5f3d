use crate::foundation::core::{Fps, Frame};
use crate::foundation::error::VerditeResult;
use crate::raster::resize::resize_frame;

/// A sequential decoded-frame producer, owned and sequenced by the
/// frame-sequence driver.
///
/// Implementations are strictly pull-based: the driver calls `next_frame`
/// in request/response order and `reset` to rewind to frame 0 for looping
/// pairings.
pub trait FrameSource {
    /// The next decoded frame, or `None` at end of stream.
    fn next_frame(&mut self) -> VerditeResult<Option<Frame>>;

    /// Rewind to the first frame.
    fn reset(&mut self) -> VerditeResult<()>;

    /// Total frame count of the stream.
    fn frame_count(&self) -> u64;

    /// Nominal frame rate of the stream.
    fn fps(&self) -> Fps;
}

/// An in-memory frame source, used by tests and for pre-decoded inputs
/// (e.g. GIF frames).
#[derive(Clone, Debug)]
pub struct MemorySource {
    frames: Vec<Frame>,
    fps: Fps,
    cursor: usize,
}

impl MemorySource {
    /// Wrap a list of frames at a nominal rate.
    pub fn new(frames: Vec<Frame>, fps: Fps) -> Self {
        Self {
            frames,
            fps,
            cursor: 0,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> VerditeResult<Option<Frame>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn reset(&mut self) -> VerditeResult<()> {
        self.cursor = 0;
        Ok(())
    }

    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn fps(&self) -> Fps {
        self.fps
    }
}

/// Plays a list of sources back to back as one stream.
///
/// Every frame is resized to the raster of the first delivered frame, so a
/// mixed-resolution folder concatenates cleanly. The rate is taken from
/// the first source.
pub struct ConcatSource {
    sources: Vec<Box<dyn FrameSource>>,
    active: usize,
    raster: Option<(u32, u32)>,
    fps: Fps,
}

impl ConcatSource {
    /// Build from a non-empty source list.
    pub fn new(sources: Vec<Box<dyn FrameSource>>) -> VerditeResult<Self> {
        if sources.is_empty() {
            return Err(crate::VerditeError::validation(
                "concat source needs at least one input",
            ));
        }
        let fps = sources[0].fps();
        Ok(Self {
            sources,
            active: 0,
            raster: None,
            fps,
        })
    }
}

impl FrameSource for ConcatSource {
    fn next_frame(&mut self) -> VerditeResult<Option<Frame>> {
        while self.active < self.sources.len() {
            match self.sources[self.active].next_frame()? {
                Some(frame) => {
                    let (w, h) = *self.raster.get_or_insert((frame.width(), frame.height()));
                    let frame = if frame.width() != w || frame.height() != h {
                        resize_frame(&frame, w, h)?
                    } else {
                        frame
                    };
                    return Ok(Some(frame));
                }
                None => self.active += 1,
            }
        }
        Ok(None)
    }

    fn reset(&mut self) -> VerditeResult<()> {
        for source in &mut self.sources {
            source.reset()?;
        }
        self.active = 0;
        Ok(())
    }

    fn frame_count(&self) -> u64 {
        self.sources.iter().map(|s| s.frame_count()).sum()
    }

    fn fps(&self) -> Fps {
        self.fps
    }
}
