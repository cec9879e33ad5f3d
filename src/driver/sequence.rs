use rayon::prelude::*;

use crate::chroma::composite::{replace_green_screen, replace_with_region};
use crate::chroma::dual::{detect_dual_regions, try_composite_dual};
use crate::chroma::fit::primary_region;
use crate::chroma::mask::detect_mask;
use crate::composition::settings::BlurSettings;
use crate::driver::overlay::FrameOverlay;
use crate::driver::sink::FrameSink;
use crate::driver::source::FrameSource;
use crate::effects::blur_background::composite_blur;
use crate::foundation::core::{AlphaMatte, Fps, Frame, OUTPUT_HEIGHT, OUTPUT_WIDTH, Region};
use crate::foundation::error::{VerditeError, VerditeResult};
use crate::raster::resize::resize_frame;
use crate::template::cycle::VideoTemplateCycler;
use crate::template::stream::TemplateStream;

/// Default synthesized duration for a still-image input.
pub const DEFAULT_STILL_DURATION_SECS: f64 = 5.0;

const PARALLEL_CHUNK: usize = 64;
const SUBSTITUTE_WIDTH: u32 = 640;
const SUBSTITUTE_HEIGHT: u32 = 480;

/// Per-drive configuration.
///
/// The output raster and the optional overlay collaborator are explicit,
/// caller-constructed values; there is no process-wide output config.
pub struct DriveOpts<'a> {
    /// Output raster width.
    pub width: u32,
    /// Output raster height.
    pub height: u32,
    /// Decorator applied after compositing, before the sink (typically
    /// text rendering).
    pub overlay: Option<&'a dyn FrameOverlay>,
    /// Composite independent frames in parallel where the pipeline is
    /// stateless. Output ordering is preserved either way.
    pub parallel: bool,
}

impl Default for DriveOpts<'_> {
    fn default() -> Self {
        Self {
            width: OUTPUT_WIDTH,
            height: OUTPUT_HEIGHT,
            overlay: None,
            parallel: false,
        }
    }
}

/// Outcome counters for one drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Frames that composited cleanly.
    pub frames_composited: u64,
    /// Frames where the compositor failed and the raw source (or the bare
    /// template, in dual mode) was substituted.
    pub frames_degraded: u64,
}

// Static templates amortize detection: the resized template and its
// region/matte are computed once and reused for every source frame.
// Multi-frame templates recompute per frame, since the mask can change.
struct TemplateComposer<'t> {
    stream: &'t TemplateStream,
    width: u32,
    height: u32,
    cached: Option<(Frame, Option<(Region, AlphaMatte)>)>,
}

impl<'t> TemplateComposer<'t> {
    fn new(stream: &'t TemplateStream, width: u32, height: u32) -> VerditeResult<Self> {
        let cached = if stream.is_static() {
            let resized = resize_frame(stream.cycle_frame(0), width, height)?;
            let mask = detect_mask(&resized)?;
            let region = primary_region(&mask)?;
            Some((resized, region))
        } else {
            None
        };
        Ok(Self {
            stream,
            width,
            height,
            cached,
        })
    }

    fn compose(&self, index: u64, source: &Frame) -> VerditeResult<Frame> {
        match &self.cached {
            Some((template, Some((region, matte)))) => {
                replace_with_region(template, source, region, matte)
            }
            // Degenerate template without a detectable region: a full-frame
            // opaque blend, which is the source scaled to the output.
            Some((_, None)) => resize_frame(source, self.width, self.height),
            None => {
                let template =
                    resize_frame(self.stream.cycle_frame(index), self.width, self.height)?;
                replace_green_screen(&template, source)
            }
        }
    }
}

/// Composite a video against a template stream until the input ends.
///
/// A multi-frame template cycles independently of the input's length: a
/// template shorter than the video repeats, a longer one is simply never
/// fully played. Per-frame composite errors never abort the drive; the
/// frame degrades to the raw source scaled to the output raster.
#[tracing::instrument(skip_all)]
pub fn drive_green_screen(
    source: &mut dyn FrameSource,
    template: &TemplateStream,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    let composer = TemplateComposer::new(template, opts.width, opts.height)?;
    if opts.parallel && template.is_static() {
        return drive_static_parallel(source, &composer, sink, opts);
    }
    run_to_source_end(source, sink, opts, |index, src| composer.compose(index, src))
}

/// Composite a video over a blurred copy of itself until the input ends.
#[tracing::instrument(skip_all)]
pub fn drive_blur(
    source: &mut dyn FrameSource,
    settings: &BlurSettings,
    blur_strength: u32,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    settings.validate()?;
    run_to_source_end(source, sink, opts, |_, src| {
        composite_blur(src, settings, opts.width, opts.height, blur_strength)
    })
}

/// Composite a (possibly concatenated) input against a template for an
/// exact target duration, rewinding the input to frame 0 whenever it runs
/// out. Guarantees the output length matches an externally supplied audio
/// duration.
#[tracing::instrument(skip_all)]
pub fn drive_looped(
    source: &mut dyn FrameSource,
    template: &TemplateStream,
    sink: &mut dyn FrameSink,
    target_duration_secs: f64,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    if !target_duration_secs.is_finite() || target_duration_secs <= 0.0 {
        return Err(VerditeError::validation(
            "target duration must be a positive number of seconds",
        ));
    }

    let target_frames = source.fps().secs_to_frames_floor(target_duration_secs);
    let composer = TemplateComposer::new(template, opts.width, opts.height)?;

    let mut stats = DriveStats::default();
    let mut index = 0u64;
    while index < target_frames {
        let frame = match source.next_frame()? {
            Some(frame) => frame,
            None => {
                source.reset()?;
                match source.next_frame()? {
                    Some(frame) => {
                        tracing::debug!("looping input to fill target duration");
                        frame
                    }
                    None => break,
                }
            }
        };
        write_composed(index, &frame, sink, opts, &mut stats, |i, src| {
            composer.compose(i, src)
        })?;
        index += 1;
    }
    Ok(stats)
}

/// Synthesize a fixed-length clip from a single still image, writing
/// `fps * duration` composited frames.
#[tracing::instrument(skip_all)]
pub fn drive_still_image(
    image: &Frame,
    template: &TemplateStream,
    sink: &mut dyn FrameSink,
    duration_secs: f64,
    fps: Fps,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(VerditeError::validation(
            "still-image duration must be a positive number of seconds",
        ));
    }

    let total = fps.secs_to_frames_floor(duration_secs).max(1);
    let composer = TemplateComposer::new(template, opts.width, opts.height)?;
    let mut stats = DriveStats::default();

    if template.is_static() {
        // The composited frame never changes; build it once.
        let out = match composer.compose(0, image) {
            Ok(out) => {
                stats.frames_composited = total;
                out
            }
            Err(e) => {
                tracing::warn!("still-image composite failed, writing source image: {e}");
                stats.frames_degraded = total;
                resize_frame(image, opts.width, opts.height)?
            }
        };
        for _ in 0..total {
            finish_frame(out.clone(), sink, opts)?;
            stats.frames_written += 1;
        }
        return Ok(stats);
    }

    for index in 0..total {
        write_composed(index, image, sink, opts, &mut stats, |i, src| {
            composer.compose(i, src)
        })?;
    }
    Ok(stats)
}

/// Composite a video against a cycling video template, re-reading the
/// template at rotating frame indices.
#[tracing::instrument(skip_all)]
pub fn drive_video_template(
    source: &mut dyn FrameSource,
    cycler: &VideoTemplateCycler,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    run_to_source_end(source, sink, opts, |index, src| {
        let template = cycler.frame_at(index)?;
        let template = resize_frame(&template, opts.width, opts.height)?;
        replace_green_screen(&template, src)
    })
}

/// Composite two independent sources into a dual-region template.
///
/// Both streams advance together; an exhausted stream rewinds and keeps
/// playing, so the longer stream sets the output length. A stream that
/// transiently fails to restart is substituted with an all-black frame to
/// keep writer timing intact. Detection failure (fewer than two regions)
/// fails fast before any frame is written.
#[tracing::instrument(skip_all)]
pub fn drive_dual(
    source_a: &mut dyn FrameSource,
    source_b: &mut dyn FrameSource,
    template: &Frame,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    let template = resize_frame(template, opts.width, opts.height)?;
    let Some(assignment) = detect_dual_regions(&template)? else {
        return Err(VerditeError::validation(
            "dual-region composition requires a template with two green-screen areas",
        ));
    };

    let total = source_a.frame_count().max(source_b.frame_count());
    let mut stats = DriveStats::default();
    let mut raster_a = (SUBSTITUTE_WIDTH, SUBSTITUTE_HEIGHT);
    let mut raster_b = (SUBSTITUTE_WIDTH, SUBSTITUTE_HEIGHT);

    for index in 0..total {
        let frame_a = read_looping(source_a);
        let frame_b = read_looping(source_b);
        if frame_a.is_none() && frame_b.is_none() {
            break;
        }

        if let Some(f) = &frame_a {
            raster_a = (f.width(), f.height());
        }
        if let Some(f) = &frame_b {
            raster_b = (f.width(), f.height());
        }
        let frame_a = match frame_a {
            Some(f) => f,
            None => Frame::black(raster_a.0, raster_a.1)?,
        };
        let frame_b = match frame_b {
            Some(f) => f,
            None => Frame::black(raster_b.0, raster_b.1)?,
        };

        let out = match try_composite_dual(&template, Some(&frame_a), Some(&frame_b), &assignment) {
            Ok(out) => {
                stats.frames_composited += 1;
                out
            }
            Err(e) => {
                // Fail closed: never write a partially blended frame.
                tracing::warn!("frame {index} dual composite failed, writing bare template: {e}");
                stats.frames_degraded += 1;
                template.clone()
            }
        };
        finish_frame(out, sink, opts)?;
        stats.frames_written += 1;
    }
    Ok(stats)
}

fn run_to_source_end(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
    mut compose: impl FnMut(u64, &Frame) -> VerditeResult<Frame>,
) -> VerditeResult<DriveStats> {
    let mut stats = DriveStats::default();
    let mut index = 0u64;
    while let Some(frame) = source.next_frame()? {
        write_composed(index, &frame, sink, opts, &mut stats, &mut compose)?;
        index += 1;
    }
    Ok(stats)
}

fn write_composed(
    index: u64,
    source: &Frame,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
    stats: &mut DriveStats,
    mut compose: impl FnMut(u64, &Frame) -> VerditeResult<Frame>,
) -> VerditeResult<()> {
    let out = match compose(index, source) {
        Ok(out) => {
            stats.frames_composited += 1;
            out
        }
        Err(e) => {
            tracing::warn!("frame {index} composite failed, writing source frame: {e}");
            stats.frames_degraded += 1;
            resize_frame(source, opts.width, opts.height)?
        }
    };
    finish_frame(out, sink, opts)?;
    stats.frames_written += 1;
    Ok(())
}

fn finish_frame(mut frame: Frame, sink: &mut dyn FrameSink, opts: &DriveOpts<'_>) -> VerditeResult<()> {
    if let Some(overlay) = opts.overlay {
        match overlay.apply(frame.clone()) {
            Ok(decorated) => frame = decorated,
            Err(e) => tracing::warn!("overlay failed, writing undecorated frame: {e}"),
        }
    }
    if frame.width() != opts.width || frame.height() != opts.height {
        frame = resize_frame(&frame, opts.width, opts.height)?;
    }
    sink.write_frame(&frame)
}

// Chunked parallel composite for the stateless static-template path. Reads
// a chunk sequentially, fans the composites out, then writes in order.
fn drive_static_parallel(
    source: &mut dyn FrameSource,
    composer: &TemplateComposer<'_>,
    sink: &mut dyn FrameSink,
    opts: &DriveOpts<'_>,
) -> VerditeResult<DriveStats> {
    let (width, height) = (opts.width, opts.height);
    let mut stats = DriveStats::default();
    let mut base = 0u64;
    loop {
        let mut chunk = Vec::with_capacity(PARALLEL_CHUNK);
        while chunk.len() < PARALLEL_CHUNK {
            match source.next_frame()? {
                Some(frame) => chunk.push(frame),
                None => break,
            }
        }
        if chunk.is_empty() {
            break;
        }
        let short_chunk = chunk.len() < PARALLEL_CHUNK;

        let composed = chunk
            .par_iter()
            .enumerate()
            .map(|(k, src)| {
                let index = base + k as u64;
                match composer.compose(index, src) {
                    Ok(out) => Ok((out, false)),
                    Err(e) => {
                        tracing::warn!(
                            "frame {index} composite failed, writing source frame: {e}"
                        );
                        resize_frame(src, width, height).map(|f| (f, true))
                    }
                }
            })
            .collect::<VerditeResult<Vec<_>>>()?;

        for (out, degraded) in composed {
            if degraded {
                stats.frames_degraded += 1;
            } else {
                stats.frames_composited += 1;
            }
            finish_frame(out, sink, opts)?;
            stats.frames_written += 1;
        }
        base += chunk.len() as u64;

        if short_chunk {
            break;
        }
    }
    Ok(stats)
}

// Rewind-and-retry read for looping pairings. Transient read or restart
// failures are logged and reported as a missing frame, not an abort.
fn read_looping(source: &mut dyn FrameSource) -> Option<Frame> {
    match source.next_frame() {
        Ok(Some(frame)) => Some(frame),
        Ok(None) => match source.reset().and_then(|()| source.next_frame()) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("source loop restart failed: {e}");
                None
            }
        },
        Err(e) => {
            tracing::warn!("source read failed: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/sequence.rs"]
mod tests;
