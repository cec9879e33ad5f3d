//! Verdite is a bulk green-screen compositing engine for 9:16 vertical
//! video.
//!
//! The pipeline turns decoded source frames and a template into composited
//! output frames:
//!
//! 1. **Acquire**: a template file (image, GIF, or video) becomes a
//!    restartable [`TemplateStream`]
//! 2. **Detect**: [`detect_mask`] marks the template's green-screen pixels;
//!    [`detect_dual_regions`] finds two independent regions
//! 3. **Fit**: [`fit_to_mask`] shapes a source frame to the largest region
//!    and builds its blend matte
//! 4. **Composite**: [`composite_region`], [`composite_blur`], or
//!    [`composite_dual`] produce the output frame
//! 5. **Drive**: the `drive_*` functions iterate sources against templates
//!    and hand frames to a [`FrameSink`] (e.g. [`Mp4Writer`])
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Value semantics**: compositors always return a new [`Frame`].
//! - **Degrade, don't abort**: one bad frame never kills a file, one bad
//!   file never kills a batch (see [`run_batch`]).
//! - **Layer order**: background, then source replacement, then overlay —
//!   text is never blended into the replacement.
//! - All media I/O goes through the system `ffmpeg`/`ffprobe` binaries
//!   over pipes; nothing links native codec libraries.
#![forbid(unsafe_code)]

mod chroma;
mod composition;
mod driver;
mod effects;
mod foundation;
mod media;
mod raster;
mod template;

pub use chroma::composite::{composite_region, replace_green_screen, replace_with_region};
pub use chroma::dual::{
    DualRegionAssignment, DualTemplateReport, composite_dual, detect_dual_regions,
    validate_dual_template,
};
pub use chroma::fit::{fit_source, fit_to_mask, primary_region};
pub use chroma::mask::detect_mask;
pub use composition::settings::{
    AudioMode, AudioSettings, BlurSettings, EncoderSettings, TextSettings,
};
pub use driver::batch::{BatchReport, CancelFlag, run_batch};
pub use driver::overlay::FrameOverlay;
pub use driver::sequence::{
    DEFAULT_STILL_DURATION_SECS, DriveOpts, DriveStats, drive_blur, drive_dual,
    drive_green_screen, drive_looped, drive_still_image, drive_video_template,
};
pub use driver::sink::{FrameSink, MemorySink};
pub use driver::source::{ConcatSource, FrameSource, MemorySource};
pub use effects::blur_background::{
    DEFAULT_BLUR_STRENGTH, composite_blur, effective_blur_kernel, optimal_crop,
};
pub use foundation::core::{
    AlphaMatte, Fps, Frame, Mask, OUTPUT_HEIGHT, OUTPUT_WIDTH, Rect, Region,
};
pub use foundation::error::{VerditeError, VerditeResult};
pub use media::probe::{VideoInfo, probe_video};
pub use media::reader::{VideoReader, decode_frame_at};
pub use media::writer::{
    EncodeConfig, Mp4Writer, default_mp4_config, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use template::acquire::acquire_template;
pub use template::cycle::VideoTemplateCycler;
pub use template::stream::{MIN_FRAME_MS, STATIC_FRAME_MS, TemplateStream};
