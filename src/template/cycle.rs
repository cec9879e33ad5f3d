use std::path::Path;

use crate::foundation::core::Frame;
use crate::foundation::error::{VerditeError, VerditeResult};
use crate::media::probe::{VideoInfo, probe_video};
use crate::media::reader::decode_frame_at;

/// Frame-by-frame access to a video template.
///
/// Unlike [`acquire_template`](crate::acquire_template), which takes only
/// a video's first frame, the cycler re-reads the file at rotating frame
/// indices so a video template can animate against a longer input stream.
pub struct VideoTemplateCycler {
    info: VideoInfo,
}

impl VideoTemplateCycler {
    /// Probe a video template for cycling. Zero-frame sources are a
    /// template error.
    pub fn open(path: &Path) -> VerditeResult<Self> {
        let info = probe_video(path).map_err(|e| {
            VerditeError::template(format!(
                "could not probe video template '{}': {e}",
                path.display()
            ))
        })?;
        if info.frame_count == 0 {
            return Err(VerditeError::template(format!(
                "video template '{}' has no frames",
                path.display()
            )));
        }
        Ok(Self { info })
    }

    /// Number of template frames in the cycle.
    pub fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    /// The template frame for output index `index`, cycling modulo the
    /// template length.
    pub fn frame_at(&self, index: u64) -> VerditeResult<Frame> {
        decode_frame_at(&self.info, index % self.info.frame_count)
    }
}
