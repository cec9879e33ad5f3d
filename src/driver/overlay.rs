use crate::foundation::core::Frame;
use crate::foundation::error::VerditeResult;

/// A collaborator that decorates composited frames (typically text
/// rendering, which lives outside this crate).
///
/// The driver applies the overlay strictly after compositing and before
/// the sink, so decoration is never blended into or obscured by the
/// green-screen replacement. Layer order is always background, then source
/// replacement, then overlay.
pub trait FrameOverlay {
    /// Decorate one output frame.
    fn apply(&self, frame: Frame) -> VerditeResult<Frame>;
}
