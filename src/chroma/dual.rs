use std::path::Path;

use crate::chroma::composite::composite_region;
use crate::chroma::fit::{blob_region, fit_source};
use crate::chroma::mask::detect_mask;
use crate::foundation::core::{AlphaMatte, Frame, Region};
use crate::foundation::error::VerditeResult;
use crate::raster::contour::find_blobs;
use crate::template::acquire::acquire_template;

/// Two green-screen regions of one template, labeled by vertical position.
///
/// The region whose bounding box sits higher on screen is `top` and
/// receives the first source; the other is `bottom`. This assignment is a
/// fixed convention, not configurable — callers who need confirmation can
/// inspect the public rects before compositing.
#[derive(Clone, Debug)]
pub struct DualRegionAssignment {
    /// Region for the first source (visually higher).
    pub top: Region,
    /// Region for the second source (visually lower).
    pub bottom: Region,
    top_matte: AlphaMatte,
    bottom_matte: AlphaMatte,
}

/// Human-readable result of a dual-template pre-flight check.
#[derive(Clone, Debug)]
pub struct DualTemplateReport {
    /// Whether the template is usable for dual-region composition.
    pub passed: bool,
    /// Pass or fail explanation for the user.
    pub message: String,
}

/// Detect exactly two green-screen regions in a template.
///
/// Returns `None` when fewer than two blobs are present. With two or more,
/// the two largest by area are kept and assigned by bounding-box y.
pub fn detect_dual_regions(template: &Frame) -> VerditeResult<Option<DualRegionAssignment>> {
    let mask = detect_mask(template)?;
    let mut blobs = find_blobs(&mask);
    if blobs.len() < 2 {
        return Ok(None);
    }

    blobs.sort_by(|a, b| b.area.cmp(&a.area));
    let (first, second) = (&blobs[0], &blobs[1]);

    let (top_blob, bottom_blob) = if first.rect.y < second.rect.y {
        (first, second)
    } else {
        (second, first)
    };

    let (top, top_matte) = blob_region(top_blob)?;
    let (bottom, bottom_matte) = blob_region(bottom_blob)?;
    Ok(Some(DualRegionAssignment {
        top,
        bottom,
        top_matte,
        bottom_matte,
    }))
}

/// Pre-flight gate for dual-region templates: loads the file, runs
/// detection, and reports pass/fail in prose. Never panics; any load or
/// detection error becomes a failed report.
pub fn validate_dual_template(path: &Path) -> DualTemplateReport {
    let stream = match acquire_template(path) {
        Ok(stream) => stream,
        Err(e) => {
            return DualTemplateReport {
                passed: false,
                message: format!("could not load template: {e}"),
            };
        }
    };

    match detect_dual_regions(stream.cycle_frame(0)) {
        Ok(Some(assignment)) => DualTemplateReport {
            passed: true,
            message: format!(
                "dual green-screen template validated: top region at ({}, {}), bottom region at ({}, {})",
                assignment.top.rect.x,
                assignment.top.rect.y,
                assignment.bottom.rect.x,
                assignment.bottom.rect.y
            ),
        },
        Ok(None) => DualTemplateReport {
            passed: false,
            message: "template must have exactly 2 green-screen areas".to_string(),
        },
        Err(e) => DualTemplateReport {
            passed: false,
            message: format!("error validating template: {e}"),
        },
    }
}

/// Composite up to two sources into their assigned template regions in one
/// pass.
///
/// An absent source leaves the template content showing through for that
/// region. If blending either region fails, the whole composite fails
/// closed and the unmodified template is returned — never a partially
/// blended frame.
pub fn composite_dual(
    template: &Frame,
    source_a: Option<&Frame>,
    source_b: Option<&Frame>,
    assignment: &DualRegionAssignment,
) -> Frame {
    match try_composite_dual(template, source_a, source_b, assignment) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("dual composite failed, keeping template unmodified: {e}");
            template.clone()
        }
    }
}

pub(crate) fn try_composite_dual(
    template: &Frame,
    source_a: Option<&Frame>,
    source_b: Option<&Frame>,
    assignment: &DualRegionAssignment,
) -> VerditeResult<Frame> {
    let mut out = template.clone();

    if let Some(source) = source_a {
        let fitted = fit_source(source, &assignment.top, &assignment.top_matte)?;
        out = composite_region(&out, &fitted, &assignment.top, &assignment.top_matte)?;
    }
    if let Some(source) = source_b {
        let fitted = fit_source(source, &assignment.bottom, &assignment.bottom_matte)?;
        out = composite_region(&out, &fitted, &assignment.bottom, &assignment.bottom_matte)?;
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/dual.rs"]
mod tests;
