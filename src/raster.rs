pub(crate) mod blur;
pub(crate) mod contour;
pub(crate) mod hsv;
pub(crate) mod morph;
pub(crate) mod resize;
