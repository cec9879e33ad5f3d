pub(crate) mod blur_background;
