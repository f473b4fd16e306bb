pub mod blob;
pub mod blob_extractor;
pub mod blob_filter;
pub mod color_range;
pub mod enclosing_circle;
pub mod frame;
pub mod hsv_pixel;
pub mod label_font;
pub mod morphology;
