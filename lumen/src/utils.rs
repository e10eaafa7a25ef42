/// Pixel encodings and frame statistics.
pub mod image;
