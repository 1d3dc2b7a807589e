//! Decoding encoded images into opaque RGB pixel grids.

use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// Decode an in-memory image. Any alpha channel is dropped, not blended.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Read and decode an image file, format guessed from its contents.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let bytes = std::fs::read(path)?;
    decode_rgb(&bytes)
}
