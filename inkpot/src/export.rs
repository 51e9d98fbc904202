//! PNG export through the `image` crate.

use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageFormat, RgbaImage};

use crate::error::RenderResult;

/// Encode tightly packed RGBA bytes as a PNG file at `path`.
pub fn encode_png(path: impl AsRef<Path>, width: usize, height: usize, rgba: Vec<u8>) -> RenderResult<()> {
    let path = path.as_ref();
    let img = RgbaImage::from_raw(width as u32, height as u32, rgba).ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
    })?;
    img.save_with_format(path, ImageFormat::Png)?;
    tracing::info!("Exported {}x{} image to {:?}", width, height, path);
    Ok(())
}
