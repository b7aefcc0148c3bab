use std::path::Path;

use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};

/// Decode the image at `path` into an RGB buffer at its native size.
pub(crate) fn decode_rgb(path: &Path) -> ReelResult<ImageBuffer> {
    let dyn_img = image::open(path)
        .map_err(|e| ReelError::asset(format!("decode image '{}': {e}", path.display())))?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    ImageBuffer::from_raw(Size::new(width, height), PixelFormat::Rgb8, rgb.into_raw())
}

/// Decode `path` and fit it to `size`.
pub(crate) fn decode_fitted(path: &Path, size: Size) -> ReelResult<ImageBuffer> {
    let img = decode_rgb(path)?;
    if img.size().is_empty() {
        return Err(ReelError::asset(format!(
            "image '{}' has no pixels",
            path.display()
        )));
    }
    Ok(img.fit(size))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
