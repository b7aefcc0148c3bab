use std::path::Path;

use crate::assets::decode::decode_fitted;
use crate::assets::template::PathTemplate;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};
use crate::raster::source::ImageSource;

/// Post-processing that turns a decoded image into a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaskView {
    /// Invert before converting.
    #[serde(default)]
    pub invert: bool,
    /// Target format.
    #[serde(default = "MaskView::default_format")]
    pub format: PixelFormat,
}

impl MaskView {
    /// Luminance mask, optionally inverted.
    pub fn luma(invert: bool) -> Self {
        Self {
            invert,
            format: PixelFormat::Luma8,
        }
    }

    fn default_format() -> PixelFormat {
        PixelFormat::Luma8
    }

    fn apply(self, img: ImageBuffer) -> ImageBuffer {
        if self.invert {
            img.inverted().convert(self.format)
        } else {
            img.convert(self.format)
        }
    }
}

/// A single flat color.
#[derive(Clone, Debug)]
pub struct ColorSource {
    image: ImageBuffer,
}

impl ColorSource {
    /// RGB fill.
    pub fn new(size: Size, color: Rgb8) -> Self {
        Self::with_format(size, color, PixelFormat::Rgb8)
    }

    /// Fill stored in `format`, e.g. a pure white or black luminance mask.
    pub fn with_format(size: Size, color: Rgb8, format: PixelFormat) -> Self {
        Self {
            image: ImageBuffer::filled(size, color, format),
        }
    }
}

impl ImageSource for ColorSource {
    fn size(&self) -> Size {
        self.image.size()
    }

    fn image(&self, _frame: u64) -> ReelResult<ImageBuffer> {
        Ok(self.image.clone())
    }
}

/// One decoded image returned for every frame.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    image: ImageBuffer,
}

impl StillImageSource {
    /// Decode `path` once and fit it to `size`, applying `mask` when given.
    pub fn open(path: impl AsRef<Path>, size: Size, mask: Option<MaskView>) -> ReelResult<Self> {
        let path = path.as_ref();
        let img = decode_fitted(path, size)?;
        let image = match mask {
            Some(view) => view.apply(img),
            None => img,
        };
        tracing::debug!(path = %path.display(), %size, "loaded still image");
        Ok(Self { image })
    }
}

impl ImageSource for StillImageSource {
    fn size(&self) -> Size {
        self.image.size()
    }

    fn image(&self, _frame: u64) -> ReelResult<ImageBuffer> {
        Ok(self.image.clone())
    }
}

/// Numbered image files addressed by a [`PathTemplate`], starting at 1.
///
/// The sequence length is counted when the source is opened. Frames past the end
/// wrap around, so frame `n` reads file `((n - 1) mod len) + 1`.
#[derive(Clone, Debug)]
pub struct FrameSequenceSource {
    template: PathTemplate,
    size: Size,
    len: u64,
    mask: Option<MaskView>,
}

impl FrameSequenceSource {
    /// Count the files matching `template` and prepare to decode them at `size`.
    pub fn open(template: PathTemplate, size: Size, mask: Option<MaskView>) -> ReelResult<Self> {
        let mut len = 0u64;
        while template.render(len + 1).is_file() {
            len += 1;
        }
        if len == 0 {
            return Err(ReelError::asset(format!(
                "no frames found at '{}'",
                template.render(1).display()
            )));
        }
        tracing::debug!(first = %template.render(1).display(), len, "opened frame sequence");
        Ok(Self {
            template,
            size,
            len,
            mask,
        })
    }

    /// Number of files in the sequence.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Always `false`; opening fails on an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// File number actually read for frame `n`.
    pub fn file_index(&self, n: u64) -> u64 {
        n.saturating_sub(1) % self.len + 1
    }
}

impl ImageSource for FrameSequenceSource {
    fn size(&self) -> Size {
        self.size
    }

    fn image(&self, frame: u64) -> ReelResult<ImageBuffer> {
        let path = self.template.render(self.file_index(frame));
        let img = decode_fitted(&path, self.size)?;
        Ok(match self.mask {
            Some(view) => view.apply(img),
            None => img,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sources.rs"]
mod tests;
