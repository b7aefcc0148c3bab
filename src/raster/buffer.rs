use crate::foundation::color::Rgb8;
use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::luma;

/// Pixel layout of an [`ImageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Three interleaved channels, `r, g, b`.
    #[default]
    #[serde(alias = "rgb", alias = "RGB")]
    Rgb8,
    /// Single luminance channel, usable as an alpha mask.
    #[serde(alias = "luma", alias = "L")]
    Luma8,
    /// Single channel restricted to `0` and `255`.
    #[serde(alias = "1")]
    Bilevel,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Luma8 | Self::Bilevel => 1,
        }
    }
}

/// Fixed-size raster owning its pixels, row-major and tightly packed.
///
/// Buffers are handed out by value: every read from a keeper or source yields an
/// independent copy, so an effect may read and write the same keeper in one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    size: Size,
    format: PixelFormat,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Black (all zero) buffer.
    pub fn new(size: Size, format: PixelFormat) -> Self {
        Self {
            size,
            format,
            data: vec![0; size.pixel_count() * format.channels()],
        }
    }

    /// Buffer filled with a flat color. Single-channel formats store its luma.
    pub fn filled(size: Size, color: Rgb8, format: PixelFormat) -> Self {
        let data = match format {
            PixelFormat::Rgb8 => color.channels().repeat(size.pixel_count()),
            PixelFormat::Luma8 => vec![luma(color.r, color.g, color.b); size.pixel_count()],
            PixelFormat::Bilevel => {
                vec![bilevel(luma(color.r, color.g, color.b)); size.pixel_count()]
            }
        };
        Self { size, format, data }
    }

    /// Wrap raw bytes, validating their length against `size` and `format`.
    pub fn from_raw(size: Size, format: PixelFormat, data: Vec<u8>) -> ReelResult<Self> {
        let expected = size.pixel_count() * format.channels();
        if data.len() != expected {
            return Err(ReelError::configuration(format!(
                "raw {format:?} buffer for {size} must hold {expected} bytes, got {}",
                data.len()
            )));
        }
        let mut out = Self { size, format, data };
        if format == PixelFormat::Bilevel {
            out.data.iter_mut().for_each(|v| *v = bilevel(*v));
        }
        Ok(out)
    }

    /// Raster size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.size.width as usize * self.format.channels()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * self.format.channels()
    }

    /// Pixel at `(x, y)` expanded to RGB. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        assert!(x < self.size.width && y < self.size.height, "pixel out of bounds");
        let o = self.offset(x, y);
        match self.format {
            PixelFormat::Rgb8 => Rgb8::new(self.data[o], self.data[o + 1], self.data[o + 2]),
            PixelFormat::Luma8 | PixelFormat::Bilevel => {
                let v = self.data[o];
                Rgb8::new(v, v, v)
            }
        }
    }

    /// Overwrite the pixel at `(x, y)`. Panics when out of bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb8) {
        assert!(x < self.size.width && y < self.size.height, "pixel out of bounds");
        let o = self.offset(x, y);
        match self.format {
            PixelFormat::Rgb8 => self.data[o..o + 3].copy_from_slice(&color.channels()),
            PixelFormat::Luma8 => self.data[o] = luma(color.r, color.g, color.b),
            PixelFormat::Bilevel => self.data[o] = bilevel(luma(color.r, color.g, color.b)),
        }
    }

    /// Copy converted to `format`. Returns a plain clone when already in that format.
    pub fn convert(&self, format: PixelFormat) -> ImageBuffer {
        if format == self.format {
            return self.clone();
        }
        let data = match (self.format, format) {
            (PixelFormat::Rgb8, PixelFormat::Luma8) => self
                .data
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            (PixelFormat::Rgb8, PixelFormat::Bilevel) => self
                .data
                .chunks_exact(3)
                .map(|px| bilevel(luma(px[0], px[1], px[2])))
                .collect(),
            (PixelFormat::Luma8 | PixelFormat::Bilevel, PixelFormat::Rgb8) => {
                self.data.iter().flat_map(|&v| [v, v, v]).collect()
            }
            (PixelFormat::Luma8, PixelFormat::Bilevel) => {
                self.data.iter().map(|&v| bilevel(v)).collect()
            }
            // Bilevel values are already valid luminance.
            (PixelFormat::Bilevel, PixelFormat::Luma8) => self.data.clone(),
            _ => unreachable!("identical formats return early"),
        };
        ImageBuffer {
            size: self.size,
            format,
            data,
        }
    }

    /// Invert every channel in place (`255 - v`).
    pub fn invert_in_place(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 255 - *v);
    }

    /// Inverted copy.
    pub fn inverted(&self) -> ImageBuffer {
        let mut out = self.clone();
        out.invert_in_place();
        out
    }
}

pub(crate) fn bilevel(v: u8) -> u8 {
    if v >= 128 { 255 } else { 0 }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
