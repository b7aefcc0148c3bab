use rayon::prelude::*;

use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{lerp_u8, mask_mix};
use crate::raster::buffer::{ImageBuffer, PixelFormat};

impl ImageBuffer {
    /// Center-crop to the aspect ratio of `size`, then resample to `size`.
    ///
    /// Resampling is nearest-neighbour. Targets with a zero dimension produce an
    /// empty buffer, which pastes as a no-op.
    pub fn fit(&self, size: Size) -> ImageBuffer {
        self.fit_visible(size, size.width)
    }

    /// Leftmost `visible` columns of [`ImageBuffer::fit`] to `size`. Columns past
    /// `visible` are never allocated.
    pub(crate) fn fit_visible(&self, size: Size, visible: u32) -> ImageBuffer {
        let visible = visible.min(size.width);
        if size == self.size() && visible == size.width {
            return self.clone();
        }
        let mut out = ImageBuffer::new(Size::new(visible, size.height), self.format());
        if size.is_empty() || self.size().is_empty() || visible == 0 {
            return out;
        }

        let (sw, sh) = (self.width(), self.height());
        let target_aspect = f64::from(size.width) / f64::from(size.height);
        let src_aspect = f64::from(sw) / f64::from(sh);
        let (crop_w, crop_h) = if src_aspect >= target_aspect {
            ((target_aspect * f64::from(sh) + 0.5) as u32, sh)
        } else {
            (sw, (f64::from(sw) / target_aspect + 0.5) as u32)
        };
        let crop_w = crop_w.clamp(1, sw);
        let crop_h = crop_h.clamp(1, sh);
        let left = (sw - crop_w) / 2;
        let top = (sh - crop_h) / 2;

        let ch = self.format().channels();
        let src_stride = self.stride();
        let dst_stride = out.stride();
        let xs: Vec<usize> = (0..visible)
            .map(|x| {
                let sx = ((f64::from(x) + 0.5) * f64::from(crop_w) / f64::from(size.width)) as u32;
                (left + sx.min(crop_w - 1)) as usize * ch
            })
            .collect();

        let src = self.as_bytes();
        for (y, row) in out.as_bytes_mut().chunks_exact_mut(dst_stride).enumerate() {
            let sy = ((y as f64 + 0.5) * f64::from(crop_h) / f64::from(size.height)) as u32;
            let sy = (top + sy.min(crop_h - 1)) as usize;
            let src_row = &src[sy * src_stride..(sy + 1) * src_stride];
            for (dst_px, &sx) in row.chunks_exact_mut(ch).zip(&xs) {
                dst_px.copy_from_slice(&src_row[sx..sx + ch]);
            }
        }
        out
    }

    /// Copy `src` into this buffer with its top-left corner at `(x0, y0)`.
    ///
    /// `src` is converted to this buffer's format; the region is clipped to bounds.
    pub fn paste(&mut self, src: &ImageBuffer, x0: u32, y0: u32) {
        let src = src.convert(self.format());
        let Some((w, h)) = self.clip(src.size(), x0, y0) else {
            return;
        };
        let ch = self.format().channels();
        let (src_stride, dst_stride) = (src.stride(), self.stride());
        let row_bytes = w as usize * ch;
        let dst = self.as_bytes_mut();
        for y in 0..h as usize {
            let s = y * src_stride;
            let d = (y0 as usize + y) * dst_stride + x0 as usize * ch;
            dst[d..d + row_bytes].copy_from_slice(&src.as_bytes()[s..s + row_bytes]);
        }
    }

    /// Paste `src` at `(x0, y0)` using `mask` as per-pixel alpha.
    ///
    /// The mask is read as luminance and is aligned with `src`; the affected
    /// region is the overlap of `src`, `mask` and this buffer.
    pub fn paste_masked(&mut self, src: &ImageBuffer, x0: u32, y0: u32, mask: &ImageBuffer) {
        let src = src.convert(self.format());
        let mask = mask.convert(PixelFormat::Luma8);
        let region = Size::new(
            src.width().min(mask.width()),
            src.height().min(mask.height()),
        );
        let Some((w, h)) = self.clip(region, x0, y0) else {
            return;
        };
        let ch = self.format().channels();
        let (src_stride, mask_stride, dst_stride) = (src.stride(), mask.stride(), self.stride());
        let dst = self.as_bytes_mut();
        for y in 0..h as usize {
            let s_row = &src.as_bytes()[y * src_stride..];
            let m_row = &mask.as_bytes()[y * mask_stride..];
            let d = (y0 as usize + y) * dst_stride + x0 as usize * ch;
            let d_row = &mut dst[d..d + w as usize * ch];
            for (x, d_px) in d_row.chunks_exact_mut(ch).enumerate() {
                let m = m_row[x];
                if m == 0 {
                    continue;
                }
                for (c, d_v) in d_px.iter_mut().enumerate() {
                    *d_v = mask_mix(s_row[x * ch + c], *d_v, m);
                }
            }
        }
    }

    fn clip(&self, region: Size, x0: u32, y0: u32) -> Option<(u32, u32)> {
        if x0 >= self.width() || y0 >= self.height() || region.is_empty() {
            return None;
        }
        Some((
            region.width.min(self.width() - x0),
            region.height.min(self.height() - y0),
        ))
    }
}

/// Interpolate `a` towards `b` by `alpha` (`0` yields `a`, `1` yields `b`).
///
/// `b` is converted to `a`'s format; both must share a size.
pub fn blend(a: &ImageBuffer, b: &ImageBuffer, alpha: f64) -> ReelResult<ImageBuffer> {
    if a.size() != b.size() {
        return Err(ReelError::evaluation(format!(
            "blend expects equal sizes, got {} and {}",
            a.size(),
            b.size()
        )));
    }
    let b = b.convert(a.format());
    let mut out = a.clone();
    out.as_bytes_mut()
        .par_iter_mut()
        .zip(b.as_bytes().par_iter())
        .for_each(|(o, &bv)| *o = lerp_u8(*o, bv, alpha));
    Ok(out)
}

/// Take `image1` where `mask` is white and `image2` where it is black.
pub fn composite(
    image1: &ImageBuffer,
    image2: &ImageBuffer,
    mask: &ImageBuffer,
) -> ReelResult<ImageBuffer> {
    if image1.size() != image2.size() || image1.size() != mask.size() {
        return Err(ReelError::evaluation(
            "composite expects image1, image2 and mask of equal size",
        ));
    }
    let mut out = image2.clone();
    out.paste_masked(image1, 0, 0, mask);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/ops.rs"]
mod tests;
