use crate::foundation::color::Rgb8;
use crate::foundation::error::ReelResult;
use crate::raster::buffer::{ImageBuffer, PixelFormat};
use crate::raster::keeper::KeeperId;
use crate::raster::ops::composite;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Paste a foreground over a background through a mask.
#[derive(Clone, Debug)]
pub struct MaskFx {
    pub(crate) foreground: Source,
    pub(crate) background: Source,
    pub(crate) mask: Source,
    pub(crate) output: KeeperId,
}

impl MaskFx {
    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let fore = ctx.read(&self.foreground, local)?;
        let mut bg = ctx.read(&self.background, local)?;
        let mask = ctx.read(&self.mask, local)?;
        // The pasted region is the mask's own extent, anchored at the origin.
        bg.paste_masked(&fore, 0, 0, &mask);
        ctx.write(self.output, bg)
    }
}

/// Duotone: the input's luminance selects between two flat colors.
#[derive(Clone, Debug)]
pub struct ColorScaleFx {
    pub(crate) input: Source,
    pub(crate) background: Rgb8,
    pub(crate) foreground: Rgb8,
    pub(crate) output: KeeperId,
}

impl ColorScaleFx {
    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let input = ctx.read(&self.input, local)?;
        let luminance = input.convert(PixelFormat::Luma8);
        let back = ImageBuffer::filled(input.size(), self.background, PixelFormat::Rgb8);
        let fore = ImageBuffer::filled(input.size(), self.foreground, PixelFormat::Rgb8);
        // Bright input pixels take the background color.
        let out = composite(&back, &fore, &luminance)?;
        ctx.write(self.output, out)
    }
}
