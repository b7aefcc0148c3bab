use crate::foundation::error::ReelResult;
use crate::raster::buffer::PixelFormat;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Publish a composited buffer as the controller's visible frame.
#[derive(Clone, Debug)]
pub struct CommitFx {
    pub(crate) input: Source,
}

impl CommitFx {
    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let frame = ctx.read(&self.input, local)?;
        ctx.commit(frame.convert(PixelFormat::Rgb8));
        Ok(())
    }
}
