use crate::foundation::core::{FrameRange, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::ImageBuffer;
use crate::raster::keeper::KeeperId;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Mosaic that shatters the output keeper into an ever finer grid of copies.
///
/// Progress advances by `iterations / duration` per call; the cut count is twice
/// its integer part. While the cut count is zero the keeper is left untouched.
#[derive(Clone, Debug)]
pub struct CollapsingSquaresFx {
    pub(crate) input: Source,
    pub(crate) output: KeeperId,
    step: f64,
    progress: f64,
}

impl CollapsingSquaresFx {
    pub(crate) fn new(
        range: FrameRange,
        input: Source,
        iterations: f64,
        output: KeeperId,
    ) -> ReelResult<Self> {
        if !iterations.is_finite() || iterations < 0.0 {
            return Err(ReelError::configuration(format!(
                "collapsing squares iterations must be finite and >= 0 (got {iterations})"
            )));
        }
        Ok(Self {
            input,
            output,
            step: iterations / range.len_frames() as f64,
            progress: 0.0,
        })
    }

    /// Squares per axis after the most recent call.
    pub fn cut_count(&self) -> u64 {
        (self.progress.trunc() as u64) * 2
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        self.progress += self.step;
        let cuts = self.cut_count();
        if cuts < 1 {
            return Ok(());
        }

        let size = ctx.size();
        // A cell must keep at least one pixel per axis.
        let n = cuts.min(u64::from(size.width.min(size.height))) as u32;
        let src = ctx.read(&self.input, local)?;
        let mut canvas = ctx.read(&Source::Keeper(self.output), local)?;
        let cell = src.fit(Size::new(size.width / n, size.height / n));
        tile_cells(&mut canvas, &cell, n);
        ctx.write(self.output, canvas)
    }
}

/// Cover `canvas` with an `n` by `n` grid of `cell`.
///
/// Tile edges sit at `i * extent / n`, so tiles absorb the remainder pixels and
/// the grid leaves no gaps.
pub(crate) fn tile_cells(canvas: &mut ImageBuffer, cell: &ImageBuffer, n: u32) {
    if n == 0 || cell.size().is_empty() || canvas.size().is_empty() {
        return;
    }
    let cell = cell.convert(canvas.format());
    let ch = canvas.format().channels();
    let axis = |extent: u32, cell_extent: u32| -> Vec<usize> {
        (0..extent)
            .map(|p| {
                let tile = u64::from(p) * u64::from(n) / u64::from(extent);
                let origin = (tile * u64::from(extent) / u64::from(n)) as u32;
                (p - origin).min(cell_extent - 1) as usize
            })
            .collect()
    };
    let xs = axis(canvas.width(), cell.width());
    let ys = axis(canvas.height(), cell.height());

    let cell_stride = cell.stride();
    let canvas_stride = canvas.stride();
    let cell_px = cell.as_bytes();
    for (row, &cy) in canvas
        .as_bytes_mut()
        .chunks_exact_mut(canvas_stride)
        .zip(&ys)
    {
        let cell_row = &cell_px[cy * cell_stride..(cy + 1) * cell_stride];
        for (px, &cx) in row.chunks_exact_mut(ch).zip(&xs) {
            px.copy_from_slice(&cell_row[cx * ch..(cx + 1) * ch]);
        }
    }
}
