use rayon::prelude::*;

use crate::animation::tween::{Tween, TweenKind};
use crate::foundation::color::Rgb8;
use crate::foundation::core::FrameRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::PixelFormat;
use crate::raster::keeper::KeeperId;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// `true` when every channel of `px` is strictly closer than `threshold` to `target`.
pub fn color_matches(px: [u8; 3], target: [u8; 3], threshold: f64) -> bool {
    px.iter()
        .zip(target.iter())
        .all(|(&p, &t)| f64::from(p.abs_diff(t)) < threshold)
}

/// Replace every pixel near a target color with a replacement color.
///
/// With a tween attached the threshold drifts by one step per call, before the
/// scan, growing or shrinking the swapped region over the effect's range. A
/// pixel equal to the target is replaced whenever the threshold is positive; at
/// zero or below nothing matches.
#[derive(Clone, Debug)]
pub struct PixelSwapFx {
    pub(crate) input: Source,
    pub(crate) output: KeeperId,
    replacement: Rgb8,
    target: Rgb8,
    threshold: f64,
    tween: Option<Tween>,
}

impl PixelSwapFx {
    pub(crate) fn new(
        range: FrameRange,
        input: Source,
        replacement: Rgb8,
        target: Rgb8,
        threshold: f64,
        drift: Option<(TweenKind, f64)>,
        output: KeeperId,
    ) -> ReelResult<Self> {
        if !threshold.is_finite() {
            return Err(ReelError::configuration(format!(
                "swap threshold must be finite (got {threshold})"
            )));
        }
        if let Some((_, change)) = drift
            && !change.is_finite()
        {
            return Err(ReelError::configuration("swap threshold drift must be finite"));
        }
        Ok(Self {
            input,
            output,
            replacement,
            target,
            threshold,
            tween: drift.map(|(kind, change)| kind.build(change, range.len_frames() as f64)),
        })
    }

    /// Threshold used by the most recent call (or the initial one).
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let mut img = ctx.read(&self.input, local)?.convert(PixelFormat::Rgb8);
        if let Some(tween) = &self.tween {
            self.threshold += tween.step(local);
        }

        let threshold = self.threshold;
        let target = self.target.channels();
        let replacement = self.replacement.channels();
        let stride = img.stride();
        if stride > 0 {
            img.as_bytes_mut()
                .par_chunks_mut(stride)
                .for_each(|row| {
                    for px in row.chunks_exact_mut(3) {
                        if color_matches([px[0], px[1], px[2]], target, threshold) {
                            px.copy_from_slice(&replacement);
                        }
                    }
                });
        }
        ctx.write(self.output, img)
    }
}
