//! Time-scoped effects and their per-variant state.

pub(crate) mod commit;
pub(crate) mod fade;
pub(crate) mod mask;
pub(crate) mod slice;
pub(crate) mod squares;
pub(crate) mod swap;

use crate::animation::tween::TweenKind;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::keeper::KeeperId;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

use commit::CommitFx;
use fade::{FadeInOutFx, FadePercents, SimpleFaderFx};
use mask::{ColorScaleFx, MaskFx};
use slice::{SliceRepeaterFx, SliceSlideFx};
use squares::CollapsingSquaresFx;
use swap::PixelSwapFx;

/// Closed set of effect variants, each carrying its own state.
#[derive(Clone, Debug)]
pub enum EffectKind {
    /// Foreground over background through a mask.
    Mask(MaskFx),
    /// Duotone from the input's luminance.
    ColorScale(ColorScaleFx),
    /// Linear blend from one source to another.
    SimpleFader(SimpleFaderFx),
    /// Fade in, hold, fade out.
    FadeInOut(FadeInOutFx),
    /// Stretched copies pasted into vertical slices.
    SliceRepeater(SliceRepeaterFx),
    /// Right-to-left animated slice reveal.
    SliceSlide(SliceSlideFx),
    /// Replace colors near a target.
    PixelSwap(PixelSwapFx),
    /// Progressive mosaic.
    CollapsingSquares(CollapsingSquaresFx),
    /// Publish a keeper as the visible frame.
    Commit(CommitFx),
}

impl EffectKind {
    /// Stable variant name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mask(_) => "mask",
            Self::ColorScale(_) => "color_scale",
            Self::SimpleFader(_) => "simple_fader",
            Self::FadeInOut(_) => "fade_in_out",
            Self::SliceRepeater(_) => "slice_repeater",
            Self::SliceSlide(_) => "slice_slide",
            Self::PixelSwap(_) => "pixel_swap",
            Self::CollapsingSquares(_) => "collapsing_squares",
            Self::Commit(_) => "commit",
        }
    }

    fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        match self {
            Self::Mask(fx) => fx.apply(ctx, local),
            Self::ColorScale(fx) => fx.apply(ctx, local),
            Self::SimpleFader(fx) => fx.apply(ctx, local),
            Self::FadeInOut(fx) => fx.apply(ctx, local),
            Self::SliceRepeater(fx) => fx.apply(ctx, local),
            Self::SliceSlide(fx) => fx.apply(ctx, local),
            Self::PixelSwap(fx) => fx.apply(ctx, local),
            Self::CollapsingSquares(fx) => fx.apply(ctx, local),
            Self::Commit(fx) => fx.apply(ctx, local),
        }
    }
}

/// Lifecycle of an effect relative to a global frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectState {
    /// Before the effect's range.
    Pending,
    /// Inside the range; `local_frame` calls have happened so far.
    Active {
        /// Calls received so far.
        local_frame: u64,
    },
    /// Past the range; never invoked again.
    Finished,
}

/// A unit of work bound to a frame range.
///
/// The local frame counter starts at 0 and advances once per invocation inside
/// the range. Inputs are queried with the local frame, not the global one.
#[derive(Clone, Debug)]
pub struct Effect {
    range: FrameRange,
    local_frame: u64,
    kind: EffectKind,
}

impl Effect {
    fn new(range: FrameRange, kind: EffectKind) -> Self {
        Self {
            range,
            local_frame: 0,
            kind,
        }
    }

    /// Paste `foreground` over `background` at `mask`'s alpha, into `output`.
    pub fn mask(
        range: FrameRange,
        foreground: Source,
        background: Source,
        mask: Source,
        output: KeeperId,
    ) -> Self {
        Self::new(
            range,
            EffectKind::Mask(MaskFx {
                foreground,
                background,
                mask,
                output,
            }),
        )
    }

    /// Duotone of `input`: `background` where bright, `foreground` where dark.
    pub fn color_scale(
        range: FrameRange,
        input: Source,
        background: Rgb8,
        foreground: Rgb8,
        output: KeeperId,
    ) -> Self {
        Self::new(
            range,
            EffectKind::ColorScale(ColorScaleFx {
                input,
                background,
                foreground,
                output,
            }),
        )
    }

    /// Blend from `a` to `b` across the whole range.
    pub fn simple_fader(
        range: FrameRange,
        a: Source,
        b: Source,
        tween: TweenKind,
        output: KeeperId,
    ) -> Self {
        Self::new(
            range,
            EffectKind::SimpleFader(SimpleFaderFx::new(range, a, b, tween, output)),
        )
    }

    /// Fade from `a` to `b`, hold `b`, fade back towards `a`.
    pub fn fade_in_out(
        range: FrameRange,
        a: Source,
        b: Source,
        percents: FadePercents,
        tween: TweenKind,
        output: KeeperId,
    ) -> ReelResult<Self> {
        Ok(Self::new(
            range,
            EffectKind::FadeInOut(FadeInOutFx::new(range, a, b, percents, tween, output)?),
        ))
    }

    /// Stretch `a` into the slices of `b` selected by `truths` (all when `None`).
    pub fn slice_repeater(
        range: FrameRange,
        a: Source,
        b: Source,
        mask: Option<Source>,
        percents: Vec<f64>,
        truths: Option<Vec<bool>>,
        output: KeeperId,
    ) -> ReelResult<Self> {
        Ok(Self::new(
            range,
            EffectKind::SliceRepeater(SliceRepeaterFx::new(
                a, b, mask, percents, truths, output,
            )?),
        ))
    }

    /// Reveal stretched slices of `source` right to left over `slide_frames` calls.
    pub fn slice_slide(
        range: FrameRange,
        source: Source,
        percents: Vec<f64>,
        slide_frames: u64,
        output: KeeperId,
    ) -> ReelResult<Self> {
        Ok(Self::new(
            range,
            EffectKind::SliceSlide(SliceSlideFx::new(source, percents, slide_frames, output)?),
        ))
    }

    /// Replace pixels of `input` near `target` with `replacement`.
    ///
    /// `drift` attaches a tween moving the threshold by its total change over the range.
    #[allow(clippy::too_many_arguments)]
    pub fn pixel_swap(
        range: FrameRange,
        input: Source,
        replacement: Rgb8,
        target: Rgb8,
        threshold: f64,
        drift: Option<(TweenKind, f64)>,
        output: KeeperId,
    ) -> ReelResult<Self> {
        Ok(Self::new(
            range,
            EffectKind::PixelSwap(PixelSwapFx::new(
                range,
                input,
                replacement,
                target,
                threshold,
                drift,
                output,
            )?),
        ))
    }

    /// Tile ever smaller copies of `input` over `output`.
    pub fn collapsing_squares(
        range: FrameRange,
        input: Source,
        iterations: f64,
        output: KeeperId,
    ) -> ReelResult<Self> {
        Ok(Self::new(
            range,
            EffectKind::CollapsingSquares(CollapsingSquaresFx::new(
                range, input, iterations, output,
            )?),
        ))
    }

    /// Publish `keeper` as the controller's visible frame.
    pub fn commit(range: FrameRange, keeper: KeeperId) -> Self {
        Self::commit_source(range, Source::Keeper(keeper))
    }

    /// Publish any input as the controller's visible frame.
    pub fn commit_source(range: FrameRange, input: Source) -> Self {
        Self::new(range, EffectKind::Commit(CommitFx { input }))
    }

    /// Frame range the effect is bound to.
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// `true` iff `frame` is inside the effect's range.
    pub fn in_range(&self, frame: FrameIndex) -> bool {
        self.range.contains(frame)
    }

    /// Invocations received so far.
    pub fn local_frame(&self) -> u64 {
        self.local_frame
    }

    /// Variant and its state.
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Lifecycle state at global `frame`.
    pub fn state(&self, frame: FrameIndex) -> EffectState {
        if frame < self.range.start {
            EffectState::Pending
        } else if self.range.contains(frame) {
            EffectState::Active {
                local_frame: self.local_frame,
            }
        } else {
            EffectState::Finished
        }
    }

    /// Inputs read by the effect, in declaration order.
    pub fn inputs(&self) -> Vec<&Source> {
        match &self.kind {
            EffectKind::Mask(fx) => vec![&fx.foreground, &fx.background, &fx.mask],
            EffectKind::ColorScale(fx) => vec![&fx.input],
            EffectKind::SimpleFader(fx) => vec![&fx.a, &fx.b],
            EffectKind::FadeInOut(fx) => vec![&fx.a, &fx.b],
            EffectKind::SliceRepeater(fx) => {
                let mut v = vec![&fx.a, &fx.b];
                v.extend(fx.mask.as_ref());
                v
            }
            EffectKind::SliceSlide(fx) => vec![&fx.source],
            EffectKind::PixelSwap(fx) => vec![&fx.input],
            EffectKind::CollapsingSquares(fx) => vec![&fx.input],
            EffectKind::Commit(fx) => vec![&fx.input],
        }
    }

    /// Keeper written by the effect; `None` for commits.
    pub fn output(&self) -> Option<KeeperId> {
        match &self.kind {
            EffectKind::Mask(fx) => Some(fx.output),
            EffectKind::ColorScale(fx) => Some(fx.output),
            EffectKind::SimpleFader(fx) => Some(fx.output),
            EffectKind::FadeInOut(fx) => Some(fx.output),
            EffectKind::SliceRepeater(fx) => Some(fx.output),
            EffectKind::SliceSlide(fx) => Some(fx.output),
            EffectKind::PixelSwap(fx) => Some(fx.output),
            EffectKind::CollapsingSquares(fx) => Some(fx.output),
            EffectKind::Commit(_) => None,
        }
    }

    /// Every keeper the effect reads, including implicit reads of its own output.
    pub fn keeper_reads(&self) -> Vec<KeeperId> {
        let mut ids: Vec<KeeperId> = self.inputs().iter().filter_map(|s| s.keeper_id()).collect();
        // The mosaic tiles over whatever its output keeper already holds.
        if let EffectKind::CollapsingSquares(fx) = &self.kind {
            ids.push(fx.output);
        }
        ids
    }

    /// Run the effect for global `frame` if it is in range.
    ///
    /// Returns `true` when the effect ran. Out-of-range frames leave every bit of
    /// state, including the local counter, untouched.
    pub fn invoke(&mut self, frame: FrameIndex, ctx: &mut FrameContext<'_>) -> ReelResult<bool> {
        if !self.in_range(frame) {
            return Ok(false);
        }
        self.local_frame = self
            .local_frame
            .checked_add(1)
            .ok_or_else(|| ReelError::evaluation("effect local frame overflow"))?;
        self.kind.apply(ctx, self.local_frame)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../tests/unit/effects/effects.rs"]
mod tests;
