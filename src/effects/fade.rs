use crate::animation::tween::{Tween, TweenKind};
use crate::foundation::core::FrameRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::keeper::KeeperId;
use crate::raster::ops::blend;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Blend `a` into `b` over the effect's whole range.
#[derive(Clone, Debug)]
pub struct SimpleFaderFx {
    pub(crate) a: Source,
    pub(crate) b: Source,
    pub(crate) output: KeeperId,
    tween: Tween,
    alpha: f64,
}

impl SimpleFaderFx {
    pub(crate) fn new(
        range: FrameRange,
        a: Source,
        b: Source,
        tween: TweenKind,
        output: KeeperId,
    ) -> Self {
        Self {
            a,
            b,
            output,
            tween: tween.build(1.0, range.len_frames() as f64),
            alpha: 0.0,
        }
    }

    /// Blend fraction used by the most recent call.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let ia = ctx.read(&self.a, local)?;
        let ib = ctx.read(&self.b, local)?;
        self.alpha += self.tween.step(local);
        let out = blend(&ia, &ib, self.alpha)?;
        ctx.write(self.output, out)
    }
}

/// Fade-in / hold / fade-out split, as percentages of the effect's duration.
///
/// `fade_in + fade_out` may not exceed 100, so the ramps never overlap.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FadePercents {
    /// Share spent ramping from `a` to `b`.
    pub fade_in: f64,
    /// Share spent showing `b` alone. Implied by the other two; kept for scripts.
    pub hold: f64,
    /// Share spent ramping back towards `a`.
    pub fade_out: f64,
}

impl FadePercents {
    /// Build from `(in, hold, out)`.
    pub fn new(fade_in: f64, hold: f64, fade_out: f64) -> Self {
        Self {
            fade_in,
            hold,
            fade_out,
        }
    }

    fn validate(self) -> ReelResult<()> {
        for (name, v) in [
            ("fade_in", self.fade_in),
            ("hold", self.hold),
            ("fade_out", self.fade_out),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::configuration(format!(
                    "fade percentage '{name}' must be finite and >= 0 (got {v})"
                )));
            }
        }
        if self.fade_in + self.fade_out > 100.0 {
            return Err(ReelError::configuration(format!(
                "fade_in + fade_out must not exceed 100 (got {})",
                self.fade_in + self.fade_out
            )));
        }
        Ok(())
    }
}

/// Which part of a [`FadeInOutFx`] a local frame falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    /// Ramping from `a` to `b`.
    In,
    /// Showing `b` alone.
    Hold,
    /// Ramping from `b` back towards `a`.
    Out,
}

/// Three-phase blend between two sources.
///
/// During fade-out `a` is sampled through its own cursor, which starts at the
/// fade-in boundary and advances once per fade-out call, so `a` keeps moving
/// forward instead of replaying from the effect's local frame. `b` is always
/// sampled at the local frame.
#[derive(Clone, Debug)]
pub struct FadeInOutFx {
    pub(crate) a: Source,
    pub(crate) b: Source,
    pub(crate) output: KeeperId,
    tween_in: Tween,
    tween_out: Tween,
    fade_in_end: f64,
    fade_out_start: f64,
    out_cursor: f64,
    alpha: f64,
}

impl FadeInOutFx {
    pub(crate) fn new(
        range: FrameRange,
        a: Source,
        b: Source,
        percents: FadePercents,
        tween: TweenKind,
        output: KeeperId,
    ) -> ReelResult<Self> {
        percents.validate()?;
        let frames = range.len_frames() as f64;
        let in_frames = frames * percents.fade_in / 100.0;
        let out_frames = frames * percents.fade_out / 100.0;
        Ok(Self {
            a,
            b,
            output,
            tween_in: tween.build(1.0, in_frames),
            tween_out: tween.build(1.0, out_frames),
            fade_in_end: in_frames,
            fade_out_start: frames - out_frames,
            out_cursor: in_frames,
            alpha: 0.0,
        })
    }

    /// Phase of local frame `local`.
    pub fn phase(&self, local: u64) -> FadePhase {
        let l = local as f64;
        if l <= self.fade_in_end {
            FadePhase::In
        } else if l <= self.fade_out_start {
            FadePhase::Hold
        } else {
            FadePhase::Out
        }
    }

    /// Blend fraction used by the most recent call.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Frame at which `a` is sampled on the next fade-out call.
    pub fn next_out_sample(&self) -> u64 {
        (self.out_cursor + 1.0) as u64
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let ib = ctx.read(&self.b, local)?;
        let out = match self.phase(local) {
            FadePhase::In => {
                let ia = ctx.read(&self.a, local)?;
                self.alpha += self.tween_in.step(local);
                blend(&ia, &ib, self.alpha)?
            }
            FadePhase::Hold => {
                self.alpha = 1.0;
                ib
            }
            FadePhase::Out => {
                self.out_cursor += 1.0;
                let sample = self.out_cursor as u64;
                let ia = ctx.read(&self.a, sample)?;
                self.alpha -= self.tween_out.step(sample);
                blend(&ia, &ib, self.alpha)?
            }
        };
        ctx.write(self.output, out)
    }
}
