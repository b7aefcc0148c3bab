use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};
use crate::raster::keeper::KeeperId;
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Horizontal extent of one vertical slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceSpan {
    /// First column of the slice.
    pub left: u32,
    /// Width in pixels.
    pub width: u32,
}

impl SliceSpan {
    /// One past the last column of the slice.
    pub fn right(self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// `src` fitted to this span, cut at the right edge of a `canvas_width` canvas.
    fn fit(self, src: &ImageBuffer, height: u32, canvas_width: u32) -> ImageBuffer {
        src.fit_visible(
            Size::new(self.width, height),
            canvas_width.saturating_sub(self.left),
        )
    }
}

/// Lay slices out left to right, each `width * percent / 100` pixels wide.
///
/// Each slice is truncated on its own, so rounding loss accumulates into the gap
/// after the last slice. Percentages summing past 100 produce spans running off
/// the right edge; pasting clips them.
pub fn slice_spans(width: u32, percents: &[f64]) -> Vec<SliceSpan> {
    let mut x = 0u32;
    percents
        .iter()
        .map(|p| {
            let w = (f64::from(width) * (p / 100.0)) as u32;
            let span = SliceSpan { left: x, width: w };
            x = x.saturating_add(w);
            span
        })
        .collect()
}

pub(crate) fn validate_percents(percents: &[f64]) -> ReelResult<()> {
    if percents.is_empty() {
        return Err(ReelError::configuration(
            "slice percentages must name at least one slice",
        ));
    }
    if let Some(bad) = percents.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(ReelError::configuration(format!(
            "slice percentages must be finite and >= 0 (got {bad})"
        )));
    }
    Ok(())
}

/// Stretch `a` into selected vertical slices of `b`, optionally through a mask.
#[derive(Clone, Debug)]
pub struct SliceRepeaterFx {
    pub(crate) a: Source,
    pub(crate) b: Source,
    pub(crate) mask: Option<Source>,
    pub(crate) output: KeeperId,
    percents: Vec<f64>,
    truths: Option<Vec<bool>>,
}

impl SliceRepeaterFx {
    pub(crate) fn new(
        a: Source,
        b: Source,
        mask: Option<Source>,
        percents: Vec<f64>,
        truths: Option<Vec<bool>>,
        output: KeeperId,
    ) -> ReelResult<Self> {
        validate_percents(&percents)?;
        if let Some(t) = &truths
            && t.len() != percents.len()
        {
            return Err(ReelError::configuration(format!(
                "slice flags must match slice count ({} flags for {} slices)",
                t.len(),
                percents.len()
            )));
        }
        Ok(Self {
            a,
            b,
            mask,
            output,
            percents,
            truths,
        })
    }

    /// `true` when slice `i` receives a copy of `a`.
    pub fn is_enabled(&self, i: usize) -> bool {
        self.truths
            .as_ref()
            .is_none_or(|t| t.get(i).copied().unwrap_or(false))
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let src = ctx.read(&self.a, local)?;
        let mut img = ctx.read(&self.b, local)?;
        let mask = self
            .mask
            .as_ref()
            .map(|m| ctx.read(m, local))
            .transpose()?;
        let (width, height) = (img.width(), img.height());

        for (i, span) in slice_spans(width, &self.percents).into_iter().enumerate() {
            if !self.is_enabled(i) || span.left >= width {
                continue;
            }
            let piece = span.fit(&src, height, width);
            match &mask {
                Some(m) => img.paste_masked(&piece, span.left, 0, &span.fit(m, height, width)),
                None => img.paste(&piece, span.left, 0),
            }
        }
        ctx.write(self.output, img)
    }
}

/// Animated right-to-left reveal of stretched slices.
///
/// A scalar cursor advances by `total / slide_frames` per call. Slices right of
/// the current one are shown in full; the area left of them is split at the
/// cursor into two independently stretched copies of the source. When the cursor
/// reaches the current slice's boundary it resets and the next slice to the left
/// becomes current. Once every slice is revealed, all are pasted each call.
#[derive(Clone, Debug)]
pub struct SliceSlideFx {
    pub(crate) source: Source,
    pub(crate) output: KeeperId,
    percents: Vec<f64>,
    slide_frames: u64,
    layout: Option<SlideLayout>,
    cursor: f64,
    end_x: u32,
    current: Option<usize>,
}

#[derive(Clone, Debug)]
struct SlideLayout {
    /// Pixels preceding each slice.
    boundaries: Vec<f64>,
    step: f64,
}

impl SliceSlideFx {
    pub(crate) fn new(
        source: Source,
        percents: Vec<f64>,
        slide_frames: u64,
        output: KeeperId,
    ) -> ReelResult<Self> {
        validate_percents(&percents)?;
        if slide_frames == 0 {
            return Err(ReelError::configuration("slide duration must be >= 1 frame"));
        }
        let current = Some(percents.len() - 1);
        Ok(Self {
            source,
            output,
            percents,
            slide_frames,
            layout: None,
            cursor: 0.0,
            end_x: 0,
            current,
        })
    }

    /// Slice currently being revealed, `None` once fully revealed.
    pub fn current_slice(&self) -> Option<usize> {
        self.current
    }

    /// `true` once every slice has been revealed.
    pub fn is_revealed(&self) -> bool {
        self.current.is_none()
    }

    /// Reveal position within the current slice, in pixels.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    fn layout(&mut self, width: u32) -> SlideLayout {
        if let Some(layout) = &self.layout {
            return layout.clone();
        }
        let mut before = 0.0;
        let mut total = 0.0;
        let boundaries = self
            .percents
            .iter()
            .map(|p| {
                let px = before / 100.0 * f64::from(width);
                total += px;
                before += p;
                px
            })
            .collect();
        let layout = SlideLayout {
            boundaries,
            step: total / self.slide_frames as f64,
        };
        self.end_x = width;
        self.layout = Some(layout.clone());
        layout
    }

    pub(crate) fn apply(&mut self, ctx: &mut FrameContext<'_>, local: u64) -> ReelResult<()> {
        let size = ctx.size();
        let layout = self.layout(size.width);
        let src = ctx.read(&self.source, local)?;
        let mut img = ImageBuffer::new(size, PixelFormat::Rgb8);

        for (i, span) in slice_spans(size.width, &self.percents)
            .into_iter()
            .enumerate()
        {
            if self.current.is_none_or(|c| i > c) {
                img.paste(&span.fit(&src, size.height, size.width), span.left, 0);
            }
            if self.current.is_some_and(|c| i == c + 1) {
                self.end_x = span.left;
            }
        }

        if let Some(c) = self.current {
            let start_x = self.cursor as u32;
            let left = SliceSpan {
                left: 0,
                width: start_x,
            };
            let right = SliceSpan {
                left: start_x,
                width: self.end_x.saturating_sub(start_x),
            };
            img.paste(&left.fit(&src, size.height, size.width), 0, 0);
            img.paste(&right.fit(&src, size.height, size.width), start_x, 0);

            self.cursor += layout.step;
            if self.cursor >= layout.boundaries[c] {
                self.cursor = 0.0;
                self.current = c.checked_sub(1);
            }
        }
        ctx.write(self.output, img)
    }
}
