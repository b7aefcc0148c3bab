use crate::foundation::error::{ReelError, ReelResult};

/// Absolute frame number on the global timeline driven by the controller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` on the global timeline.
///
/// Unlike a general purpose interval a `FrameRange` is never empty: every effect
/// must be eligible for at least one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "(u64, u64)", into = "(u64, u64)")]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start < end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ReelResult<Self> {
        if start.0 >= end.0 {
            return Err(ReelError::configuration(format!(
                "frame range start must be < end (got [{}, {}))",
                start.0, end.0
            )));
        }
        Ok(Self { start, end })
    }

    /// Create the half-open range covering `first..=last`.
    pub fn inclusive(first: u64, last: u64) -> ReelResult<Self> {
        let end = last
            .checked_add(1)
            .ok_or_else(|| ReelError::configuration("frame range end overflows u64"))?;
        Self::new(FrameIndex(first), FrameIndex(end))
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0 - self.start.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Last frame inside the range.
    pub fn last(self) -> FrameIndex {
        FrameIndex(self.end.0 - 1)
    }
}

impl TryFrom<(u64, u64)> for FrameRange {
    type Error = ReelError;

    fn try_from((start, end): (u64, u64)) -> ReelResult<Self> {
        Self::new(FrameIndex(start), FrameIndex(end))
    }
}

impl From<FrameRange> for (u64, u64) {
    fn from(r: FrameRange) -> Self {
        (r.start.0, r.end.0)
    }
}

/// Raster size shared by every buffer, source and keeper of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a size; both dimensions may be zero for scratch buffers.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a size suitable for a run raster (both dimensions non-zero).
    pub fn canvas(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::configuration(format!(
                "raster size must be non-zero (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by this size.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
