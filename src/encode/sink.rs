use std::path::Path;

use anyhow::Context as _;

use crate::assets::template::PathTemplate;
use crate::foundation::core::{FrameIndex, FrameRange, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Raster size of every frame.
    pub size: Size,
    /// Global frames that will be pushed.
    pub range: FrameRange,
}

/// Sink contract for consuming composited frames in timeline order.
///
/// `push_frame` is called exactly once per global frame, in strictly increasing order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageBuffer) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, ImageBuffer)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, ImageBuffer)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageBuffer) -> ReelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        Ok(())
    }
}

/// Writes each frame as an RGB PNG named by a [`PathTemplate`].
#[derive(Debug)]
pub struct PngSequenceSink {
    template: PathTemplate,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// Create a sink writing to paths produced by `template`.
    pub fn new(template: PathTemplate) -> Self {
        Self {
            template,
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Frames written since `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.size.is_empty() {
            return Err(ReelError::sink("png sink width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageBuffer) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::sink("png sink push_frame called before begin"))?;
        if frame.size() != cfg.size {
            return Err(ReelError::sink(format!(
                "frame {} is {} but the sink expects {}",
                idx.0,
                frame.size(),
                cfg.size
            )));
        }
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(ReelError::sink(format!(
                "frame {} pushed out of order",
                idx.0
            )));
        }

        let path = self.template.render(idx.0);
        ensure_parent_dir(&path)?;
        let rgb = frame.convert(PixelFormat::Rgb8);
        image::save_buffer_with_format(
            &path,
            rgb.as_bytes(),
            cfg.size.width,
            cfg.size.height,
            image::ExtendedColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write frame {} to '{}'", idx.0, path.display()))?;

        tracing::info!(frame = idx.0, path = %path.display(), "wrote frame");
        self.last_idx = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        tracing::debug!(frames = self.written, "png sequence finished");
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
