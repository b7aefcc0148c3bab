use crate::effects::{Effect, EffectKind};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Rgb8;
use crate::foundation::core::{FrameIndex, FrameRange, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};
use crate::raster::keeper::{ImageKeeper, KeeperId, KeeperStore};
use crate::raster::source::Source;
use crate::timeline::context::FrameContext;

/// Handle to an effect attached to a [`Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectId(pub(crate) usize);

/// Counters reported by [`Controller::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Frames that carried a committed buffer.
    pub frames_committed: u64,
    /// Frames written as the white fallback because nothing was committed yet.
    pub frames_fallback: u64,
}

/// Frame clock and composition root.
///
/// Effects run in attachment order, once per global frame inside their range, so
/// an effect observes exactly the keeper writes of effects attached before it.
/// Keepers live in the controller and are addressed by [`KeeperId`].
#[derive(Debug)]
pub struct Controller {
    size: Size,
    range: FrameRange,
    next: u64,
    keepers: KeeperStore,
    effects: Vec<Effect>,
    committed: Option<ImageBuffer>,
}

impl Controller {
    /// Create a controller over the inclusive frame range `first..=last`.
    #[tracing::instrument]
    pub fn new(size: Size, first: u64, last: u64) -> ReelResult<Self> {
        let size = Size::canvas(size.width, size.height)?;
        let range = FrameRange::inclusive(first, last)?;
        Ok(Self {
            size,
            range,
            next: first,
            keepers: KeeperStore::default(),
            effects: Vec::new(),
            committed: None,
        })
    }

    /// Raster size of the run.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Global frames driven by this controller.
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// Allocate an empty keeper.
    pub fn create_keeper(&mut self) -> ReelResult<KeeperId> {
        self.keepers.create()
    }

    /// Number of keepers allocated so far.
    pub fn keeper_count(&self) -> usize {
        self.keepers.len()
    }

    /// Borrow a keeper.
    pub fn keeper(&self, id: KeeperId) -> ReelResult<&ImageKeeper> {
        self.keepers.get(id)
    }

    /// Attached effects in attachment order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Borrow an attached effect.
    pub fn effect(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(id.0)
    }

    /// Append `effect` to the schedule.
    ///
    /// The controller takes ownership, so one instance is attached at most once.
    /// A clone is a separate effect: attaching it too runs both every frame.
    ///
    /// Fails when an asset input has the wrong size, a keeper is unknown, or a
    /// keeper (or the committed frame) is read without an earlier-attached producer
    /// starting no later than this effect.
    pub fn attach(&mut self, effect: Effect) -> ReelResult<EffectId> {
        let name = effect.kind().name();
        for input in effect.inputs() {
            if let Source::Asset(asset) = input
                && asset.size() != self.size
            {
                return Err(ReelError::configuration(format!(
                    "{name} input is {} but the run is {}",
                    asset.size(),
                    self.size
                )));
            }
            if matches!(input, Source::Committed) && !self.has_commit_before(&effect) {
                return Err(ReelError::configuration(format!(
                    "{name} reads the committed frame before any commit is attached"
                )));
            }
        }
        if let Some(out) = effect.output()
            && !self.keepers.contains(out)
        {
            return Err(ReelError::configuration(format!(
                "{name} writes unknown keeper {}",
                out.0
            )));
        }
        for id in effect.keeper_reads() {
            if !self.keepers.contains(id) {
                return Err(ReelError::configuration(format!(
                    "{name} reads unknown keeper {}",
                    id.0
                )));
            }
            if !self.has_producer_before(id, &effect) {
                return Err(ReelError::configuration(format!(
                    "{name} reads keeper {} before any earlier effect writes it",
                    id.0
                )));
            }
        }

        let id = EffectId(self.effects.len());
        tracing::debug!(
            effect = name,
            start = effect.range().start.0,
            end = effect.range().end.0,
            index = id.0,
            "attached effect"
        );
        self.effects.push(effect);
        Ok(id)
    }

    fn has_producer_before(&self, keeper: KeeperId, effect: &Effect) -> bool {
        self.effects
            .iter()
            .any(|e| e.output() == Some(keeper) && e.range().start <= effect.range().start)
    }

    fn has_commit_before(&self, effect: &Effect) -> bool {
        self.effects.iter().any(|e| {
            matches!(e.kind(), EffectKind::Commit(_)) && e.range().start <= effect.range().start
        })
    }

    /// Last frame processed by [`Controller::advance`], if any.
    pub fn frame_number(&self) -> Option<FrameIndex> {
        (self.next > self.range.start.0).then(|| FrameIndex(self.next - 1))
    }

    /// `true` once every frame of the range has been processed.
    pub fn is_finished(&self) -> bool {
        self.next >= self.range.end.0
    }

    /// Copy of the committed frame, `None` until the first commit.
    pub fn current_frame(&self) -> Option<ImageBuffer> {
        self.committed.clone()
    }

    /// Move to the next global frame and invoke every in-range effect in order.
    pub fn advance(&mut self) -> ReelResult<FrameIndex> {
        let frame = FrameIndex(self.next);
        if !self.range.contains(frame) {
            return Err(ReelError::evaluation(format!(
                "controller advanced past its last frame {}",
                self.range.last().0
            )));
        }
        self.next += 1;

        let mut ctx = FrameContext::new(self.size, &mut self.keepers, &mut self.committed);
        for effect in &mut self.effects {
            if effect.invoke(frame, &mut ctx)? {
                tracing::trace!(
                    frame = frame.0,
                    effect = effect.kind().name(),
                    local = effect.local_frame(),
                    "invoked effect"
                );
            }
        }
        Ok(frame)
    }

    /// Advance through every remaining frame, handing each to `sink`.
    ///
    /// Frames with nothing committed yet are written as a white fallback.
    #[tracing::instrument(skip(self, sink), fields(first = self.range.start.0, last = self.range.last().0))]
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> ReelResult<RunStats> {
        sink.begin(SinkConfig {
            size: self.size,
            range: self.range,
        })?;
        let fallback = ImageBuffer::filled(self.size, Rgb8::WHITE, PixelFormat::Rgb8);
        let mut stats = RunStats::default();
        while !self.is_finished() {
            let frame = self.advance()?;
            match &self.committed {
                Some(img) => {
                    sink.push_frame(frame, img)?;
                    stats.frames_committed += 1;
                }
                None => {
                    sink.push_frame(frame, &fallback)?;
                    stats.frames_fallback += 1;
                }
            }
            stats.frames_written += 1;
        }
        sink.end()?;
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/controller.rs"]
mod tests;
